//! Crossword board: level descriptors, the derived letter grid and the game
//! state that routes typing, focus and clue selection.
//!
//! Level data uses zero-based `(x, y)` source coordinates. The grid is keyed
//! by one-based [`CellPos`] (`row = y + 1`, `col = x + 1`) and only contains
//! positions covered by some word; everything else inside the bounding
//! rectangle is a disabled placeholder in the view.
//!
//! All rules here are pure and host-testable. The browser projection lives in
//! [`view`] and is the only place touching `web_sys`.

use std::collections::BTreeMap;

pub mod overlay;
pub mod state;
pub mod view;

mod board_level1;

pub use board_level1::level1;

// --- Level descriptors -------------------------------------------------------

/// Largest width or height accepted for levels loaded at runtime.
pub const MAX_GRID_EXTENT: u32 = 64;

/// Zero-based coordinate as written in level data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Direction a word is written in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Orientation {
    Across,
    Down,
}

impl Orientation {
    /// Neighbouring cell one step further along this orientation.
    pub fn step(self, pos: CellPos) -> CellPos {
        match self {
            Orientation::Across => CellPos::new(pos.row, pos.col.saturating_add(1)),
            Orientation::Down => CellPos::new(pos.row.saturating_add(1), pos.col),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WordEntry {
    pub text: String,
    pub start: Point,
    pub direction: Orientation,
}

impl WordEntry {
    pub fn new(text: &str, x: u32, y: u32, direction: Orientation) -> Self {
        Self {
            text: text.to_string(),
            start: Point::new(x, y),
            direction,
        }
    }

    fn len(&self) -> u32 {
        self.text.chars().count() as u32
    }
}

/// A shared cell carrying image clues, in display order.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Intersection {
    pub position: Point,
    pub clues: Vec<String>,
}

/// Level descriptor (immutable once built).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelDesc {
    /// Label shown on the level-select button.
    #[cfg_attr(feature = "serde", serde(default))]
    pub title: String,
    pub words: Vec<WordEntry>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub intersections: Vec<Intersection>,
}

impl LevelDesc {
    /// Intersection whose source position maps onto `pos`, if any.
    pub fn intersection_at(&self, pos: CellPos) -> Option<&Intersection> {
        self.intersections
            .iter()
            .find(|i| CellPos::from_point(i.position) == pos)
    }

    /// Reject levels whose grid would exceed `MAX_GRID_EXTENT` on either axis.
    pub fn check_extent(&self) -> Result<(), String> {
        let (width, height) = grid_size(&self.words);
        if width > MAX_GRID_EXTENT || height > MAX_GRID_EXTENT {
            return Err(format!(
                "level grid {width}x{height} exceeds {MAX_GRID_EXTENT}x{MAX_GRID_EXTENT}"
            ));
        }
        Ok(())
    }

    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<LevelDesc, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// Shipped levels. The original second level ("SlapPals") was never reachable
// from level select and is not carried.
pub fn levels() -> &'static [&'static LevelDesc] {
    use std::sync::OnceLock;
    static LEVELS_STATIC: OnceLock<&'static [&'static LevelDesc]> = OnceLock::new();
    LEVELS_STATIC.get_or_init(|| Box::leak(vec![level1()].into_boxed_slice()))
}

// --- Grid --------------------------------------------------------------------

/// One-based grid key. Ordered row-major so iteration matches render order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellPos {
    pub row: u32,
    pub col: u32,
}

impl CellPos {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    pub const fn from_point(p: Point) -> Self {
        Self {
            row: p.y.saturating_add(1),
            col: p.x.saturating_add(1),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub expected: char,
    pub guess: Option<char>,
    /// Orientation of the word that wrote this cell (last writer wins).
    pub orientation: Orientation,
}

impl Cell {
    pub fn is_correct(&self) -> bool {
        self.guess == Some(self.expected)
    }
}

/// Bounding rectangle `(width, height)` of every word's full extent.
pub fn grid_size(words: &[WordEntry]) -> (u32, u32) {
    words.iter().fold((0, 0), |(w, h), word| {
        let Point { x, y } = word.start;
        match word.direction {
            Orientation::Across => (
                w.max(x.saturating_add(word.len())),
                h.max(y.saturating_add(1)),
            ),
            Orientation::Down => (
                w.max(x.saturating_add(1)),
                h.max(y.saturating_add(word.len())),
            ),
        }
    })
}

/// Uppercase form of a single letter. Letters whose uppercase form is more
/// than one char (`ß` -> `SS`) are kept as typed, so they never match a
/// single-letter cell.
pub fn normalize_letter(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Grid {
    pub width: u32,
    pub height: u32,
    cells: BTreeMap<CellPos, Cell>,
}

impl Grid {
    pub fn build(level: &LevelDesc) -> Grid {
        let (width, height) = grid_size(&level.words);
        let mut cells = BTreeMap::new();
        for word in &level.words {
            let mut pos = CellPos::from_point(word.start);
            for ch in word.text.chars() {
                cells.insert(
                    pos,
                    Cell {
                        expected: normalize_letter(ch),
                        guess: None,
                        orientation: word.direction,
                    },
                );
                pos = word.direction.step(pos);
            }
        }
        Grid {
            width,
            height,
            cells,
        }
    }

    pub fn cell(&self, pos: CellPos) -> Option<&Cell> {
        self.cells.get(&pos)
    }

    pub fn contains(&self, pos: CellPos) -> bool {
        self.cells.contains_key(&pos)
    }

    pub fn cells(&self) -> impl Iterator<Item = (&CellPos, &Cell)> {
        self.cells.iter()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Store a guess for an existing cell. Returns false for placeholder positions.
    pub fn set_guess(&mut self, pos: CellPos, guess: Option<char>) -> bool {
        match self.cells.get_mut(&pos) {
            Some(cell) => {
                cell.guess = guess.map(normalize_letter);
                true
            }
            None => false,
        }
    }

    /// Every cell holds its expected letter. Vacuously true for an empty grid.
    pub fn is_solved(&self) -> bool {
        self.cells.values().all(Cell::is_correct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ship_package() -> LevelDesc {
        LevelDesc {
            title: "test-level".into(),
            words: vec![
                WordEntry::new("ship", 0, 0, Orientation::Across),
                WordEntry::new("package", 3, 0, Orientation::Down),
            ],
            intersections: vec![],
        }
    }

    #[test]
    fn test_grid_size_covers_every_word() {
        assert_eq!(grid_size(&ship_package().words), (4, 7));
        let words = [WordEntry::new("ab", 5, 2, Orientation::Across)];
        assert_eq!(grid_size(&words), (7, 3));
        let words = [WordEntry::new("abc", 1, 4, Orientation::Down)];
        assert_eq!(grid_size(&words), (2, 7));
        assert_eq!(grid_size(&[]), (0, 0));
    }

    #[test]
    fn test_build_maps_letters_to_one_based_keys() {
        let grid = Grid::build(&ship_package());
        assert_eq!(grid.len(), 10); // 4 + 7 - shared P
        assert_eq!(grid.cell(CellPos::new(1, 1)).map(|c| c.expected), Some('S'));
        assert_eq!(grid.cell(CellPos::new(1, 4)).map(|c| c.expected), Some('P'));
        assert_eq!(grid.cell(CellPos::new(7, 4)).map(|c| c.expected), Some('E'));
        assert!(grid.cells().all(|(_, c)| c.guess.is_none()));
    }

    #[test]
    fn test_shared_cell_takes_last_writer_orientation() {
        let grid = Grid::build(&ship_package());
        let shared = grid.cell(CellPos::new(1, 4)).unwrap();
        assert_eq!(shared.orientation, Orientation::Down);
        assert_eq!(
            grid.cell(CellPos::new(1, 3)).unwrap().orientation,
            Orientation::Across
        );
    }

    #[test]
    fn test_uncovered_positions_are_absent() {
        let grid = Grid::build(&ship_package());
        for row in 2..=grid.height {
            for col in 1..=3 {
                assert!(!grid.contains(CellPos::new(row, col)));
            }
        }
    }

    #[test]
    fn test_zero_length_word_is_degenerate_not_fatal() {
        let level = LevelDesc {
            words: vec![WordEntry::new("", 2, 2, Orientation::Across)],
            ..Default::default()
        };
        let grid = Grid::build(&level);
        assert!(grid.is_empty());
        assert_eq!((grid.width, grid.height), (2, 3));
        assert!(grid.is_solved());
    }

    #[test]
    fn test_word_at_coordinate_limit_saturates() {
        let level = LevelDesc {
            words: vec![
                WordEntry::new("ab", u32::MAX, 0, Orientation::Across),
                WordEntry::new("cd", 0, u32::MAX, Orientation::Down),
            ],
            ..Default::default()
        };
        assert_eq!(grid_size(&level.words), (u32::MAX, u32::MAX));
        let grid = Grid::build(&level);
        // Both letters of each word collapse onto the saturated cell.
        assert_eq!(grid.len(), 2);
        assert_eq!(
            grid.cell(CellPos::new(1, u32::MAX)).map(|c| c.expected),
            Some('B')
        );
        assert!(level.check_extent().is_err());
    }

    #[test]
    fn test_check_extent_bounds() {
        assert!(level1().check_extent().is_ok());
        let at_limit = LevelDesc {
            words: vec![WordEntry::new("a", MAX_GRID_EXTENT - 1, 0, Orientation::Across)],
            ..Default::default()
        };
        assert!(at_limit.check_extent().is_ok());
        let too_wide = LevelDesc {
            words: vec![WordEntry::new("a", 1_000_000, 0, Orientation::Across)],
            ..Default::default()
        };
        assert!(too_wide.check_extent().is_err());
    }

    #[test]
    fn test_multi_char_uppercase_is_kept_raw() {
        assert_eq!(normalize_letter('ß'), 'ß');
        assert_eq!(normalize_letter('é'), 'É');
        let level = LevelDesc {
            words: vec![WordEntry::new("straße", 0, 0, Orientation::Across)],
            ..Default::default()
        };
        let grid = Grid::build(&level);
        assert_eq!(grid.cell(CellPos::new(1, 5)).map(|c| c.expected), Some('ß'));
    }

    #[test]
    fn test_set_guess_normalizes_and_ignores_placeholders() {
        let mut grid = Grid::build(&ship_package());
        assert!(grid.set_guess(CellPos::new(1, 1), Some('s')));
        assert!(grid.cell(CellPos::new(1, 1)).unwrap().is_correct());
        assert!(!grid.set_guess(CellPos::new(3, 1), Some('x')));
    }

    #[test]
    fn test_intersection_lookup_uses_one_based_key() {
        let level = level1();
        let hit = level.intersection_at(CellPos::new(1, 4)).unwrap();
        assert_eq!(hit.clues.len(), 2);
        assert!(level.intersection_at(CellPos::new(4, 1)).is_none());
    }

    #[test]
    fn test_orientation_step() {
        let p = CellPos::new(2, 3);
        assert_eq!(Orientation::Across.step(p), CellPos::new(2, 4));
        assert_eq!(Orientation::Down.step(p), CellPos::new(3, 3));
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn test_level_from_json() {
        let json = r#"{
            "words": [
                { "text": "ship", "start": { "x": 0, "y": 0 }, "direction": "across" },
                { "text": "package", "start": { "x": 3, "y": 0 }, "direction": "down" }
            ],
            "intersections": [
                { "position": { "x": 3, "y": 0 }, "clues": ["/a.webp", "/b.webp"] }
            ]
        }"#;
        let level = LevelDesc::from_json(json).unwrap();
        assert_eq!(level.title, "");
        assert_eq!(level.words[1].direction, Orientation::Down);
        assert_eq!(Grid::build(&level).len(), 10);
        assert!(LevelDesc::from_json(r#"{"words":[{"text":"a"}]}"#).is_err());
    }
}
