//! Owned game state and its update rules (typing, focus, completion, clues).

use super::overlay::ClueOverlay;
use super::{CellPos, Grid, LevelDesc, Orientation, normalize_letter};

/// What the view should do after a keystroke.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputOutcome {
    /// Cell to move focus to; `None` keeps focus where it is.
    pub next_focus: Option<CellPos>,
    /// Completion flipped from false to true on this keystroke.
    pub just_completed: bool,
}

pub struct GameState {
    pub level: &'static LevelDesc,
    pub grid: Grid,
    /// First cell of the active word, set by focus events only.
    pub active_anchor: Option<CellPos>,
    pub complete: bool,
    pub overlay: ClueOverlay,
}

impl GameState {
    pub fn new(level: &'static LevelDesc) -> Self {
        let mut state = Self {
            level,
            grid: Grid::build(level),
            active_anchor: None,
            complete: false,
            overlay: ClueOverlay::default(),
        };
        state.recheck_completion();
        state
    }

    /// Rebuild the grid for `level`, discarding every guess. The active anchor
    /// is left alone; it only moves on focus. Re-selecting the current level
    /// is a no-op and returns false.
    pub fn set_level(&mut self, level: &'static LevelDesc) -> bool {
        if std::ptr::eq(self.level, level) {
            return false;
        }
        self.level = level;
        self.grid = Grid::build(level);
        self.complete = false;
        self.recheck_completion();
        log::info!(
            "level '{}' loaded: {}x{} grid, {} cells",
            level.title,
            self.grid.width,
            self.grid.height,
            self.grid.len()
        );
        true
    }

    /// Apply the raw value of a cell input: keep its last character, uppercased.
    pub fn key_input(&mut self, pos: CellPos, raw: &str) -> InputOutcome {
        let guess = raw.chars().last().map(normalize_letter);
        if !self.grid.set_guess(pos, guess) {
            return InputOutcome::default();
        }
        let just_completed = self.recheck_completion();

        let next_focus = self
            .grid
            .cell(pos)
            .map(|cell| cell.orientation.step(pos))
            .filter(|next| self.grid.contains(*next) && self.is_active_word_cell(*next));

        InputOutcome {
            next_focus,
            just_completed,
        }
    }

    /// Focus entered `pos`; re-anchor the active word unless `pos` already lies on it.
    pub fn focus(&mut self, pos: CellPos) {
        if self.grid.contains(pos) && !self.is_active_word_cell(pos) {
            self.active_anchor = Some(pos);
        }
    }

    /// Half-open ray from the anchor along the anchor cell's orientation. It is
    /// not bounded by the word's last letter.
    pub fn is_active_word_cell(&self, pos: CellPos) -> bool {
        let Some(anchor) = self.active_anchor else {
            return false;
        };
        let Some(anchor_cell) = self.grid.cell(anchor) else {
            return false;
        };
        match anchor_cell.orientation {
            Orientation::Across => pos.row == anchor.row && pos.col >= anchor.col,
            Orientation::Down => pos.col == anchor.col && pos.row >= anchor.row,
        }
    }

    /// Re-evaluate completion. Returns true only on the false -> true edge.
    pub fn recheck_completion(&mut self) -> bool {
        let solved = self.grid.is_solved();
        log::debug!("checking level completion: {}", solved);
        let rising = solved && !self.complete;
        self.complete = solved;
        if rising {
            log::info!("level '{}' complete", self.level.title);
        }
        rising
    }

    /// Open the clue panel for the intersection at `pos`. Returns false if
    /// there is no intersection there.
    pub fn select_intersection(&mut self, pos: CellPos) -> bool {
        match self.level.intersection_at(pos) {
            Some(hit) => {
                log::debug!("clues at {:?}: {:?}", pos, hit.clues);
                self.overlay.open_with(hit.clues.clone());
                true
            }
            None => false,
        }
    }
}
