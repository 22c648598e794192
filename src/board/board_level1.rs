// Board Level 1 definition ("Clones"): SHIP across, PACKAGE down, sharing the P.
use super::{Intersection, LevelDesc, Orientation, Point, WordEntry};
use std::sync::OnceLock;

fn build_level1() -> LevelDesc {
    LevelDesc {
        title: "Level 1- \"Clones\"".to_string(),
        words: vec![
            WordEntry::new("ship", 0, 0, Orientation::Across),
            WordEntry::new("package", 3, 0, Orientation::Down),
        ],
        intersections: vec![Intersection {
            position: Point::new(3, 0),
            clues: vec![
                "/images/level1/clue-ship-package-1.webp".to_string(),
                "/images/level1/clue-ship-package-2.webp".to_string(),
            ],
        }],
    }
}

pub fn level1() -> &'static LevelDesc {
    static LD: OnceLock<LevelDesc> = OnceLock::new();
    LD.get_or_init(build_level1)
}
