//! Crossclue core crate.
//!
//! A crossword board built from word/direction definitions, where clicking a
//! shared cell opens a draggable panel of image clues. Puzzle rules live in
//! [`board`] and [`celebrate`] and run natively; `start_game()` mounts the
//! browser view.

use wasm_bindgen::prelude::*;

pub mod board;
pub mod celebrate;

pub use board::overlay::{ClueOverlay, DragState};
pub use board::state::{GameState, InputOutcome};
pub use board::{
    Cell, CellPos, Grid, Intersection, LevelDesc, MAX_GRID_EXTENT, Orientation, Point, WordEntry,
    grid_size, level1, levels,
};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    let _ = console_log::init_with_level(level);
}

// -----------------------------------------------------------------------------
// JS entrypoints
// -----------------------------------------------------------------------------

#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    board::view::start_board_mode()
}

#[wasm_bindgen]
pub fn select_level(index: usize) -> Result<(), JsValue> {
    board::view::select_level(index)
}

#[wasm_bindgen]
pub fn level_count() -> usize {
    levels().len()
}

#[wasm_bindgen]
pub fn is_level_complete() -> bool {
    board::view::is_level_complete()
}

/// Parse a level from JSON and switch the running board to it.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn load_level_json(json: &str) -> Result<(), JsValue> {
    let level = LevelDesc::from_json(json)
        .map_err(|e| JsValue::from_str(&format!("invalid level json: {e}")))?;
    level.check_extent().map_err(|e| {
        log::warn!("rejected level: {}", e);
        JsValue::from_str(&e)
    })?;
    // Levels are referenced for the lifetime of the page.
    let level: &'static LevelDesc = Box::leak(Box::new(level));
    board::view::switch_level(level)
}
