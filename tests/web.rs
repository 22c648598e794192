// Browser smoke tests; run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::HtmlInputElement;

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> web_sys::Document {
    web_sys::window().unwrap().document().unwrap()
}

#[wasm_bindgen_test]
fn start_game_renders_grid_and_placeholders() {
    crossclue::start_game().unwrap();
    let doc = document();
    let inputs = doc.query_selector_all("#cc-board input").unwrap();
    // 4 x 7 rectangle for SHIP / PACKAGE.
    assert_eq!(inputs.length(), 28);
    let disabled = doc
        .query_selector_all("#cc-board input.unused-cell")
        .unwrap();
    assert_eq!(disabled.length(), 28 - 10);
    assert_eq!(doc.query_selector_all("#cc-board .clue-icon").unwrap().length(), 1);
    assert!(!crossclue::is_level_complete());
}

#[wasm_bindgen_test]
fn clue_button_fills_overlay() {
    crossclue::start_game().unwrap();
    let doc = document();
    let button: web_sys::HtmlElement = doc
        .query_selector("#cc-board .clue-icon")
        .unwrap()
        .unwrap()
        .dyn_into()
        .unwrap();
    button.click();
    let images = doc.query_selector_all("#cc-clue-overlay img").unwrap();
    assert_eq!(images.length(), 2);
}

#[wasm_bindgen_test]
fn first_input_is_enabled() {
    crossclue::start_game().unwrap();
    let first: HtmlInputElement = document()
        .query_selector("#cc-board input")
        .unwrap()
        .unwrap()
        .dyn_into()
        .unwrap();
    assert!(!first.disabled());
    assert!(crossclue::select_level(5).is_err());
}
