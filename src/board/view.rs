//! Browser projection of [`GameState`]: level buttons, the cell grid, the clue
//! overlay and the celebration canvas.
//!
//! Every listener borrows `BOARD_VIEW`, applies one state update and releases
//! the borrow before doing anything that can fire another event
//! (`focus()` in particular).

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlElement, HtmlImageElement,
    HtmlInputElement, MouseEvent, window,
};

use super::overlay::OVERLAY_SIZE_PX;
use super::state::GameState;
use super::{CellPos, LevelDesc, levels};
use crate::celebrate::Celebration;

pub const ROOT_ID: &str = "cc-game";
pub const LEVELS_ID: &str = "cc-levels";
pub const BOARD_ID: &str = "cc-board";
pub const OVERLAY_ID: &str = "cc-clue-overlay";
const OVERLAY_IMAGES_ID: &str = "cc-clue-images";
pub const CELEBRATION_ID: &str = "cc-celebration";

type Listener = Closure<dyn FnMut(web_sys::Event)>;

struct BoardView {
    doc: Document,
    state: GameState,
    inputs: HashMap<CellPos, HtmlInputElement>,
    cell_divs: HashMap<CellPos, Element>,
    // Dropped (and replaced) whenever the grid is rebuilt.
    grid_listeners: Vec<Listener>,
}

thread_local! {
    static BOARD_VIEW: RefCell<Option<BoardView>> = const { RefCell::new(None) };
    static CELEBRATION: RefCell<Option<Celebration>> = const { RefCell::new(None) };
}

fn with_view<R>(f: impl FnOnce(&mut BoardView) -> R) -> Option<R> {
    BOARD_VIEW.with(|cell| cell.borrow_mut().as_mut().map(f))
}

pub fn is_level_complete() -> bool {
    with_view(|v| v.state.complete).unwrap_or(false)
}

// --- Entry -------------------------------------------------------------------

pub fn start_board_mode() -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let body = doc.body().ok_or_else(|| JsValue::from_str("no body"))?;

    let root = ensure_child(&doc, &body, "div", ROOT_ID)?;
    root.set_class_name("game-container");
    let level_bar = ensure_child(&doc, &root, "div", LEVELS_ID)?;
    level_bar.set_class_name("level-selection");
    let board = ensure_child(&doc, &root, "div", BOARD_ID)?;
    board.set_class_name("game-board");

    level_bar.set_inner_html("");
    for (idx, level) in levels().iter().enumerate() {
        let button = doc.create_element("button")?;
        button.set_text_content(Some(level.title.as_str()));
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            if let Err(err) = select_level(idx) {
                log::warn!("level select failed: {:?}", err);
            }
        }) as Box<dyn FnMut(_)>);
        button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        level_bar.append_child(&button)?;
    }

    if doc.get_element_by_id(OVERLAY_ID).is_none() {
        build_overlay(&doc, &body)?;
    }
    if doc.get_element_by_id(CELEBRATION_ID).is_none() {
        let canvas = doc.create_element("canvas")?;
        canvas.set_id(CELEBRATION_ID);
        canvas.set_attribute(
            "style",
            "position:fixed; left:0; top:0; pointer-events:none; z-index:2000; display:none;",
        )?;
        body.append_child(&canvas)?;
    }

    let level = levels()
        .first()
        .copied()
        .ok_or_else(|| JsValue::from_str("no levels"))?;
    log::info!("starting with level '{}'", level.title);
    let view = BoardView {
        doc,
        state: GameState::new(level),
        inputs: HashMap::new(),
        cell_divs: HashMap::new(),
        grid_listeners: Vec::new(),
    };
    BOARD_VIEW.with(|b| b.replace(Some(view)));

    with_view(|v| -> Result<(), JsValue> {
        v.render_grid()?;
        v.sync_overlay_content()?;
        v.sync_overlay_position()
    })
    .unwrap_or(Ok(()))
}

pub fn select_level(index: usize) -> Result<(), JsValue> {
    let level = levels().get(index).copied().ok_or_else(|| {
        log::warn!("no level at index {}", index);
        JsValue::from_str(&format!("no level at index {index}"))
    })?;
    switch_level(level)
}

/// Switch to `level` and rebuild the grid. Re-selecting the current level does nothing.
pub fn switch_level(level: &'static LevelDesc) -> Result<(), JsValue> {
    with_view(|v| {
        if v.state.set_level(level) {
            v.render_grid()
        } else {
            Ok(())
        }
    })
    .unwrap_or_else(|| Err(JsValue::from_str("board not started")))
}

fn ensure_child(doc: &Document, parent: &Element, tag: &str, id: &str) -> Result<Element, JsValue> {
    if let Some(el) = doc.get_element_by_id(id) {
        return Ok(el);
    }
    let el = doc.create_element(tag)?;
    el.set_id(id);
    parent.append_child(&el)?;
    Ok(el)
}

// --- Grid --------------------------------------------------------------------

impl BoardView {
    fn render_grid(&mut self) -> Result<(), JsValue> {
        let board = self
            .doc
            .get_element_by_id(BOARD_ID)
            .ok_or_else(|| JsValue::from_str("no board element"))?;
        board.set_inner_html("");
        self.inputs.clear();
        self.cell_divs.clear();
        self.grid_listeners.clear();

        let (width, height) = (self.state.grid.width, self.state.grid.height);
        for row in 1..=height {
            let row_div = self.doc.create_element("div")?;
            row_div.set_class_name("grid-row");
            for col in 1..=width {
                let pos = CellPos::new(row, col);
                let cell_div = self.render_cell(pos)?;
                row_div.append_child(&cell_div)?;
            }
            board.append_child(&row_div)?;
        }
        Ok(())
    }

    fn render_cell(&mut self, pos: CellPos) -> Result<Element, JsValue> {
        let cell = self.state.grid.cell(pos).copied();
        let is_intersection = self.state.level.intersection_at(pos).is_some();

        let div = self.doc.create_element("div")?;
        div.set_class_name("grid-cell");
        let classes = div.class_list();
        classes.toggle_with_force("intersection", is_intersection)?;
        classes.toggle_with_force("correct-guess", cell.is_some_and(|c| c.is_correct()))?;

        if is_intersection {
            let button = self.doc.create_element("button")?;
            button.set_class_name("clue-icon");
            button.set_text_content(Some("?"));
            self.listen(&button, "click", move |_| on_clue_click(pos))?;
            div.append_child(&button)?;
        }

        let input: HtmlInputElement = self.doc.create_element("input")?.dyn_into()?;
        input.set_type("text");
        input.set_max_length(1);
        match cell {
            Some(cell) => {
                input.set_class_name("input");
                input.set_value(&cell.guess.map(String::from).unwrap_or_default());
                self.listen(&input, "input", move |evt| on_cell_input(pos, evt))?;
                self.listen(&input, "focus", move |_| on_cell_focus(pos))?;
                self.inputs.insert(pos, input.clone());
            }
            None => {
                input.set_class_name("input unused-cell");
                input.set_disabled(true);
            }
        }
        div.append_child(&input)?;
        self.cell_divs.insert(pos, div.clone());
        Ok(div)
    }

    fn listen(
        &mut self,
        target: &Element,
        event: &str,
        handler: impl FnMut(web_sys::Event) + 'static,
    ) -> Result<(), JsValue> {
        let closure: Listener =
            Closure::wrap(Box::new(handler) as Box<dyn FnMut(web_sys::Event)>);
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        self.grid_listeners.push(closure);
        Ok(())
    }

    /// Push one cell's normalized guess and correctness back into the DOM.
    fn refresh_cell(&self, pos: CellPos) {
        let Some(cell) = self.state.grid.cell(pos) else {
            return;
        };
        if let Some(input) = self.inputs.get(&pos) {
            input.set_value(&cell.guess.map(String::from).unwrap_or_default());
        }
        if let Some(div) = self.cell_divs.get(&pos) {
            div.class_list()
                .toggle_with_force("correct-guess", cell.is_correct())
                .ok();
        }
    }
}

fn on_cell_input(pos: CellPos, evt: web_sys::Event) {
    let Some(input) = evt
        .target()
        .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
    else {
        return;
    };
    let raw = input.value();
    let Some((just_completed, next)) = with_view(|v| {
        let outcome = v.state.key_input(pos, &raw);
        v.refresh_cell(pos);
        let next = outcome
            .next_focus
            .and_then(|p| v.inputs.get(&p).cloned());
        (outcome.just_completed, next)
    }) else {
        return;
    };
    // Borrow released: focusing fires the next cell's focus listener.
    if let Some(next) = next {
        next.focus().ok();
    }
    if just_completed {
        start_celebration();
    }
}

fn on_cell_focus(pos: CellPos) {
    with_view(|v| v.state.focus(pos));
}

fn on_clue_click(pos: CellPos) {
    let result = with_view(|v| -> Result<(), JsValue> {
        if v.state.select_intersection(pos) {
            v.sync_overlay_content()?;
            v.sync_overlay_position()?;
        }
        Ok(())
    });
    if let Some(Err(err)) = result {
        log::warn!("failed to show clues: {:?}", err);
    }
}

// --- Clue overlay ------------------------------------------------------------

fn build_overlay(doc: &Document, body: &HtmlElement) -> Result<(), JsValue> {
    let panel = doc.create_element("div")?;
    panel.set_id(OVERLAY_ID);
    panel.set_class_name("clue-display-area");
    let images = doc.create_element("div")?;
    images.set_id(OVERLAY_IMAGES_ID);
    panel.append_child(&images)?;

    let close = doc.create_element("button")?;
    close.set_text_content(Some("Close"));
    close.set_attribute("style", "margin-top:10px; display:block; width:100%;")?;
    let on_close = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
        with_view(|v| {
            v.state.overlay.close();
            v.sync_overlay_position().ok();
        });
    }) as Box<dyn FnMut(_)>);
    close.add_event_listener_with_callback("click", on_close.as_ref().unchecked_ref())?;
    on_close.forget();
    panel.append_child(&close)?;

    let on_down = Closure::wrap(Box::new(move |evt: MouseEvent| {
        // Keep the browser from starting a native image drag.
        evt.prevent_default();
        let (x, y) = (evt.client_x() as f64, evt.client_y() as f64);
        with_view(|v| v.state.overlay.press(x, y));
    }) as Box<dyn FnMut(_)>);
    panel.add_event_listener_with_callback("mousedown", on_down.as_ref().unchecked_ref())?;
    on_down.forget();

    let on_move = Closure::wrap(Box::new(move |evt: MouseEvent| {
        let (x, y) = (evt.client_x() as f64, evt.client_y() as f64);
        with_view(|v| {
            if v.state.overlay.pointer_move(x, y) {
                v.sync_overlay_position().ok();
            }
        });
    }) as Box<dyn FnMut(_)>);
    panel.add_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref())?;
    on_move.forget();

    let on_up = Closure::wrap(Box::new(move |_evt: MouseEvent| {
        with_view(|v| v.state.overlay.release());
    }) as Box<dyn FnMut(_)>);
    panel.add_event_listener_with_callback("mouseup", on_up.as_ref().unchecked_ref())?;
    on_up.forget();

    let on_leave = Closure::wrap(Box::new(move |_evt: MouseEvent| {
        with_view(|v| v.state.overlay.leave());
    }) as Box<dyn FnMut(_)>);
    panel.add_event_listener_with_callback("mouseleave", on_leave.as_ref().unchecked_ref())?;
    on_leave.forget();

    body.append_child(&panel)?;
    Ok(())
}

impl BoardView {
    fn sync_overlay_position(&self) -> Result<(), JsValue> {
        let Some(panel) = self.doc.get_element_by_id(OVERLAY_ID) else {
            return Ok(());
        };
        let o = &self.state.overlay;
        let display = if o.open { "block" } else { "none" };
        panel.set_attribute(
            "style",
            &format!(
                "position:fixed; left:{}px; top:{}px; width:{size}px; height:{size}px; \
                 display:{display}; cursor:move; overflow:auto; z-index:1000; \
                 background:white; border:1px solid #ccc; padding:20px;",
                o.x,
                o.y,
                size = OVERLAY_SIZE_PX,
            ),
        )
    }

    fn sync_overlay_content(&self) -> Result<(), JsValue> {
        let Some(images) = self.doc.get_element_by_id(OVERLAY_IMAGES_ID) else {
            return Ok(());
        };
        images.set_inner_html("");
        for (i, src) in self.state.overlay.content.iter().enumerate() {
            let img: HtmlImageElement = self.doc.create_element("img")?.dyn_into()?;
            img.set_src(src);
            img.set_alt(&format!("Clue {}", i + 1));
            images.append_child(&img)?;
        }
        Ok(())
    }
}

// --- Celebration -------------------------------------------------------------

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn celebration_canvas() -> Option<HtmlCanvasElement> {
    window()?
        .document()?
        .get_element_by_id(CELEBRATION_ID)?
        .dyn_into()
        .ok()
}

fn start_celebration() {
    let Some(win) = window() else {
        return;
    };
    let Some(canvas) = celebration_canvas() else {
        return;
    };
    let now = win.performance().map(|p| p.now()).unwrap_or(0.0);
    let width = win
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(800.0);
    let height = win
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(600.0);
    canvas.set_width(width as u32);
    canvas.set_height(height as u32);
    canvas.style().set_property("display", "block").ok();

    let already_running = CELEBRATION.with(|cell| {
        cell.borrow_mut()
            .replace(Celebration::new(now, width, height, now.to_bits()))
            .is_some()
    });
    if !already_running {
        start_celebration_loop();
    }
}

fn start_celebration_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        let ctx: Option<CanvasRenderingContext2d> = celebration_canvas()
            .and_then(|c| c.get_context("2d").ok().flatten())
            .and_then(|c| c.dyn_into().ok());
        let running = CELEBRATION.with(|cell| {
            let mut slot = cell.borrow_mut();
            let Some(c) = slot.as_mut() else {
                return false;
            };
            if c.is_finished(ts) {
                *slot = None;
                return false;
            }
            c.tick(ts);
            if let Some(ctx) = &ctx {
                c.draw(ctx, ts);
            }
            true
        });
        if !running {
            if let Some(canvas) = celebration_canvas() {
                canvas.style().set_property("display", "none").ok();
            }
            let _ = f.borrow_mut().take();
            return;
        }
        if let (Some(w), Some(cb)) = (window(), f.borrow().as_ref()) {
            if let Err(err) = w.request_animation_frame(cb.as_ref().unchecked_ref()) {
                log::warn!("celebration frame not scheduled: {:?}", err);
                stop_celebration();
            }
        }
    }) as Box<dyn FnMut(f64)>));
    if let (Some(w), Some(cb)) = (window(), g.borrow().as_ref()) {
        if let Err(err) = w.request_animation_frame(cb.as_ref().unchecked_ref()) {
            log::warn!("celebration loop not started: {:?}", err);
            stop_celebration();
        }
    }
}

/// Drop the running celebration and hide its canvas.
fn stop_celebration() {
    CELEBRATION.with(|cell| cell.borrow_mut().take());
    if let Some(canvas) = celebration_canvas() {
        canvas.style().set_property("display", "none").ok();
    }
}
