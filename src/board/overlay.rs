//! Draggable clue panel state. Pointer coordinates are viewport (client)
//! pixels; the panel is fixed-positioned so its corner lives in the same space.

pub const OVERLAY_START: (f64, f64) = (100.0, 100.0);
pub const OVERLAY_SIZE_PX: f64 = 900.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragState {
    Idle,
    /// Pointer offset from the panel's top-left corner captured at press time.
    Dragging { offset_x: f64, offset_y: f64 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClueOverlay {
    pub open: bool,
    pub content: Vec<String>,
    pub x: f64,
    pub y: f64,
    pub drag: DragState,
}

impl Default for ClueOverlay {
    fn default() -> Self {
        Self {
            open: false,
            content: Vec::new(),
            x: OVERLAY_START.0,
            y: OVERLAY_START.1,
            drag: DragState::Idle,
        }
    }
}

impl ClueOverlay {
    /// Show the panel with new content, back at its starting corner.
    pub fn open_with(&mut self, content: Vec<String>) {
        self.content = content;
        self.open = true;
        self.x = OVERLAY_START.0;
        self.y = OVERLAY_START.1;
        self.drag = DragState::Idle;
    }

    /// Hide without clearing content.
    pub fn close(&mut self) {
        self.open = false;
        self.drag = DragState::Idle;
    }

    pub fn press(&mut self, px: f64, py: f64) {
        if !self.open {
            return;
        }
        self.drag = DragState::Dragging {
            offset_x: px - self.x,
            offset_y: py - self.y,
        };
    }

    /// Returns true when the panel moved.
    pub fn pointer_move(&mut self, px: f64, py: f64) -> bool {
        match self.drag {
            DragState::Dragging { offset_x, offset_y } => {
                self.x = px - offset_x;
                self.y = py - offset_y;
                true
            }
            DragState::Idle => false,
        }
    }

    pub fn release(&mut self) {
        self.drag = DragState::Idle;
    }

    pub fn leave(&mut self) {
        self.drag = DragState::Idle;
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opened() -> ClueOverlay {
        let mut o = ClueOverlay::default();
        o.open_with(vec!["/a.webp".into()]);
        o
    }

    #[test]
    fn test_drag_preserves_press_offset() {
        let mut o = opened();
        o.press(150.0, 130.0);
        assert_eq!(
            o.drag,
            DragState::Dragging {
                offset_x: 50.0,
                offset_y: 30.0
            }
        );
        assert!(o.pointer_move(200.0, 180.0));
        assert_eq!((o.x, o.y), (150.0, 150.0));
    }

    #[test]
    fn test_move_without_press_is_ignored() {
        let mut o = opened();
        assert!(!o.pointer_move(400.0, 400.0));
        assert_eq!((o.x, o.y), OVERLAY_START);
    }

    #[test]
    fn test_release_and_leave_end_drag() {
        let mut o = opened();
        o.press(110.0, 110.0);
        o.release();
        assert!(!o.pointer_move(300.0, 300.0));

        o.press(110.0, 110.0);
        o.pointer_move(120.0, 140.0);
        o.leave();
        assert!(!o.is_dragging());
        assert_eq!((o.x, o.y), (110.0, 130.0));
    }

    #[test]
    fn test_close_keeps_content_and_reopen_resets_position() {
        let mut o = opened();
        o.press(100.0, 100.0);
        o.pointer_move(300.0, 250.0);
        o.close();
        assert!(!o.open);
        assert!(!o.is_dragging());
        assert_eq!(o.content, vec!["/a.webp".to_string()]);

        o.open_with(vec!["/b.webp".into()]);
        assert_eq!((o.x, o.y), OVERLAY_START);
        assert_eq!(o.content, vec!["/b.webp".to_string()]);
    }

    #[test]
    fn test_press_on_closed_panel_does_nothing() {
        let mut o = ClueOverlay::default();
        o.press(150.0, 130.0);
        assert_eq!(o.drag, DragState::Idle);
    }
}
