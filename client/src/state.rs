use syncboard_shared::{ClientMessage, Line, LinesSnapshot, Point, ServerMessage};

use crate::input::{InputAction, InputController, Mode, PointerSample};

/// Strokes in z-order. Appended to during a session, replaced on snapshot load.
#[derive(Debug, Default)]
pub struct LineStore {
    lines: Vec<Line>,
}

impl LineStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn replace(&mut self, lines: Vec<Line>) {
        self.lines = lines;
    }

    pub fn append(&mut self, line: Line) {
        self.lines.push(line);
    }
}

/// Local pan offset, applied at render time only.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewState {
    pub translate_x: f64,
    pub translate_y: f64,
}

impl ViewState {
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.translate_x += dx;
        self.translate_y += dy;
    }

    /// Screen position to board position.
    pub fn to_board(&self, point: Point) -> Point {
        Point::new(point.x - self.translate_x, point.y - self.translate_y)
    }
}

/// What a board mutation asks of the controller.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub enum Change {
    None,
    Lines,
    View,
    Cursor,
    Outgoing(ClientMessage),
}

impl Change {
    pub fn needs_redraw(&self) -> bool {
        matches!(self, Change::Lines | Change::View)
    }
}

pub struct Board {
    store: LineStore,
    view: ViewState,
    input: InputController,
    color: String,
    line_width: u32,
}

impl Board {
    pub fn new(color: impl Into<String>, line_width: u32) -> Self {
        Self {
            store: LineStore::new(),
            view: ViewState::default(),
            input: InputController::new(),
            color: color.into(),
            line_width,
        }
    }

    pub fn lines(&self) -> &[Line] {
        self.store.lines()
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn mode(&self) -> Mode {
        self.input.mode()
    }

    pub fn cursor(&self) -> &'static str {
        self.input.cursor()
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn set_color(&mut self, color: String) {
        self.color = color;
    }

    pub fn set_mode(&mut self, mode: Mode) -> Change {
        self.input.set_mode(mode);
        Change::Cursor
    }

    pub fn load_snapshot(&mut self, snapshot: LinesSnapshot) -> Change {
        self.store.replace(snapshot.lines);
        Change::Lines
    }

    pub fn receive(&mut self, message: ServerMessage) -> Change {
        self.store.append(message.data);
        Change::Lines
    }

    pub fn pointer_down(&mut self, sample: PointerSample) -> Change {
        let action = self.input.press(sample);
        self.apply_input(action)
    }

    pub fn pointer_move(&mut self, sample: PointerSample) -> Change {
        let action = self.input.motion(sample);
        self.apply_input(action)
    }

    pub fn pointer_up(&mut self, sample: PointerSample) -> Change {
        let action = self.input.release(sample);
        self.apply_input(action)
    }

    pub fn pointer_cancel(&mut self, sample: PointerSample) -> Change {
        let action = self.input.cancel(sample);
        self.apply_input(action)
    }

    fn apply_input(&mut self, action: InputAction) -> Change {
        match action {
            InputAction::Ignored => Change::None,
            InputAction::Pressed | InputAction::Released => Change::Cursor,
            // The store is only updated by the server's echo of this line.
            InputAction::Segment { from, to } => Change::Outgoing(ClientMessage::Line {
                data: Line::segment(
                    self.view.to_board(from),
                    self.view.to_board(to),
                    self.color.clone(),
                    self.line_width,
                ),
            }),
            InputAction::Pan { dx, dy } => {
                self.view.pan(dx, dy);
                Change::View
            }
        }
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
