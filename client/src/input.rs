use syncboard_shared::Point;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Draw,
    Pan,
}

impl Mode {
    pub fn cursor(self, dragging: bool) -> &'static str {
        match self {
            Mode::Draw => "crosshair",
            Mode::Pan if dragging => "grabbing",
            Mode::Pan => "grab",
        }
    }
}

/// One pointer event reduced to what the controller needs. Coordinates are
/// relative to the canvas' top-left corner, before any view translation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    pub pointer_id: i32,
    /// `0` is the main button; moves report `-1`.
    pub button: i16,
    pub is_primary: bool,
    pub x: f64,
    pub y: f64,
}

impl PointerSample {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Drag {
    Idle,
    Active { pointer_id: i32, last: Point },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputAction {
    Ignored,
    Pressed,
    Released,
    /// Draw mode: a segment between two canvas positions, untranslated.
    Segment { from: Point, to: Point },
    /// Pan mode: how far the pointer moved since the last sample.
    Pan { dx: f64, dy: f64 },
}

pub struct InputController {
    mode: Mode,
    drag: Drag,
}

impl Default for InputController {
    fn default() -> Self {
        Self::new()
    }
}

impl InputController {
    pub fn new() -> Self {
        Self {
            mode: Mode::default(),
            drag: Drag::Idle,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, Drag::Active { .. })
    }

    pub fn cursor(&self) -> &'static str {
        self.mode.cursor(self.is_dragging())
    }

    /// Switching modes drops any press in progress.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.drag = Drag::Idle;
    }

    pub fn press(&mut self, sample: PointerSample) -> InputAction {
        if sample.button != 0 || !sample.is_primary {
            return InputAction::Ignored;
        }
        self.drag = Drag::Active {
            pointer_id: sample.pointer_id,
            last: sample.position(),
        };
        InputAction::Pressed
    }

    pub fn motion(&mut self, sample: PointerSample) -> InputAction {
        let Drag::Active { pointer_id, last } = self.drag else {
            return InputAction::Ignored;
        };
        if sample.pointer_id != pointer_id {
            return InputAction::Ignored;
        }
        let next = sample.position();
        self.drag = Drag::Active {
            pointer_id,
            last: next,
        };
        match self.mode {
            Mode::Draw => InputAction::Segment {
                from: last,
                to: next,
            },
            Mode::Pan => InputAction::Pan {
                dx: next.x - last.x,
                dy: next.y - last.y,
            },
        }
    }

    pub fn release(&mut self, sample: PointerSample) -> InputAction {
        if sample.button != 0 {
            return InputAction::Ignored;
        }
        self.cancel(sample)
    }

    /// Pointer left the canvas or the browser cancelled it. Only the pointer
    /// that started the drag can end it.
    pub fn cancel(&mut self, sample: PointerSample) -> InputAction {
        match self.drag {
            Drag::Active { pointer_id, .. } if pointer_id == sample.pointer_id => {
                self.drag = Drag::Idle;
                InputAction::Released
            }
            _ => InputAction::Ignored,
        }
    }
}

#[cfg(test)]
#[path = "input_test.rs"]
mod tests;
