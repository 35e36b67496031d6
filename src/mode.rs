// Interaction mode decided from the finger-up vector.

use std::fmt;

use crate::gesture::{Digit, FingersUp};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    Idle,
    /// Only the index finger is up: the fingertip is a pen.
    Drawing,
    /// Two or more fingers up: the fingertip picks from the menu.
    Selection,
}

impl Mode {
    /// Index alone → drawing; otherwise two or more up → selection; else idle.
    pub fn from_fingers(up: FingersUp) -> Self {
        let count = up.count();
        if count == 1 && up.is_up(Digit::Index) {
            Mode::Drawing
        } else if count >= 2 {
            Mode::Selection
        } else {
            Mode::Idle
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Idle => "IDLE",
            Mode::Drawing => "DRAWING",
            Mode::Selection => "SELECTION",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
