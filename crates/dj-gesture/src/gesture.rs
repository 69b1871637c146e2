use std::{fmt, time::Duration};

pub const GESTURE_COUNT: usize = 6;

/// A recognized hand pose or motion.
///
/// A per-frame classification is an `Option<Gesture>`, `None` meaning no
/// gesture was recognized in that frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gesture {
    /// All five fingers extended, hand still.
    OpenPalm,
    SwipeRight,
    SwipeLeft,
    MoveUp,
    MoveDown,
    /// No finger extended.
    Fist,
}

impl Gesture {
    pub const ALL: [Gesture; GESTURE_COUNT] = [
        Gesture::OpenPalm,
        Gesture::SwipeRight,
        Gesture::SwipeLeft,
        Gesture::MoveUp,
        Gesture::MoveDown,
        Gesture::Fist,
    ];

    /// Position in [`Gesture::ALL`], used to index per-gesture tables.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Gesture::OpenPalm => "open_palm",
            Gesture::SwipeRight => "swipe_right",
            Gesture::SwipeLeft => "swipe_left",
            Gesture::MoveUp => "move_up",
            Gesture::MoveDown => "move_down",
            Gesture::Fist => "fist",
        }
    }

    /// Inverse of [`Gesture::name`].
    pub fn from_name(name: &str) -> Option<Gesture> {
        Gesture::ALL.into_iter().find(|g| g.name() == name)
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A confirmed gesture. Only the debouncer creates these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureEvent {
    pub gesture: Gesture,
    /// Timestamp of the frame that confirmed the gesture.
    pub timestamp: Duration,
}
