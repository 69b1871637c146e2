use dj_gesture::Gesture;
use std::fmt;

/// Player command bound to a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    TogglePlayPause,
    NextTrack,
    PreviousTrack,
    VolumeUp,
    VolumeDown,
    ToggleMute,
}

impl Action {
    pub fn for_gesture(gesture: Gesture) -> Action {
        match gesture {
            Gesture::OpenPalm => Action::TogglePlayPause,
            Gesture::SwipeRight => Action::NextTrack,
            Gesture::SwipeLeft => Action::PreviousTrack,
            Gesture::MoveUp => Action::VolumeUp,
            Gesture::MoveDown => Action::VolumeDown,
            Gesture::Fist => Action::ToggleMute,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::TogglePlayPause => "play/pause",
            Action::NextTrack => "next track",
            Action::PreviousTrack => "previous track",
            Action::VolumeUp => "volume up",
            Action::VolumeDown => "volume down",
            Action::ToggleMute => "mute",
        };
        f.write_str(name)
    }
}
