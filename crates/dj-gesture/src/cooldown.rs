use crate::{GESTURE_COUNT, Gesture};
use std::time::Duration;

/// Earliest time each gesture may fire again.
///
/// Starts empty: every gesture is eligible until it first fires.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CooldownTable {
    next_eligible: [Option<Duration>; GESTURE_COUNT],
}

impl CooldownTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if `gesture` may fire at `timestamp`.
    pub fn is_ready(&self, gesture: Gesture, timestamp: Duration) -> bool {
        match self.next_eligible[gesture.index()] {
            Some(next) => timestamp >= next,
            None => true,
        }
    }

    /// Record that `gesture` fired at `timestamp`.
    pub fn arm(&mut self, gesture: Gesture, timestamp: Duration, cooldown: Duration) {
        self.next_eligible[gesture.index()] = Some(timestamp.saturating_add(cooldown));
    }

    pub fn next_eligible(&self, gesture: Gesture) -> Option<Duration> {
        self.next_eligible[gesture.index()]
    }
}
