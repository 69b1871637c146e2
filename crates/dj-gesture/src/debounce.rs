use crate::{CooldownTable, GESTURE_COUNT, Gesture, GestureConfig, GestureEvent, RearmPolicy};
use std::time::Duration;

/// Debounce state of one gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Not in the label stream.
    #[default]
    Idle,
    /// In the label stream for this many consecutive frames, not fired yet.
    Rising(u32),
    /// Fired during the current hold.
    Confirmed,
}

/// Turns per-frame labels into gesture events.
///
/// Every gesture is tracked independently. A gesture fires once it has been
/// the label for `debounce_frames` consecutive frames and its cooldown has
/// elapsed; if it is still cooling down at that point it keeps rising and
/// fires on the first later frame of the same hold where the cooldown is
/// over. Any frame with a different label (or none) sends it back to idle.
///
/// While held after firing, [`RearmPolicy::OnRelease`] keeps it silent
/// until it is released; [`RearmPolicy::OnCooldown`] lets it fire again
/// whenever the cooldown elapses.
pub struct Debouncer {
    debounce_frames: u32,
    cooldowns: [Duration; GESTURE_COUNT],
    rearm: RearmPolicy,
    phases: [Phase; GESTURE_COUNT],
    table: CooldownTable,
}

impl Debouncer {
    pub fn new(config: &GestureConfig) -> Self {
        Self {
            debounce_frames: config.debounce_frames().max(1),
            cooldowns: Gesture::ALL.map(|g| config.cooldown(g)),
            rearm: config.rearm(),
            phases: [Phase::Idle; GESTURE_COUNT],
            table: CooldownTable::new(),
        }
    }

    /// Feed one frame's label. Returns the event this frame confirmed, if
    /// any.
    pub fn observe(&mut self, label: Option<Gesture>, timestamp: Duration) -> Option<GestureEvent> {
        let mut event = None;
        for gesture in Gesture::ALL {
            if label == Some(gesture) {
                event = self.advance(gesture, timestamp);
            } else {
                self.phases[gesture.index()] = Phase::Idle;
            }
        }
        event
    }

    fn advance(&mut self, gesture: Gesture, timestamp: Duration) -> Option<GestureEvent> {
        let count = match self.phases[gesture.index()] {
            Phase::Idle => 1,
            Phase::Rising(count) => count.saturating_add(1),
            Phase::Confirmed => match self.rearm {
                RearmPolicy::OnRelease => return None,
                RearmPolicy::OnCooldown => self.debounce_frames,
            },
        };

        if count < self.debounce_frames {
            self.phases[gesture.index()] = Phase::Rising(count);
            return None;
        }

        if !self.table.is_ready(gesture, timestamp) {
            if self.phases[gesture.index()] != Phase::Confirmed {
                log::debug!("{} held but cooling down, not firing", gesture);
                self.phases[gesture.index()] = Phase::Rising(count);
            }
            return None;
        }

        self.table.arm(gesture, timestamp, self.cooldowns[gesture.index()]);
        self.phases[gesture.index()] = Phase::Confirmed;
        Some(GestureEvent { gesture, timestamp })
    }

    pub fn phase(&self, gesture: Gesture) -> Phase {
        self.phases[gesture.index()]
    }

    pub fn cooldowns(&self) -> &CooldownTable {
        &self.table
    }

    /// Send every gesture back to idle. The cooldown table is kept.
    pub fn release_all(&mut self) {
        self.phases = [Phase::Idle; GESTURE_COUNT];
    }
}
