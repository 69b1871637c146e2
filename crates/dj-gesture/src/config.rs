use crate::{ConfigError, GESTURE_COUNT, Gesture};
use std::time::Duration;

/// What lets a confirmed, still-held gesture fire again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RearmPolicy {
    /// The gesture must be released (drop out of the label stream for at
    /// least one frame) and rise again. One hold, one action.
    #[default]
    OnRelease,
    /// A held gesture fires again each time its cooldown elapses.
    OnCooldown,
}

/// Settings for feature extraction, classification and debouncing.
///
/// Speeds are in normalized image units per second (the image is 1.0 wide
/// and 1.0 tall, y grows downward).
#[derive(Clone, Debug)]
pub struct GestureConfig {
    debounce_frames: u32,
    cooldowns: [Duration; GESTURE_COUNT],
    rearm: RearmPolicy,
    extension_ratio: f32,
    stillness_speed: f32,
    swipe_speed: f32,
    move_speed: f32,
    motion_window: usize,
    max_staleness: Duration,
}

impl Default for GestureConfig {
    fn default() -> Self {
        let mut cooldowns = [Duration::ZERO; GESTURE_COUNT];
        cooldowns[Gesture::OpenPalm.index()] = Duration::from_secs(2);
        cooldowns[Gesture::Fist.index()] = Duration::from_secs(2);
        cooldowns[Gesture::SwipeRight.index()] = Duration::from_secs(1);
        cooldowns[Gesture::SwipeLeft.index()] = Duration::from_secs(1);
        cooldowns[Gesture::MoveUp.index()] = Duration::from_millis(500);
        cooldowns[Gesture::MoveDown.index()] = Duration::from_millis(500);

        Self {
            debounce_frames: 3,
            cooldowns,
            rearm: RearmPolicy::OnRelease,
            extension_ratio: 1.15,
            stillness_speed: 0.15,
            swipe_speed: 0.5,
            move_speed: 0.5,
            motion_window: 3,
            max_staleness: Duration::from_millis(250),
        }
    }
}

impl GestureConfig {
    /// Number of consecutive frames a label must hold before it fires.
    pub fn with_debounce_frames(mut self, frames: u32) -> Self {
        self.debounce_frames = frames;
        self
    }

    /// Minimum spacing between two events of `gesture`.
    pub fn with_cooldown(mut self, gesture: Gesture, cooldown: Duration) -> Self {
        self.cooldowns[gesture.index()] = cooldown;
        self
    }

    pub fn with_rearm(mut self, rearm: RearmPolicy) -> Self {
        self.rearm = rearm;
        self
    }

    /// A finger is extended when its tip is this many times farther from
    /// the palm centroid than its reference joint.
    pub fn with_extension_ratio(mut self, ratio: f32) -> Self {
        self.extension_ratio = ratio;
        self
    }

    /// Open palm only counts while the centroid moves slower than this.
    pub fn with_stillness_speed(mut self, speed: f32) -> Self {
        self.stillness_speed = speed;
        self
    }

    /// Mean horizontal speed over the motion window needed for a swipe.
    pub fn with_swipe_speed(mut self, speed: f32) -> Self {
        self.swipe_speed = speed;
        self
    }

    /// Mean vertical speed over the motion window needed for a move.
    pub fn with_move_speed(mut self, speed: f32) -> Self {
        self.move_speed = speed;
        self
    }

    /// Number of consecutive frames (current included) averaged for motion
    /// gestures.
    pub fn with_motion_window(mut self, frames: usize) -> Self {
        self.motion_window = frames;
        self
    }

    /// Frames further apart than this report zero velocity.
    pub fn with_max_staleness(mut self, staleness: Duration) -> Self {
        self.max_staleness = staleness;
        self
    }

    // Getters
    pub fn debounce_frames(&self) -> u32 {
        self.debounce_frames
    }

    pub fn cooldown(&self, gesture: Gesture) -> Duration {
        self.cooldowns[gesture.index()]
    }

    pub fn rearm(&self) -> RearmPolicy {
        self.rearm
    }

    pub fn extension_ratio(&self) -> f32 {
        self.extension_ratio
    }

    pub fn stillness_speed(&self) -> f32 {
        self.stillness_speed
    }

    pub fn swipe_speed(&self) -> f32 {
        self.swipe_speed
    }

    pub fn move_speed(&self) -> f32 {
        self.move_speed
    }

    pub fn motion_window(&self) -> usize {
        self.motion_window
    }

    pub fn max_staleness(&self) -> Duration {
        self.max_staleness
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.debounce_frames == 0 {
            return Err(ConfigError::DebounceFrames);
        }
        if self.motion_window == 0 {
            return Err(ConfigError::MotionWindow);
        }
        if self.max_staleness.is_zero() {
            return Err(ConfigError::Staleness);
        }

        let thresholds = [
            ("extension_ratio", self.extension_ratio),
            ("stillness_speed", self.stillness_speed),
            ("swipe_speed", self.swipe_speed),
            ("move_speed", self.move_speed),
        ];
        for (name, value) in thresholds {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Threshold { name, value });
            }
        }

        Ok(())
    }
}
