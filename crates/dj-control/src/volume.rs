/// Volume used when unmuting without a remembered level.
pub const UNMUTE_VOLUME: u8 = 50;

/// Locally tracked player volume, in percent.
///
/// Backends compute the next state, send it, and keep it only if the
/// player accepted it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeState {
    level: u8,
    before_mute: Option<u8>,
}

impl Default for VolumeState {
    fn default() -> Self {
        Self::new(UNMUTE_VOLUME)
    }
}

impl VolumeState {
    pub fn new(level: u8) -> Self {
        Self {
            level: level.min(100),
            before_mute: None,
        }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn is_muted(&self) -> bool {
        self.level == 0
    }

    /// The volume after changing it by `delta` points.
    pub fn adjusted(&self, delta: i32) -> Self {
        let level = (i32::from(self.level) + delta).clamp(0, 100) as u8;
        Self {
            level,
            before_mute: None,
        }
    }

    /// The volume after toggling mute: muting remembers the current level,
    /// unmuting restores it (or [`UNMUTE_VOLUME`] if there is none).
    pub fn mute_toggled(&self) -> Self {
        if self.level > 0 {
            Self {
                level: 0,
                before_mute: Some(self.level),
            }
        } else {
            Self {
                level: self.before_mute.unwrap_or(UNMUTE_VOLUME),
                before_mute: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjust_clamps() {
        let volume = VolumeState::new(95);
        assert_eq!(volume.adjusted(10).level(), 100);
        assert_eq!(volume.adjusted(-200).level(), 0);
        assert_eq!(VolumeState::new(250).level(), 100);
    }

    #[test]
    fn test_mute_restores_previous_level() {
        let muted = VolumeState::new(70).mute_toggled();
        assert!(muted.is_muted());
        assert_eq!(muted.mute_toggled().level(), 70);
    }

    #[test]
    fn test_unmute_without_memory_uses_default() {
        let volume = VolumeState::new(0);
        assert_eq!(volume.mute_toggled().level(), UNMUTE_VOLUME);

        // turning the volume down to zero is not a mute
        let down = VolumeState::new(10).adjusted(-10);
        assert_eq!(down.mute_toggled().level(), UNMUTE_VOLUME);
    }
}
