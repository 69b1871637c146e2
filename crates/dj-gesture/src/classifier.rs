use crate::{FINGER_COUNT, FeatureVector, Gesture, GestureConfig};
use dj_base::Vec2;
use std::collections::VecDeque;

/// Classify one frame.
///
/// `history` holds the preceding feature vectors of the current
/// uninterrupted hand sighting, oldest first. Only its last
/// `motion_window - 1` entries are used, together with `current`, for
/// motion gestures.
///
/// Rules, first match wins:
///
/// 1. no hand: `None`
/// 2. all fingers extended and the hand is still: [`Gesture::OpenPalm`]
/// 3. no finger extended: [`Gesture::Fist`]
/// 4. full motion window with mean horizontal speed past `swipe_speed`:
///    [`Gesture::SwipeRight`] / [`Gesture::SwipeLeft`]
/// 5. full motion window with mean vertical speed past `move_speed`:
///    [`Gesture::MoveUp`] / [`Gesture::MoveDown`] (image y grows downward)
/// 6. otherwise `None`
///
/// A hand moving both sideways and vertically fast enough is a swipe.
pub fn classify(
    current: Option<&FeatureVector>,
    history: &[FeatureVector],
    config: &GestureConfig,
) -> Option<Gesture> {
    let current = current?;

    let extended = current.extended_count();
    if extended == FINGER_COUNT && current.speed() < config.stillness_speed() {
        return Some(Gesture::OpenPalm);
    }
    if extended == 0 {
        return Some(Gesture::Fist);
    }

    let mean = mean_velocity(current, history, config.motion_window())?;

    if mean.x > config.swipe_speed() {
        Some(Gesture::SwipeRight)
    } else if mean.x < -config.swipe_speed() {
        Some(Gesture::SwipeLeft)
    } else if mean.y < -config.move_speed() {
        Some(Gesture::MoveUp)
    } else if mean.y > config.move_speed() {
        Some(Gesture::MoveDown)
    } else {
        None
    }
}

/// Mean velocity over the last `window` frames, `None` until that many
/// frames have been seen.
fn mean_velocity(current: &FeatureVector, history: &[FeatureVector], window: usize) -> Option<Vec2<f32>> {
    let prior = window.saturating_sub(1);
    if window == 0 || history.len() < prior {
        return None;
    }

    let mut sum = current.velocity;
    for vector in &history[history.len() - prior..] {
        sum += vector.velocity;
    }
    Some(sum / window as f32)
}

/// [`classify`] plus the history it needs.
pub struct GestureClassifier {
    config: GestureConfig,
    history: VecDeque<FeatureVector>,
}

impl GestureClassifier {
    pub fn new(config: GestureConfig) -> Self {
        let capacity = config.motion_window().saturating_sub(1);
        Self {
            config,
            history: VecDeque::with_capacity(capacity),
        }
    }

    /// Classify the frame and remember it. A missing hand clears the
    /// history, so motion windows never span a gap.
    pub fn classify(&mut self, current: Option<&FeatureVector>) -> Option<Gesture> {
        let Some(current) = current else {
            self.history.clear();
            return None;
        };

        let label = classify(Some(current), self.history.make_contiguous(), &self.config);

        let keep = self.config.motion_window().saturating_sub(1);
        if keep > 0 {
            if self.history.len() == keep {
                self.history.pop_front();
            }
            self.history.push_back(*current);
        }

        label
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn reset(&mut self) {
        self.history.clear();
    }
}
