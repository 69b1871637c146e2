#![allow(dead_code)]

use dj_hands::{HandLandmark, Handedness, LANDMARK_COUNT, Landmark, LandmarkFrame};
use std::time::Duration;

pub const OPEN: [bool; 5] = [true; 5];
pub const FIST: [bool; 5] = [false; 5];
pub const POINTING: [bool; 5] = [false, true, false, false, false];

pub fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

/// A synthetic right hand whose palm sits around (`x`, `y`), with the
/// given fingers (thumb first) stretched out and the rest curled in.
/// Its palm centroid is (`x` + 0.01 / 6, `y`).
pub fn hand(x: f32, y: f32, extended: [bool; 5], at: Duration) -> LandmarkFrame {
    use HandLandmark::*;

    let mut landmarks = [Landmark::new(x, y, 0.0); LANDMARK_COUNT];
    let mut set = |index: HandLandmark, dx: f32, dy: f32| {
        landmarks[usize::from(index)] = Landmark::new(x + dx, y + dy, 0.0);
    };

    set(Wrist, 0.0, 0.10);
    set(ThumbCmc, -0.05, 0.06);
    set(ThumbMcp, -0.08, 0.04);
    set(ThumbIp, -0.10, 0.02);
    set(IndexMcp, -0.03, -0.04);
    set(IndexPip, -0.03, -0.09);
    set(MiddleMcp, 0.0, -0.05);
    set(MiddlePip, 0.0, -0.10);
    set(RingMcp, 0.03, -0.04);
    set(RingPip, 0.03, -0.09);
    set(PinkyMcp, 0.06, -0.03);
    set(PinkyPip, 0.06, -0.07);

    if extended[0] {
        set(ThumbTip, -0.14, -0.01);
    } else {
        set(ThumbTip, -0.02, 0.01);
    }
    if extended[1] {
        set(IndexDip, -0.03, -0.12);
        set(IndexTip, -0.03, -0.16);
    } else {
        set(IndexDip, -0.03, -0.06);
        set(IndexTip, -0.03, -0.03);
    }
    if extended[2] {
        set(MiddleDip, 0.0, -0.14);
        set(MiddleTip, 0.0, -0.18);
    } else {
        set(MiddleDip, 0.0, -0.07);
        set(MiddleTip, 0.0, -0.03);
    }
    if extended[3] {
        set(RingDip, 0.03, -0.12);
        set(RingTip, 0.03, -0.16);
    } else {
        set(RingDip, 0.03, -0.06);
        set(RingTip, 0.03, -0.03);
    }
    if extended[4] {
        set(PinkyDip, 0.06, -0.10);
        set(PinkyTip, 0.06, -0.12);
    } else {
        set(PinkyDip, 0.06, -0.05);
        set(PinkyTip, 0.05, -0.02);
    }

    LandmarkFrame {
        timestamp: at,
        handedness: Handedness::Right,
        score: 0.95,
        landmarks,
    }
}

/// `count` frames of the same still pose, 33 ms apart from `start`.
pub fn hold(extended: [bool; 5], start: Duration, count: u64) -> Vec<LandmarkFrame> {
    (0..count)
        .map(|i| hand(0.5, 0.5, extended, start + ms(33 * i)))
        .collect()
}

/// `count` frames of a pose moving by (`dx`, `dy`) every 33 ms.
pub fn sweep(extended: [bool; 5], start: Duration, count: u64, dx: f32, dy: f32) -> Vec<LandmarkFrame> {
    (0..count)
        .map(|i| {
            let step = i as f32;
            hand(0.3 + dx * step, 0.5 + dy * step, extended, start + ms(33 * i))
        })
        .collect()
}
