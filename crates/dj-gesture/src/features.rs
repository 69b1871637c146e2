use crate::GestureConfig;
use dj_base::Vec2;
use dj_hands::{HandLandmark, LandmarkFrame};
use std::time::Duration;

pub const FINGER_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finger {
    Thumb = 0,
    Index = 1,
    Middle = 2,
    Ring = 3,
    Pinky = 4,
}

impl Finger {
    pub const ALL: [Finger; FINGER_COUNT] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    pub fn tip(self) -> HandLandmark {
        match self {
            Finger::Thumb => HandLandmark::ThumbTip,
            Finger::Index => HandLandmark::IndexTip,
            Finger::Middle => HandLandmark::MiddleTip,
            Finger::Ring => HandLandmark::RingTip,
            Finger::Pinky => HandLandmark::PinkyTip,
        }
    }

    /// Joint the tip is compared against: the IP joint for the thumb, the
    /// PIP joint for the other fingers.
    pub fn reference(self) -> HandLandmark {
        match self {
            Finger::Thumb => HandLandmark::ThumbIp,
            Finger::Index => HandLandmark::IndexPip,
            Finger::Middle => HandLandmark::MiddlePip,
            Finger::Ring => HandLandmark::RingPip,
            Finger::Pinky => HandLandmark::PinkyPip,
        }
    }
}

/// Landmarks averaged into the palm centroid.
const PALM: [HandLandmark; 6] = [
    HandLandmark::Wrist,
    HandLandmark::ThumbCmc,
    HandLandmark::IndexMcp,
    HandLandmark::MiddleMcp,
    HandLandmark::RingMcp,
    HandLandmark::PinkyMcp,
];

/// Geometric summary of one frame's hand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    /// Extension flag per finger, indexed by [`Finger`].
    pub extended: [bool; FINGER_COUNT],
    pub centroid: Vec2<f32>,
    /// Centroid velocity in normalized units per second.
    pub velocity: Vec2<f32>,
    pub timestamp: Duration,
}

impl FeatureVector {
    pub fn is_extended(&self, finger: Finger) -> bool {
        self.extended[finger as usize]
    }

    pub fn extended_count(&self) -> usize {
        self.extended.iter().filter(|&&e| e).count()
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

/// Mean image-plane position of the wrist, thumb CMC and the four MCP
/// joints.
pub fn palm_centroid(frame: &LandmarkFrame) -> Vec2<f32> {
    let mut sum = Vec2::<f32>::zero();
    for landmark in PALM {
        sum += frame.point(landmark);
    }
    sum / PALM.len() as f32
}

fn finger_extended(frame: &LandmarkFrame, finger: Finger, centroid: Vec2<f32>, ratio: f32) -> bool {
    let tip = frame.point(finger.tip()).distance(centroid);
    let reference = frame.point(finger.reference()).distance(centroid);
    tip > ratio * reference
}

/// Turns landmark frames into feature vectors, remembering the previous
/// centroid for the velocity estimate.
pub struct FeatureExtractor {
    extension_ratio: f32,
    max_staleness: Duration,
    previous: Option<(Vec2<f32>, Duration)>,
}

impl FeatureExtractor {
    pub fn new(extension_ratio: f32, max_staleness: Duration) -> Self {
        Self {
            extension_ratio,
            max_staleness,
            previous: None,
        }
    }

    pub fn from_config(config: &GestureConfig) -> Self {
        Self::new(config.extension_ratio(), config.max_staleness())
    }

    /// Extract features from one frame.
    ///
    /// A missing hand, or one with any non-finite coordinate, yields `None`
    /// and breaks the velocity chain: the next hand starts from zero
    /// velocity.
    pub fn extract(&mut self, frame: Option<&LandmarkFrame>) -> Option<FeatureVector> {
        let frame = match frame {
            Some(frame) if frame.is_finite() => frame,
            Some(_) => {
                log::debug!("non-finite landmarks, treating frame as no hand");
                self.previous = None;
                return None;
            }
            None => {
                self.previous = None;
                return None;
            }
        };

        let centroid = palm_centroid(frame);
        let mut extended = [false; FINGER_COUNT];
        for finger in Finger::ALL {
            extended[finger as usize] =
                finger_extended(frame, finger, centroid, self.extension_ratio);
        }

        let velocity = self.velocity(centroid, frame.timestamp);
        self.previous = Some((centroid, frame.timestamp));

        Some(FeatureVector {
            extended,
            centroid,
            velocity,
            timestamp: frame.timestamp,
        })
    }

    fn velocity(&self, centroid: Vec2<f32>, timestamp: Duration) -> Vec2<f32> {
        let Some((previous, previous_timestamp)) = self.previous else {
            return Vec2::zero();
        };
        match timestamp.checked_sub(previous_timestamp) {
            Some(elapsed) if !elapsed.is_zero() && elapsed <= self.max_staleness => {
                (centroid - previous) / elapsed.as_secs_f32()
            }
            _ => Vec2::zero(),
        }
    }

    /// Forget the previous centroid.
    pub fn reset(&mut self) {
        self.previous = None;
    }
}
