use dj_base::{Vec2, Vec3};
use std::time::Duration;

/// Number of landmarks in the MediaPipe hand model
pub const LANDMARK_COUNT: usize = 21;

/// A single hand landmark with normalized position and confidence
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Landmark {
    /// `x`, `y` in [0.0, 1.0] relative to the frame size, `z` relative depth.
    pub position: Vec3<f32>,
    /// Per-landmark confidence (visibility) in [0.0, 1.0].
    pub confidence: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vec3::new(x, y, z),
            confidence: 1.0,
        }
    }
}

/// MediaPipe hand landmark indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandLandmark {
    Wrist = 0,
    ThumbCmc = 1,
    ThumbMcp = 2,
    ThumbIp = 3,
    ThumbTip = 4,
    IndexMcp = 5,
    IndexPip = 6,
    IndexDip = 7,
    IndexTip = 8,
    MiddleMcp = 9,
    MiddlePip = 10,
    MiddleDip = 11,
    MiddleTip = 12,
    RingMcp = 13,
    RingPip = 14,
    RingDip = 15,
    RingTip = 16,
    PinkyMcp = 17,
    PinkyPip = 18,
    PinkyDip = 19,
    PinkyTip = 20,
}

impl HandLandmark {
    /// Every landmark in index order.
    pub const ALL: [HandLandmark; LANDMARK_COUNT] = [
        HandLandmark::Wrist,
        HandLandmark::ThumbCmc,
        HandLandmark::ThumbMcp,
        HandLandmark::ThumbIp,
        HandLandmark::ThumbTip,
        HandLandmark::IndexMcp,
        HandLandmark::IndexPip,
        HandLandmark::IndexDip,
        HandLandmark::IndexTip,
        HandLandmark::MiddleMcp,
        HandLandmark::MiddlePip,
        HandLandmark::MiddleDip,
        HandLandmark::MiddleTip,
        HandLandmark::RingMcp,
        HandLandmark::RingPip,
        HandLandmark::RingDip,
        HandLandmark::RingTip,
        HandLandmark::PinkyMcp,
        HandLandmark::PinkyPip,
        HandLandmark::PinkyDip,
        HandLandmark::PinkyTip,
    ];
}

impl From<HandLandmark> for usize {
    fn from(landmark: HandLandmark) -> usize {
        landmark as usize
    }
}

impl TryFrom<usize> for HandLandmark {
    type Error = String;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        HandLandmark::ALL.get(value).copied().ok_or_else(|| {
            format!(
                "Invalid hand landmark index: {}. Must be in range 0-{}.",
                value,
                LANDMARK_COUNT - 1
            )
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Handedness {
    Left,
    Right,
    #[default]
    Unknown,
}

/// One hand as reported by the detector for one image.
#[derive(Debug, Clone, PartialEq)]
pub struct HandObservation {
    pub handedness: Handedness,
    /// Detection score for the whole hand.
    pub score: f32,
    pub landmarks: [Landmark; LANDMARK_COUNT],
}

impl HandObservation {
    /// Stamp the observation with its frame time.
    pub fn into_frame(self, timestamp: Duration) -> LandmarkFrame {
        LandmarkFrame {
            timestamp,
            handedness: self.handedness,
            score: self.score,
            landmarks: self.landmarks,
        }
    }
}

/// The primary hand's landmarks for one processed frame.
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkFrame {
    /// Monotonic time since the stream started.
    pub timestamp: Duration,
    pub handedness: Handedness,
    pub score: f32,
    pub landmarks: [Landmark; LANDMARK_COUNT],
}

impl LandmarkFrame {
    pub fn landmark(&self, index: HandLandmark) -> &Landmark {
        &self.landmarks[usize::from(index)]
    }

    /// Image-plane position of a landmark.
    pub fn point(&self, index: HandLandmark) -> Vec2<f32> {
        self.landmark(index).position.xy()
    }

    /// False if any coordinate is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.landmarks.iter().all(|l| l.position.is_finite())
    }
}
