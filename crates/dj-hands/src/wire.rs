//! JSON shapes shared by the detector protocol and replay files.

use crate::{HandObservation, Handedness, LANDMARK_COUNT, Landmark, LandmarkFrame, Tick};
use dj_base::Vec3;
use serde::{Deserialize, Serialize};
use std::time::Duration;

fn full_visibility() -> f32 {
    1.0
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LandmarkJson {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    #[serde(default = "full_visibility")]
    pub visibility: f32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HandJson {
    #[serde(default)]
    pub handedness: String,
    pub score: f32,
    pub landmarks: Vec<LandmarkJson>,
}

/// One detector answer, one line of JSON.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct DetectionJson {
    #[serde(default)]
    pub hands: Vec<HandJson>,
    #[serde(default)]
    pub error: Option<String>,
}

/// One line of a replay file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TickRecord {
    Hand { t_us: u64, hand: HandJson },
    NoHand { t_us: u64 },
    Dropped,
}

impl Handedness {
    pub fn from_label(label: &str) -> Self {
        match label {
            "Left" | "left" => Handedness::Left,
            "Right" | "right" => Handedness::Right,
            _ => Handedness::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Handedness::Left => "Left",
            Handedness::Right => "Right",
            Handedness::Unknown => "Unknown",
        }
    }
}

impl HandJson {
    /// Convert to an observation. Hands without exactly 21 landmarks are
    /// rejected.
    pub fn into_observation(self) -> Option<HandObservation> {
        if self.landmarks.len() != LANDMARK_COUNT {
            log::warn!(
                "Expected {} landmarks, got {}",
                LANDMARK_COUNT,
                self.landmarks.len()
            );
            return None;
        }

        let mut landmarks = [Landmark::default(); LANDMARK_COUNT];
        for (slot, lm) in landmarks.iter_mut().zip(&self.landmarks) {
            *slot = Landmark {
                position: Vec3::new(lm.x, lm.y, lm.z),
                confidence: lm.visibility,
            };
        }

        Some(HandObservation {
            handedness: Handedness::from_label(&self.handedness),
            score: self.score,
            landmarks,
        })
    }

    pub fn from_frame(frame: &LandmarkFrame) -> Self {
        Self {
            handedness: frame.handedness.label().to_string(),
            score: frame.score,
            landmarks: frame
                .landmarks
                .iter()
                .map(|lm| LandmarkJson {
                    x: lm.position.x,
                    y: lm.position.y,
                    z: lm.position.z,
                    visibility: lm.confidence,
                })
                .collect(),
        }
    }
}

fn to_micros(timestamp: Duration) -> u64 {
    u64::try_from(timestamp.as_micros()).unwrap_or(u64::MAX)
}

impl From<&Tick> for TickRecord {
    fn from(tick: &Tick) -> Self {
        match tick {
            Tick::Hand(frame) => TickRecord::Hand {
                t_us: to_micros(frame.timestamp),
                hand: HandJson::from_frame(frame),
            },
            Tick::NoHand(timestamp) => TickRecord::NoHand {
                t_us: to_micros(*timestamp),
            },
            Tick::Dropped => TickRecord::Dropped,
        }
    }
}

impl From<TickRecord> for Tick {
    /// A recorded hand with a malformed landmark list replays as "no hand".
    fn from(record: TickRecord) -> Self {
        match record {
            TickRecord::Hand { t_us, hand } => {
                let timestamp = Duration::from_micros(t_us);
                match hand.into_observation() {
                    Some(observation) => Tick::Hand(observation.into_frame(timestamp)),
                    None => Tick::NoHand(timestamp),
                }
            }
            TickRecord::NoHand { t_us } => Tick::NoHand(Duration::from_micros(t_us)),
            TickRecord::Dropped => Tick::Dropped,
        }
    }
}
