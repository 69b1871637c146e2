use crate::{
    ConfigError, Debouncer, FeatureExtractor, GestureClassifier, GestureConfig, GestureEvent,
};
use dj_hands::{LandmarkFrame, Tick};
use std::time::Duration;

/// Feature extraction, classification and debouncing chained together.
pub struct GesturePipeline {
    extractor: FeatureExtractor,
    classifier: GestureClassifier,
    debouncer: Debouncer,
    last_timestamp: Duration,
}

impl GesturePipeline {
    /// Build a pipeline; the configuration is validated first.
    pub fn new(config: GestureConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            extractor: FeatureExtractor::from_config(&config),
            debouncer: Debouncer::new(&config),
            classifier: GestureClassifier::new(config),
            last_timestamp: Duration::ZERO,
        })
    }

    /// Process one frame's primary hand, or `None` for a frame without one.
    pub fn process(&mut self, frame: Option<&LandmarkFrame>) -> Option<GestureEvent> {
        let timestamp = frame.map_or(self.last_timestamp, |f| f.timestamp);
        self.step(frame, timestamp)
    }

    /// Process one tick of a hand stream. Dropped frames change nothing.
    pub fn process_tick(&mut self, tick: &Tick) -> Option<GestureEvent> {
        match tick {
            Tick::Hand(frame) => self.step(Some(frame), frame.timestamp),
            Tick::NoHand(timestamp) => self.step(None, *timestamp),
            Tick::Dropped => None,
        }
    }

    fn step(&mut self, frame: Option<&LandmarkFrame>, timestamp: Duration) -> Option<GestureEvent> {
        self.last_timestamp = timestamp;

        let features = self.extractor.extract(frame);
        let label = self.classifier.classify(features.as_ref());
        if let Some(gesture) = label {
            log::trace!("{:?}: {}", timestamp, gesture);
        }

        let event = self.debouncer.observe(label, timestamp);
        if let Some(event) = &event {
            log::info!(
                "gesture {} confirmed at {:.3}s",
                event.gesture,
                event.timestamp.as_secs_f64()
            );
        }
        event
    }

    pub fn debouncer(&self) -> &Debouncer {
        &self.debouncer
    }
}
