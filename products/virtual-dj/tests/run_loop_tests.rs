use dj_base::StopSignal;
use dj_control::{BackendError, Dispatcher, MediaBackend};
use dj_gesture::{GestureConfig, GesturePipeline};
use dj_hands::{HandError, HandLandmark, HandStream, Handedness, LANDMARK_COUNT, Landmark, LandmarkFrame, Tick};
use std::collections::VecDeque;
use std::time::Duration;
use virtual_dj::{StopReason, run_loop};

/// Plays a fixed list of ticks, then ends or fails.
struct ScriptedStream {
    ticks: VecDeque<Tick>,
    fail_at_end: bool,
    stop_after: Option<(usize, StopSignal)>,
    served: usize,
}

impl ScriptedStream {
    fn new(ticks: Vec<Tick>) -> Self {
        Self {
            ticks: ticks.into(),
            fail_at_end: false,
            stop_after: None,
            served: 0,
        }
    }
}

impl HandStream for ScriptedStream {
    async fn next_tick(&mut self) -> Result<Option<Tick>, HandError> {
        if let Some((count, stop)) = &self.stop_after {
            if self.served == *count {
                stop.raise();
            }
        }
        self.served += 1;
        match self.ticks.pop_front() {
            Some(tick) => Ok(Some(tick)),
            None if self.fail_at_end => Err(HandError::Io(std::io::Error::other("camera unplugged"))),
            None => Ok(None),
        }
    }
}

#[derive(Default)]
struct RecordingBackend {
    calls: Vec<&'static str>,
}

impl MediaBackend for RecordingBackend {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn toggle_play_pause(&mut self) -> Result<(), BackendError> {
        self.calls.push("toggle_play_pause");
        Ok(())
    }

    async fn next_track(&mut self) -> Result<(), BackendError> {
        self.calls.push("next_track");
        Ok(())
    }

    async fn previous_track(&mut self) -> Result<(), BackendError> {
        self.calls.push("previous_track");
        Ok(())
    }

    async fn set_volume(&mut self, _delta: i32) -> Result<(), BackendError> {
        self.calls.push("set_volume");
        Ok(())
    }

    async fn toggle_mute(&mut self) -> Result<(), BackendError> {
        self.calls.push("toggle_mute");
        Ok(())
    }
}

/// A still hand at the image center with every finger either fully
/// stretched out or curled onto the palm.
fn hand(open: bool, millis: u64) -> Tick {
    use HandLandmark::*;

    let mut landmarks = [Landmark::new(0.5, 0.5, 0.0); LANDMARK_COUNT];
    if open {
        let fingers = [
            (ThumbIp, ThumbTip, -1.0, 0.0),
            (IndexPip, IndexTip, -0.4, -1.0),
            (MiddlePip, MiddleTip, 0.0, -1.0),
            (RingPip, RingTip, 0.4, -1.0),
            (PinkyPip, PinkyTip, 0.8, -1.0),
        ];
        for (reference, tip, dx, dy) in fingers {
            landmarks[usize::from(reference)] = Landmark::new(0.5 + dx * 0.05, 0.5 + dy * 0.05, 0.0);
            landmarks[usize::from(tip)] = Landmark::new(0.5 + dx * 0.2, 0.5 + dy * 0.2, 0.0);
        }
    }

    Tick::Hand(LandmarkFrame {
        timestamp: Duration::from_millis(millis),
        handedness: Handedness::Right,
        score: 0.9,
        landmarks,
    })
}

fn setup() -> (GesturePipeline, Dispatcher<RecordingBackend>) {
    let pipeline = GesturePipeline::new(GestureConfig::default()).unwrap();
    (pipeline, Dispatcher::new(RecordingBackend::default()))
}

#[tokio::test]
async fn test_open_palm_toggles_playback_once() {
    let (mut pipeline, mut dispatcher) = setup();
    let ticks = (0..10).map(|i| hand(true, i * 33)).collect();
    let mut stream = ScriptedStream::new(ticks);

    let summary = run_loop(&mut stream, &mut pipeline, &mut dispatcher, &StopSignal::new())
        .await
        .unwrap();

    assert_eq!(dispatcher.backend().calls, vec!["toggle_play_pause"]);
    assert_eq!(summary.reason, StopReason::StreamEnded);
    assert_eq!(summary.ticks, 10);
    assert_eq!(summary.hands, 10);
    assert_eq!(summary.events, 1);
    assert_eq!(summary.dispatch.succeeded, 1);
}

#[tokio::test]
async fn test_fist_after_release_mutes() {
    let (mut pipeline, mut dispatcher) = setup();
    let mut ticks: Vec<Tick> = (0..3).map(|i| hand(true, i * 33)).collect();
    ticks.push(Tick::NoHand(Duration::from_millis(99)));
    ticks.extend((4..8).map(|i| hand(false, i * 33)));
    let mut stream = ScriptedStream::new(ticks);

    let summary = run_loop(&mut stream, &mut pipeline, &mut dispatcher, &StopSignal::new())
        .await
        .unwrap();

    assert_eq!(dispatcher.backend().calls, vec!["toggle_play_pause", "toggle_mute"]);
    assert_eq!(summary.hands, 7);
    assert_eq!(summary.events, 2);
}

#[tokio::test]
async fn test_dropped_ticks_are_counted_and_ignored() {
    let (mut pipeline, mut dispatcher) = setup();
    let ticks = vec![
        hand(true, 0),
        Tick::Dropped,
        hand(true, 33),
        Tick::Dropped,
        Tick::Dropped,
        hand(true, 66),
    ];
    let mut stream = ScriptedStream::new(ticks);

    let summary = run_loop(&mut stream, &mut pipeline, &mut dispatcher, &StopSignal::new())
        .await
        .unwrap();

    assert_eq!(summary.ticks, 6);
    assert_eq!(summary.dropped, 3);
    assert_eq!(summary.events, 1);
}

#[tokio::test]
async fn test_raised_stop_ends_before_first_tick() {
    let (mut pipeline, mut dispatcher) = setup();
    let stop = StopSignal::new();
    stop.raise();
    let mut stream = ScriptedStream::new(vec![hand(true, 0)]);

    let summary = run_loop(&mut stream, &mut pipeline, &mut dispatcher, &stop).await.unwrap();

    assert_eq!(summary.reason, StopReason::Signal);
    assert_eq!(summary.ticks, 0);
    assert_eq!(stream.ticks.len(), 1);
}

#[tokio::test]
async fn test_stop_takes_effect_on_next_tick() {
    let (mut pipeline, mut dispatcher) = setup();
    let stop = StopSignal::new();
    let mut stream = ScriptedStream::new((0..10).map(|i| hand(true, i * 33)).collect());
    stream.stop_after = Some((4, stop.clone()));

    let summary = run_loop(&mut stream, &mut pipeline, &mut dispatcher, &stop).await.unwrap();

    assert_eq!(summary.reason, StopReason::Signal);
    assert_eq!(summary.ticks, 5);
    assert_eq!(dispatcher.backend().calls, vec!["toggle_play_pause"]);
}

#[tokio::test]
async fn test_stream_error_is_returned() {
    let (mut pipeline, mut dispatcher) = setup();
    let mut stream = ScriptedStream::new(vec![hand(true, 0)]);
    stream.fail_at_end = true;

    let result = run_loop(&mut stream, &mut pipeline, &mut dispatcher, &StopSignal::new()).await;

    assert!(matches!(result, Err(HandError::Io(_))));
}
