mod common;

use common::{FIST, OPEN, POINTING, hand, hold, ms, sweep};
use dj_gesture::{ConfigError, Gesture, GestureConfig, GestureEvent, GesturePipeline, RearmPolicy};
use dj_hands::{LandmarkFrame, Tick};
use std::time::Duration;

fn pipeline(config: GestureConfig) -> GesturePipeline {
    GesturePipeline::new(config).unwrap()
}

fn feed(pipeline: &mut GesturePipeline, frames: &[LandmarkFrame]) -> Vec<GestureEvent> {
    frames.iter().filter_map(|f| pipeline.process(Some(f))).collect()
}

fn feed_ticks(pipeline: &mut GesturePipeline, ticks: &[Tick]) -> Vec<GestureEvent> {
    ticks.iter().filter_map(|t| pipeline.process_tick(t)).collect()
}

#[test]
fn test_still_open_palm_fires_once() {
    let mut pipeline = pipeline(GestureConfig::default().with_debounce_frames(3));
    let events = feed(&mut pipeline, &hold(OPEN, ms(0), 3));

    assert_eq!(
        events,
        vec![GestureEvent {
            gesture: Gesture::OpenPalm,
            timestamp: ms(66)
        }]
    );
}

#[test]
fn test_sustained_fist_fires_once() {
    for rearm in [RearmPolicy::OnRelease, RearmPolicy::OnCooldown] {
        let config = GestureConfig::default()
            .with_cooldown(Gesture::Fist, Duration::from_secs(1))
            .with_rearm(rearm);
        let mut pipeline = pipeline(config);

        let events = feed(&mut pipeline, &hold(FIST, ms(0), 10));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].gesture, Gesture::Fist);
    }
}

#[test]
fn test_swipe_right() {
    let mut pipeline = pipeline(GestureConfig::default());
    let events = feed(&mut pipeline, &sweep(POINTING, ms(0), 6, 0.03, 0.0));

    assert_eq!(
        events,
        vec![GestureEvent {
            gesture: Gesture::SwipeRight,
            timestamp: ms(132)
        }]
    );
}

#[test]
fn test_diagonal_motion_is_a_swipe() {
    let mut pipeline = pipeline(GestureConfig::default());
    let events = feed(&mut pipeline, &sweep(POINTING, ms(0), 6, 0.03, -0.03));

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].gesture, Gesture::SwipeRight);
}

#[test]
fn test_move_down() {
    let mut pipeline = pipeline(GestureConfig::default());
    let events = feed(&mut pipeline, &sweep(POINTING, ms(0), 6, 0.0, 0.03));

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].gesture, Gesture::MoveDown);
}

#[test]
fn test_missing_hand_interrupts_hold() {
    let mut pipeline = pipeline(GestureConfig::default());
    let ticks = [
        Tick::Hand(hand(0.5, 0.5, OPEN, ms(0))),
        Tick::Hand(hand(0.5, 0.5, OPEN, ms(33))),
        Tick::NoHand(ms(66)),
        Tick::Hand(hand(0.5, 0.5, OPEN, ms(99))),
        Tick::Hand(hand(0.5, 0.5, OPEN, ms(132))),
    ];
    assert!(feed_ticks(&mut pipeline, &ticks).is_empty());
    assert!(pipeline.process(None).is_none());
}

#[test]
fn test_dropped_frames_advance_nothing() {
    let mut pipeline = pipeline(GestureConfig::default());
    let ticks = [
        Tick::Hand(hand(0.5, 0.5, OPEN, ms(0))),
        Tick::Dropped,
        Tick::Hand(hand(0.5, 0.5, OPEN, ms(66))),
        Tick::Dropped,
        Tick::Dropped,
        Tick::Hand(hand(0.5, 0.5, OPEN, ms(165))),
    ];
    let events = feed_ticks(&mut pipeline, &ticks);

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].timestamp, ms(165));
}

#[test]
fn test_same_session_gives_same_events() {
    let mut ticks: Vec<Tick> = Vec::new();
    ticks.extend(hold(OPEN, ms(0), 5).into_iter().map(Tick::Hand));
    ticks.push(Tick::NoHand(ms(200)));
    ticks.extend(sweep(POINTING, ms(250), 8, -0.03, 0.0).into_iter().map(Tick::Hand));
    ticks.push(Tick::Dropped);
    ticks.extend(hold(FIST, ms(600), 6).into_iter().map(Tick::Hand));
    ticks.push(Tick::NoHand(ms(850)));
    ticks.extend(sweep(POINTING, ms(900), 8, 0.0, -0.03).into_iter().map(Tick::Hand));

    let first = feed_ticks(&mut pipeline(GestureConfig::default()), &ticks);
    let second = feed_ticks(&mut pipeline(GestureConfig::default()), &ticks);

    let gestures: Vec<Gesture> = first.iter().map(|e| e.gesture).collect();
    assert_eq!(
        gestures,
        vec![Gesture::OpenPalm, Gesture::SwipeLeft, Gesture::Fist, Gesture::MoveUp]
    );
    assert_eq!(first, second);
}

#[test]
fn test_invalid_config_is_rejected() {
    let result = GesturePipeline::new(GestureConfig::default().with_debounce_frames(0));
    assert!(matches!(result, Err(ConfigError::DebounceFrames)));
}
