mod common;

use common::{FIST, OPEN, POINTING, hand, ms};
use dj_gesture::{FeatureExtractor, Finger, palm_centroid};
use dj_hands::HandLandmark;

fn extractor() -> FeatureExtractor {
    FeatureExtractor::new(1.15, ms(250))
}

#[test]
fn test_palm_centroid_averages_palm_joints() {
    let centroid = palm_centroid(&hand(0.5, 0.4, OPEN, ms(0)));
    assert!((centroid.x - (0.5 + 0.01 / 6.0)).abs() < 1e-5);
    assert!((centroid.y - 0.4).abs() < 1e-5);
}

#[test]
fn test_extension_flags() {
    let mut extractor = extractor();

    let open = extractor.extract(Some(&hand(0.5, 0.5, OPEN, ms(0)))).unwrap();
    assert_eq!(open.extended, [true; 5]);
    assert_eq!(open.extended_count(), 5);

    let fist = extractor.extract(Some(&hand(0.5, 0.5, FIST, ms(33)))).unwrap();
    assert_eq!(fist.extended_count(), 0);

    let pointing = extractor.extract(Some(&hand(0.5, 0.5, POINTING, ms(66)))).unwrap();
    assert!(pointing.is_extended(Finger::Index));
    assert!(!pointing.is_extended(Finger::Thumb));
    assert_eq!(pointing.extended_count(), 1);
}

#[test]
fn test_finger_reference_joints() {
    assert_eq!(Finger::Thumb.reference(), HandLandmark::ThumbIp);
    assert_eq!(Finger::Ring.reference(), HandLandmark::RingPip);
    assert_eq!(Finger::Pinky.tip(), HandLandmark::PinkyTip);
}

#[test]
fn test_velocity_against_previous_centroid() {
    let mut extractor = extractor();

    let first = extractor.extract(Some(&hand(0.30, 0.50, OPEN, ms(0)))).unwrap();
    assert_eq!(first.speed(), 0.0);

    let second = extractor.extract(Some(&hand(0.33, 0.48, OPEN, ms(33)))).unwrap();
    assert!((second.velocity.x - 0.03 / 0.033).abs() < 1e-3);
    assert!((second.velocity.y + 0.02 / 0.033).abs() < 1e-3);
    assert_eq!(second.timestamp, ms(33));
}

#[test]
fn test_missing_hand_breaks_velocity_chain() {
    let mut extractor = extractor();

    extractor.extract(Some(&hand(0.3, 0.5, OPEN, ms(0))));
    assert!(extractor.extract(None).is_none());

    let after_gap = extractor.extract(Some(&hand(0.4, 0.5, OPEN, ms(66)))).unwrap();
    assert_eq!(after_gap.speed(), 0.0);
}

#[test]
fn test_stale_or_out_of_order_frames_report_zero_velocity() {
    let mut extractor = extractor();

    extractor.extract(Some(&hand(0.3, 0.5, OPEN, ms(0))));
    let stale = extractor.extract(Some(&hand(0.4, 0.5, OPEN, ms(400)))).unwrap();
    assert_eq!(stale.speed(), 0.0);

    let same_time = extractor.extract(Some(&hand(0.5, 0.5, OPEN, ms(400)))).unwrap();
    assert_eq!(same_time.speed(), 0.0);

    let backwards = extractor.extract(Some(&hand(0.6, 0.5, OPEN, ms(300)))).unwrap();
    assert_eq!(backwards.speed(), 0.0);
}

#[test]
fn test_non_finite_landmarks_are_no_hand() {
    let mut extractor = extractor();
    extractor.extract(Some(&hand(0.3, 0.5, OPEN, ms(0))));

    let mut broken = hand(0.35, 0.5, OPEN, ms(33));
    broken.landmarks[usize::from(HandLandmark::IndexTip)].position.x = f32::NAN;
    assert!(extractor.extract(Some(&broken)).is_none());

    let next = extractor.extract(Some(&hand(0.4, 0.5, OPEN, ms(66)))).unwrap();
    assert_eq!(next.speed(), 0.0);
}
