use dj_base::{Vec2, Vec3};

#[test]
fn test_vec2_arithmetic() {
    let a = Vec2::new(0.5f32, 0.25);
    let b = Vec2::new(0.25f32, 0.75);

    assert_eq!(a + b, Vec2::new(0.75, 1.0));
    assert_eq!(a - b, Vec2::new(0.25, -0.5));
    assert_eq!(b / 0.25, Vec2::new(1.0, 3.0));

    let mut acc = Vec2::<f32>::zero();
    acc += a;
    acc += b;
    assert_eq!(acc, Vec2::new(0.75, 1.0));
}

#[test]
fn test_vec2_length_and_distance() {
    let v = Vec2::new(3.0f32, 4.0);
    assert_eq!(v.length(), 5.0);
    assert_eq!(Vec2::new(1.0f32, 1.0).distance(Vec2::new(4.0, 5.0)), 5.0);
}

#[test]
fn test_vec2_is_finite() {
    assert!(Vec2::new(0.1f32, 0.2).is_finite());
    assert!(!Vec2::new(f32::NAN, 0.2).is_finite());
    assert!(!Vec2::new(0.1, f32::INFINITY).is_finite());
}

#[test]
fn test_vec3_xy_and_finite() {
    let p = Vec3::new(0.4f32, 0.6, -0.02);
    assert_eq!(p.xy(), Vec2::new(0.4, 0.6));
    assert!(p.is_finite());
    assert!(!Vec3::new(0.0f32, 0.0, f32::NAN).is_finite());
}
