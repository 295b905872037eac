use super::Orbiter;
use nalgebra_glm::{dot, length, vec3, TVec3};

const EPSILON: f32 = 1.0e-4;

fn close(a: &TVec3<f32>, b: &TVec3<f32>) -> bool {
    length(&(a - b)) < EPSILON
}

fn camera_like() -> Orbiter {
    Orbiter::new(vec3(0.0, 0.0, 5.0), vec3(0.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0))
}

#[test]
fn test_frame_of_default_camera() {
    let frame = camera_like().frame().unwrap();
    assert!(close(&frame.direction, &vec3(0.0, 0.0, -1.0)));
    assert!(close(&frame.side, &vec3(1.0, 0.0, 0.0)));
    assert!(close(&frame.up, &vec3(0.0, 1.0, 0.0)));
}

#[test]
fn test_radius_preserved_for_every_step_kind() {
    let mut orbiter = Orbiter::new(
        vec3(0.0, 5.0, 10.0),
        vec3(0.0, 0.0, 0.0),
        vec3(1.0, 0.0, 0.0),
    );
    let radius = orbiter.radius();

    for i in 0..1000 {
        match i % 5 {
            0 => orbiter.tilt(0.05),
            1 => orbiter.pan(0.05),
            2 => orbiter.roll(0.05),
            3 => orbiter.tilt(-0.05),
            _ => orbiter.pan(-0.13),
        }
        assert!(
            (orbiter.radius() - radius).abs() < radius * 1.0e-3,
            "radius drifted to {} after {} steps",
            orbiter.radius(),
            i + 1
        );
    }
}

#[test]
fn test_radius_preserved_around_offset_center() {
    let center = vec3(3.0, -2.0, 1.0);
    let mut orbiter = Orbiter::new(center + vec3(0.0, 0.0, 4.0), center, vec3(0.0, 1.0, 0.0));

    for _ in 0..200 {
        orbiter.tilt(0.05);
        orbiter.pan(0.05);
    }

    assert!((orbiter.radius() - 4.0).abs() < 1.0e-3);
    assert!(close(&orbiter.center(), &center));
}

#[test]
fn test_pan_keeps_height_and_helper() {
    let mut orbiter = camera_like();
    orbiter.pan(0.05);

    assert!(orbiter.position().y.abs() < EPSILON);
    assert!(orbiter.position().x > 0.0);
    assert!(close(&orbiter.helper(), &vec3(0.0, 1.0, 0.0)));
}

#[test]
fn test_tilt_moves_position_and_helper_together() {
    let mut orbiter = camera_like();
    orbiter.tilt(0.05);

    // Tilting about +x moves the eye from +z towards -y.
    assert!(orbiter.position().y < 0.0);
    assert!(orbiter.position().x.abs() < EPSILON);

    // The helper stays perpendicular to the line of sight.
    let direction = orbiter.direction().unwrap();
    assert!(dot(&direction, &orbiter.helper()).abs() < EPSILON);
    assert!((length(&orbiter.helper()) - 1.0).abs() < EPSILON);
}

#[test]
fn test_opposite_steps_cancel() {
    let start = camera_like();

    let mut orbiter = start.clone();
    orbiter.tilt(0.05);
    orbiter.tilt(-0.05);
    assert!(close(&orbiter.position(), &start.position()));

    orbiter.pan(0.3);
    orbiter.pan(-0.3);
    assert!(close(&orbiter.position(), &start.position()));
}

#[test]
fn test_roll_only_turns_helper() {
    let mut orbiter = camera_like();
    orbiter.roll(std::f32::consts::FRAC_PI_2);

    assert!(close(&orbiter.position(), &vec3(0.0, 0.0, 5.0)));
    // A reversed quarter turn about -z takes +y to -x.
    assert!(close(&orbiter.helper(), &vec3(-1.0, 0.0, 0.0)));
}

#[test]
fn test_degenerate_frame_is_a_no_op() {
    // Helper parallel to the line of sight.
    let mut orbiter = Orbiter::new(vec3(0.0, 0.0, 5.0), vec3(0.0, 0.0, 0.0), vec3(0.0, 0.0, 1.0));
    let before = orbiter.clone();
    assert!(orbiter.frame().is_none());

    orbiter.tilt(0.05);
    orbiter.pan(0.05);
    assert_eq!(orbiter, before);

    // Position sitting on the center.
    let mut collapsed = Orbiter::new(vec3(1.0, 1.0, 1.0), vec3(1.0, 1.0, 1.0), vec3(0.0, 1.0, 0.0));
    collapsed.roll(0.05);
    assert_eq!(collapsed.helper(), vec3(0.0, 1.0, 0.0));
}
