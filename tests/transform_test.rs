use assert_approx_eq::assert_approx_eq;
use cgmath::{Matrix4, Point3, SquareMatrix, Transform as _};
use still_life::transform::Transform;

#[test]
fn default_transform_is_identity() {
    let matrix = Transform::default().matrix();
    assert_eq!(matrix, Matrix4::identity());
}

#[test]
fn scale_rotate_translate_compose_in_order() {
    // Scale by (2, 1, 1), rotate 90 degrees about Y, then translate by
    // (1, 0, 0): the unit X point ends up at (1, 0, -2).
    let transform = Transform::new((2.0, 1.0, 1.0), (0.0, 90.0, 0.0), (1.0, 0.0, 0.0));
    let p = transform.matrix().transform_point(Point3::new(1.0, 0.0, 0.0));
    assert_approx_eq!(p.x, 1.0, 1e-5);
    assert_approx_eq!(p.y, 0.0, 1e-5);
    assert_approx_eq!(p.z, -2.0, 1e-5);
}

#[test]
fn rotation_is_applied_before_translation() {
    let transform = Transform::new((1.0, 1.0, 1.0), (0.0, 0.0, 90.0), (5.0, 0.0, 0.0));
    let p = transform.matrix().transform_point(Point3::new(1.0, 0.0, 0.0));
    assert_approx_eq!(p.x, 5.0, 1e-5);
    assert_approx_eq!(p.y, 1.0, 1e-5);
    assert_approx_eq!(p.z, 0.0, 1e-5);
}

#[test]
fn euler_order_is_z_then_y_then_x_applied_right_to_left() {
    // With X applied first (rightmost), the unit Z point rotated 90 about X
    // lands on -Y, then 90 about Y leaves -Y fixed.
    let transform = Transform::new((1.0, 1.0, 1.0), (90.0, 90.0, 0.0), (0.0, 0.0, 0.0));
    let p = transform.matrix().transform_point(Point3::new(0.0, 0.0, 1.0));
    assert_approx_eq!(p.x, 0.0, 1e-5);
    assert_approx_eq!(p.y, -1.0, 1e-5);
    assert_approx_eq!(p.z, 0.0, 1e-5);
}

#[test]
fn negative_scale_mirrors_without_breaking_translation() {
    let transform = Transform::new((1.0, -0.4, 0.5), (0.0, 0.0, 0.0), (0.0, 5.4, 0.0));
    let p = transform.matrix().transform_point(Point3::new(0.0, 1.0, 0.0));
    assert_approx_eq!(p.y, 5.0, 1e-5);
}
