use nalgebra::{Point3, Vector3};

/// Computes the normal of a triangle from its vertices.
///
/// The winding is counter-clockwise: the normal points towards the viewer for
/// whom the vertices appear in CCW order.
///
/// # Panics
/// Panics if the triangle is degenerate (its vertices are collinear).
pub fn compute_triangle_normal(
    p1: &Point3<f32>,
    p2: &Point3<f32>,
    p3: &Point3<f32>,
) -> Vector3<f32> {
    let u = p2 - p1;
    let v = p3 - p1;
    let normal = u.cross(&v);

    assert!(
        normal != Vector3::zeros(),
        "Can't compute a normal of a degenerate triangle"
    );

    normal.normalize()
}
