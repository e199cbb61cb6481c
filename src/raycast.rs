use std::cmp::Ordering;
use std::f32;

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::geometry;
use crate::mesh::Mesh;

/// Hits of a single ray. Rays against convex solids rarely produce more than
/// two hits, so they are kept inline.
pub type RayHits = SmallVec<[RayHit; 2]>;

/// A half-line starting at `origin` going in the direction of `direction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    origin: Point3<f32>,
    direction: Vector3<f32>,
}

impl Ray {
    /// Creates a ray, normalizing its direction.
    ///
    /// # Panics
    /// Panics if direction vector is zero.
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Self {
        assert!(direction != Vector3::zeros(), "Ray vector zero");

        Ray {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Creates a ray starting at `origin` pointing at `target`.
    ///
    /// # Panics
    /// Panics if the origin and the target are identical.
    pub fn towards(origin: Point3<f32>, target: &Point3<f32>) -> Self {
        Ray::new(origin, target - origin)
    }

    pub fn origin(&self) -> Point3<f32> {
        self.origin
    }

    pub fn direction(&self) -> Vector3<f32> {
        self.direction
    }

    /// The point at `parameter` distance from origin along the ray.
    pub fn point_at(&self, parameter: f32) -> Point3<f32> {
        self.origin + self.direction.scale(parameter)
    }
}

/// A point where a ray crosses a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Point3<f32>,
    /// Distance from the ray origin to the point.
    pub distance: f32,
    /// Unit normal of the surface at the point, pointing out of the solid.
    pub normal: Vector3<f32>,
}

impl RayHit {
    /// The ray enters the solid through the surface at this hit.
    pub fn is_front_facing(&self, ray: &Ray) -> bool {
        ray.direction().dot(&self.normal) < 0.0
    }
}

/// Which sides of a surface register ray hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaceSide {
    /// Only surfaces facing the ray (the ray enters the solid).
    Front,
    /// Only surfaces facing away from the ray (the ray leaves the solid).
    Back,
    Double,
}

impl FaceSide {
    pub fn accepts(self, ray: &Ray, hit: &RayHit) -> bool {
        match self {
            FaceSide::Front => hit.is_front_facing(ray),
            FaceSide::Back => !hit.is_front_facing(ray),
            FaceSide::Double => true,
        }
    }
}

/// Keeps only hits on the accepted side and sorts them nearest first.
pub fn select_hits(ray: &Ray, side: FaceSide, mut hits: RayHits) -> RayHits {
    hits.retain(|hit| side.accepts(ray, hit));
    hits.sort_by(|a, b| {
        a.distance
            .partial_cmp(&b.distance)
            .unwrap_or(Ordering::Equal)
    });
    hits
}

/// Finds all intersections of a ray and a sphere surface.
///
/// Only hits in front of the ray origin (non-negative parameter) count. A
/// tangent ray produces a single hit.
///
/// https://www.scratchapixel.com/lessons/3d-basic-rendering/minimal-ray-tracer-rendering-simple-shapes/ray-sphere-intersection
pub fn ray_intersects_sphere(ray: &Ray, center: &Point3<f32>, radius: f32) -> RayHits {
    let mut hits = RayHits::new();

    let center_to_origin = ray.origin() - center;
    let b = center_to_origin.dot(&ray.direction());
    let c = center_to_origin.norm_squared() - radius * radius;
    let discriminant = b * b - c;

    if discriminant < 0.0 {
        return hits;
    }

    let discriminant_sqrt = discriminant.sqrt();
    let near = -b - discriminant_sqrt;
    let far = -b + discriminant_sqrt;

    let mut push_hit = |parameter: f32| {
        if parameter >= 0.0 {
            let point = ray.point_at(parameter);
            hits.push(RayHit {
                point,
                distance: parameter,
                normal: (point - center) / radius,
            });
        }
    };

    push_hit(near);
    if discriminant > 0.0 {
        push_hit(far);
    }

    hits
}

/// Finds all intersections of a ray and a finite cylinder surface, including
/// its cap disks.
///
/// The cylinder axis is parallel to Y and goes through `center`. The cylinder
/// spans `height / 2` above and below the center.
pub fn ray_intersects_cylinder(
    ray: &Ray,
    center: &Point3<f32>,
    radius: f32,
    height: f32,
) -> RayHits {
    let mut hits = RayHits::new();

    let half_height = 0.5 * height;
    let origin = ray.origin() - center;
    let direction = ray.direction();

    // Side: solve |(origin + t * direction).xz| = radius
    let a = direction.x * direction.x + direction.z * direction.z;
    if a > f32::EPSILON {
        let b = origin.x * direction.x + origin.z * direction.z;
        let c = origin.x * origin.x + origin.z * origin.z - radius * radius;
        let discriminant = b * b - a * c;

        if discriminant >= 0.0 {
            let discriminant_sqrt = discriminant.sqrt();
            let near = (-b - discriminant_sqrt) / a;
            let far = (-b + discriminant_sqrt) / a;

            let mut push_side_hit = |parameter: f32| {
                if parameter < 0.0 {
                    return;
                }
                let local = origin + direction.scale(parameter);
                if local.y.abs() <= half_height {
                    hits.push(RayHit {
                        point: ray.point_at(parameter),
                        distance: parameter,
                        normal: Vector3::new(local.x, 0.0, local.z) / radius,
                    });
                }
            };

            push_side_hit(near);
            // A tangent ray touches the side once
            if discriminant > 0.0 {
                push_side_hit(far);
            }
        }
    }

    // Caps: intersect the cap planes and check the hit lies in the disk
    if !approx::relative_eq!(direction.y, 0.0) {
        for &(cap_y, normal_y) in &[(half_height, 1.0), (-half_height, -1.0)] {
            let parameter = (cap_y - origin.y) / direction.y;
            if parameter < 0.0 {
                continue;
            }
            let local = origin + direction.scale(parameter);
            if local.x * local.x + local.z * local.z <= radius * radius {
                hits.push(RayHit {
                    point: ray.point_at(parameter),
                    distance: parameter,
                    normal: Vector3::new(0.0, normal_y, 0.0),
                });
            }
        }
    }

    hits
}

/// The Möller–Trumbore ray-triangle intersection algorithm is a fast method for
/// calculating the intersection of a ray and a triangle in three dimensions
/// without the need of precomputation of the plane equation of the plane
/// containing the triangle.
///
/// The reported normal follows the triangle's counter-clockwise winding.
///
/// https://en.wikipedia.org/wiki/Möller–Trumbore_intersection_algorithm
/// http://webserver2.tecgraf.puc-rio.br/~mgattass/cg/trbRR/Fast%20MinimumStorage%20RayTriangle%20Intersection.pdf
pub fn ray_intersects_triangle(
    ray: &Ray,
    triangle_vertex0: &Point3<f32>,
    triangle_vertex1: &Point3<f32>,
    triangle_vertex2: &Point3<f32>,
) -> Option<RayHit> {
    let ray_vector = ray.direction();
    let edge_1_vector = triangle_vertex1 - triangle_vertex0;
    let edge_2_vector = triangle_vertex2 - triangle_vertex0;
    // If the ray is parallel to the triangle, a vector perpendicular to the ray
    // and one of the triangle edges
    let perpendicular_vector = ray_vector.cross(&edge_2_vector);
    // will be also perpendicular to the other triangle edge.
    let determinant = edge_1_vector.dot(&perpendicular_vector);
    // Which means the ray is parallel to the tested triangle.
    if approx::relative_eq!(determinant, 0.0) {
        return None;
    }
    let inverse_determinant = 1.0 / determinant;
    let tangent_vector = ray.origin() - triangle_vertex0;
    let u_parameter = inverse_determinant * tangent_vector.dot(&perpendicular_vector);
    // The ray intersects the triangle plane outside of the triangle
    if u_parameter < 0.0 || u_parameter > 1.0 {
        return None;
    }
    let q_vector = tangent_vector.cross(&edge_1_vector);
    let v_parameter = inverse_determinant * ray_vector.dot(&q_vector);
    if v_parameter < 0.0 || u_parameter + v_parameter > 1.0 {
        return None;
    }
    // The t_parameter is the relative position of the intersection point on the
    // ray line.
    let t_parameter = inverse_determinant * edge_2_vector.dot(&q_vector);
    if t_parameter >= 0.0 && t_parameter < 1.0 / f32::EPSILON {
        Some(RayHit {
            point: ray.point_at(t_parameter),
            distance: t_parameter,
            normal: geometry::compute_triangle_normal(
                triangle_vertex0,
                triangle_vertex1,
                triangle_vertex2,
            ),
        })
    } else {
        None
    }
}

/// Finds intersections of a ray with all faces of a mesh.
///
/// A ray crossing a shared edge or vertex registers a hit for each face
/// touching it.
pub fn ray_intersects_mesh(ray: &Ray, mesh: &Mesh) -> RayHits {
    mesh.triangles_iter()
        .filter_map(|(v0, v1, v2)| ray_intersects_triangle(ray, v0, v1, v2))
        .collect()
}
