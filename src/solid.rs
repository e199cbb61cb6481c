use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::mesh::{primitive, Mesh};
use crate::raycast::{self, FaceSide, Ray, RayHits};

/// Shape of a target solid with its parameters.
///
/// Segment counts only affect the tessellation used for rendering and for
/// `IntersectionMode::Tessellated`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    /// Cylinder with its axis parallel to Y.
    Cylinder {
        radius: f32,
        height: f32,
        radial_segments: u32,
        height_segments: u32,
    },
}

impl Shape {
    pub fn name(&self) -> &'static str {
        match self {
            Shape::Sphere { .. } => "sphere",
            Shape::Cylinder { .. } => "cylinder",
        }
    }

    /// Tessellates the shape into a triangle mesh centered at `position`.
    pub fn tessellate(&self, position: &Point3<f32>) -> Mesh {
        let position = [position.x, position.y, position.z];
        match *self {
            Shape::Sphere {
                radius,
                width_segments,
                height_segments,
            } => primitive::create_uv_sphere(
                position,
                radius,
                height_segments.saturating_sub(1),
                width_segments,
            ),
            Shape::Cylinder {
                radius,
                height,
                radial_segments,
                height_segments,
            } => primitive::create_cylinder(
                position,
                radius,
                height,
                radial_segments,
                height_segments,
            ),
        }
    }
}

/// What surface ray hits are computed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntersectionMode {
    /// The exact analytic surface of the shape.
    Analytic,
    /// The triangle mesh the shape is rendered with.
    Tessellated,
}

/// A rigid, axis-aligned solid the sheet gets wrapped around.
#[derive(Debug, Clone)]
pub struct TargetSolid {
    shape: Shape,
    position: Point3<f32>,
    side: FaceSide,
    intersection_mode: IntersectionMode,
    tessellation: Option<Mesh>,
}

impl TargetSolid {
    pub fn new(
        shape: Shape,
        position: Point3<f32>,
        side: FaceSide,
        intersection_mode: IntersectionMode,
    ) -> Self {
        let tessellation = match intersection_mode {
            IntersectionMode::Analytic => None,
            IntersectionMode::Tessellated => Some(shape.tessellate(&position)),
        };

        TargetSolid {
            shape,
            position,
            side,
            intersection_mode,
            tessellation,
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn position(&self) -> &Point3<f32> {
        &self.position
    }

    pub fn side(&self) -> FaceSide {
        self.side
    }

    pub fn intersection_mode(&self) -> IntersectionMode {
        self.intersection_mode
    }

    /// Moves the solid, rebuilding its tessellation if it is used for
    /// intersections.
    pub fn set_position(&mut self, position: Point3<f32>) {
        self.position = position;
        if self.tessellation.is_some() {
            self.tessellation = Some(self.shape.tessellate(&position));
        }
    }

    /// Finds where the ray crosses the solid's surface, nearest first.
    ///
    /// Only hits on the solid's accepted face side are reported. An empty
    /// result means the ray misses.
    pub fn intersect_ray(&self, ray: &Ray) -> RayHits {
        let hits = match (&self.tessellation, self.shape) {
            (Some(mesh), _) => raycast::ray_intersects_mesh(ray, mesh),
            (None, Shape::Sphere { radius, .. }) => {
                raycast::ray_intersects_sphere(ray, &self.position, radius)
            }
            (None, Shape::Cylinder { radius, height, .. }) => {
                raycast::ray_intersects_cylinder(ray, &self.position, radius, height)
            }
        };

        raycast::select_hits(ray, self.side, hits)
    }
}
