use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::mesh::{primitive, Mesh};
use crate::pose::{Axis, Pose};

/// Dimensions and subdivision of a wrap sheet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SheetDimensions {
    pub width: f32,
    pub height: f32,
    pub width_segments: u32,
    pub height_segments: u32,
}

/// A flat, subdivided grid that gets deformed onto a target solid.
///
/// Vertex positions are in sheet-local space. Only the depth (Z) component
/// of a vertex can be rewritten, and every rewrite leaves the sheet dirty
/// until the renderer picks the change up.
#[derive(Debug, Clone)]
pub struct WrapSheet {
    mesh: Mesh,
    pose: Pose,
    dirty: bool,
}

impl WrapSheet {
    pub fn new(dimensions: SheetDimensions) -> Self {
        let mesh = primitive::create_grid_plane(
            [0.0; 3],
            dimensions.width,
            dimensions.height,
            dimensions.width_segments,
            dimensions.height_segments,
        );

        WrapSheet {
            mesh,
            pose: Pose::identity(),
            dirty: false,
        }
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn vertex_count(&self) -> usize {
        self.mesh.vertices().len()
    }

    /// Current local position of the vertex at `index`.
    ///
    /// # Panics
    /// Panics if the index is out of bounds.
    pub fn vertex(&self, index: usize) -> Point3<f32> {
        self.mesh.vertices()[index]
    }

    pub fn vertices(&self) -> &[Point3<f32>] {
        self.mesh.vertices()
    }

    /// Overwrites the depth component of the vertex at `index`.
    ///
    /// # Panics
    /// Panics if the index is out of bounds.
    pub fn set_vertex_depth(&mut self, index: usize, depth: f32) {
        self.mesh.vertices_mut()[index].z = depth;
        self.dirty = true;
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    pub fn rotate(&mut self, axis: Axis, delta: f32) {
        self.pose.rotate(axis, delta);
    }

    pub fn translate(&mut self, axis: Axis, delta: f32) {
        self.pose.translate(axis, delta);
    }

    pub(crate) fn pose_mut(&mut self) -> &mut Pose {
        &mut self.pose
    }

    /// Flags the geometry as changed.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns whether the geometry changed since the last call and clears
    /// the flag.
    pub fn take_dirty(&mut self) -> bool {
        let dirty = self.dirty;
        self.dirty = false;
        dirty
    }
}
