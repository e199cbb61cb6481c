use std::collections::HashSet;
use std::iter::IntoIterator;

use arrayvec::ArrayVec;
use nalgebra::Point3;

use crate::convert::{cast_u32, cast_usize};

pub mod primitive;

/// Indexed triangle mesh.
///
/// The faces are fixed at construction. Vertex positions can be rewritten in
/// place, but never added or removed, so the adjacency of vertices stays the
/// same for the whole life of the mesh.
///
/// The mesh data lives in right-handed coordinate space with the Y axis
/// growing upwards and the Z axis being the depth axis pointing towards the
/// viewer. Faces are wound counter-clockwise when seen from the outside.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    faces: Vec<TriangleFace>,
    vertices: Vec<Point3<f32>>,
}

impl Mesh {
    /// Creates a mesh from vertex index triples and vertex positions.
    ///
    /// # Panics
    /// Panics if there are no faces, if a face refers to an out-of-bounds
    /// vertex or if a face uses the same vertex twice.
    pub fn from_triangle_faces_with_vertices<F, V>(faces: F, vertices: V) -> Self
    where
        F: IntoIterator<Item = (u32, u32, u32)>,
        V: IntoIterator<Item = Point3<f32>>,
    {
        let vertices: Vec<_> = vertices.into_iter().collect();
        let vertex_count = cast_u32(vertices.len());

        let faces: Vec<_> = faces
            .into_iter()
            .map(|(v1, v2, v3)| {
                assert!(
                    v1 < vertex_count && v2 < vertex_count && v3 < vertex_count,
                    "Faces reference out of bounds position data"
                );
                TriangleFace::new(v1, v2, v3)
            })
            .collect();
        assert!(!faces.is_empty(), "Empty (faceless) meshes are not supported");

        Mesh { faces, vertices }
    }

    pub fn faces(&self) -> &[TriangleFace] {
        &self.faces
    }

    pub fn vertices(&self) -> &[Point3<f32>] {
        &self.vertices
    }

    /// Mutable access to vertex positions. The slice can't grow or shrink.
    pub fn vertices_mut(&mut self) -> &mut [Point3<f32>] {
        &mut self.vertices
    }

    /// Edges of all faces. Edges shared by two faces are listed twice.
    pub fn edges_iter<'a>(&'a self) -> impl Iterator<Item = Edge> + 'a {
        self.faces
            .iter()
            .flat_map(|face| ArrayVec::from(face.edges()).into_iter())
    }

    /// The set of vertex pairs connected by an edge.
    pub fn adjacency(&self) -> HashSet<Edge> {
        self.edges_iter().collect()
    }

    /// Vertex positions of each face, in winding order.
    pub fn triangles_iter<'a>(
        &'a self,
    ) -> impl Iterator<Item = (&'a Point3<f32>, &'a Point3<f32>, &'a Point3<f32>)> + 'a {
        self.faces.iter().map(move |face| {
            let (v1, v2, v3) = face.vertices;
            (
                &self.vertices[cast_usize(v1)],
                &self.vertices[cast_usize(v2)],
                &self.vertices[cast_usize(v3)],
            )
        })
    }
}

/// Vertex indices of a triangle.
///
/// The indices are rotated so the lowest one comes first, which keeps the
/// winding and makes equal triangles compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TriangleFace {
    pub vertices: (u32, u32, u32),
}

impl TriangleFace {
    pub fn new(v1: u32, v2: u32, v3: u32) -> TriangleFace {
        assert!(
            v1 != v2 && v1 != v3 && v2 != v3,
            "One or more face edges consists of the same vertex"
        );

        let vertices = if v1 < v2 && v1 < v3 {
            (v1, v2, v3)
        } else if v2 < v1 && v2 < v3 {
            (v2, v3, v1)
        } else {
            (v3, v1, v2)
        };

        TriangleFace { vertices }
    }

    pub fn edges(&self) -> [Edge; 3] {
        let (v1, v2, v3) = self.vertices;
        [Edge::new(v1, v2), Edge::new(v2, v3), Edge::new(v3, v1)]
    }
}

/// An edge between two vertices, regardless of direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    vertices: (u32, u32),
}

impl Edge {
    pub fn new(v1: u32, v2: u32) -> Self {
        assert!(v1 != v2, "An edge can't connect a vertex to itself");

        Edge {
            vertices: (v1.min(v2), v1.max(v2)),
        }
    }

    /// Both vertex indices, the lower one first.
    pub fn vertices(&self) -> (u32, u32) {
        self.vertices
    }
}
