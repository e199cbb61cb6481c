use std::f32::consts::PI;

use nalgebra::Point3;

use crate::convert::{cast_u32, cast_usize};

use super::Mesh;

const TWO_PI: f32 = 2.0 * PI;

/// Create a flat, subdivided rectangular grid in the XY plane, facing +Z.
///
/// Vertices are laid out row by row, starting at the top-left corner
/// (`-width / 2`, `height / 2`) and ending at the bottom-right one. A grid
/// with `n_width` x `n_height` segments has `(n_width + 1) * (n_height + 1)`
/// vertices and `2 * n_width * n_height` faces, all facing +Z.
///
/// # Panics
/// Panics if any of the segment counts is zero.
pub fn create_grid_plane(
    position: [f32; 3],
    width: f32,
    height: f32,
    n_width: u32,
    n_height: u32,
) -> Mesh {
    assert!(n_width >= 1, "Need at least 1 width segment");
    assert!(n_height >= 1, "Need at least 1 height segment");

    let columns = n_width + 1;
    let rows = n_height + 1;
    let segment_width = width / n_width as f32;
    let segment_height = height / n_height as f32;

    let vertex_data_count = cast_usize(columns * rows);
    let mut vertex_positions = Vec::with_capacity(vertex_data_count);

    for row in 0..rows {
        let y = 0.5 * height - row as f32 * segment_height;
        for column in 0..columns {
            let x = column as f32 * segment_width - 0.5 * width;
            vertex_positions.push(v(x, y, 0.0, position, 1.0));
        }
    }

    let faces_count = cast_usize(2 * n_width * n_height);
    let mut faces = Vec::with_capacity(faces_count);

    for row in 0..n_height {
        for column in 0..n_width {
            // Produce 2 CCW wound triangles: (a, b, d) and (b, c, d)
            let a = column + columns * row;
            let b = column + columns * (row + 1);
            let c = column + 1 + columns * (row + 1);
            let d = column + 1 + columns * row;

            faces.push((a, b, d));
            faces.push((b, c, d));
        }
    }

    assert_eq!(vertex_positions.len(), vertex_data_count);
    assert_eq!(faces.len(), faces_count);

    Mesh::from_triangle_faces_with_vertices(faces, vertex_positions)
}

/// Create UV Sphere primitive at `position` with `scale`,
/// `n_parallels` and `n_meridians`.
///
/// The poles lie on the Y axis.
///
/// # Panics
/// Panics if number of parallels is less than 2 or number of
/// meridians is less than 3.
pub fn create_uv_sphere(
    position: [f32; 3],
    scale: f32,
    n_parallels: u32,
    n_meridians: u32,
) -> Mesh {
    assert!(n_parallels >= 2, "Need at least 2 parallels");
    assert!(n_meridians >= 3, "Need at least 3 meridians");

    // Add the poles
    let lat_line_max = n_parallels + 2;
    // Add the last, wrapping meridian
    let lng_line_max = n_meridians + 1;

    // 1 North pole + 1 South pole + `n_parallels` * `n_meridians`
    let vertex_data_count = cast_usize(2 + n_parallels * n_meridians);
    let mut vertex_positions = Vec::with_capacity(vertex_data_count);

    // Produce vertex data for bands in between parallels

    for lat_line in 0..n_parallels {
        for lng_line in 0..n_meridians {
            let polar_t = (lat_line + 1) as f32 / (lat_line_max - 1) as f32;
            let azimuthal_t = lng_line as f32 / (lng_line_max - 1) as f32;

            let x = (PI * polar_t).sin() * (TWO_PI * azimuthal_t).cos();
            let y = (PI * polar_t).sin() * (TWO_PI * azimuthal_t).sin();
            let z = (PI * polar_t).cos();

            vertex_positions.push(v_y_up(x, y, z, position, scale));
        }
    }

    // Triangles from North and South poles to the nearest band + 2 * quads in bands
    let faces_count = cast_usize(2 * n_meridians + 2 * n_meridians * (n_parallels - 1));
    let mut faces = Vec::with_capacity(faces_count);

    // Produce faces for bands in-between parallels

    for i in 1..n_parallels {
        for j in 0..n_meridians {
            // Produce 2 CCW wound triangles: (p1, p2, p3) and (p3, p4, p1)

            let p1 = i * n_meridians + j;
            let p2 = i * n_meridians + ((j + 1) % n_meridians);

            let p4 = (i - 1) * n_meridians + j;
            let p3 = (i - 1) * n_meridians + ((j + 1) % n_meridians);

            faces.push((p1, p2, p3));
            faces.push((p3, p4, p1));
        }
    }

    // Add vertex data and band-connecting faces for North and South poles

    let north_pole = cast_u32(vertex_positions.len());
    vertex_positions.push(v_y_up(0.0, 0.0, 1.0, position, scale));

    let south_pole = cast_u32(vertex_positions.len());
    vertex_positions.push(v_y_up(0.0, 0.0, -1.0, position, scale));

    for i in 0..n_meridians {
        let north_p1 = i;
        let north_p2 = (i + 1) % n_meridians;

        let south_p1 = (n_parallels - 1) * n_meridians + i;
        let south_p2 = (n_parallels - 1) * n_meridians + ((i + 1) % n_meridians);

        faces.push((north_p1, north_p2, north_pole));
        faces.push((south_p2, south_p1, south_pole));
    }

    assert_eq!(vertex_positions.len(), vertex_data_count);
    assert_eq!(faces.len(), faces_count);

    Mesh::from_triangle_faces_with_vertices(faces, vertex_positions)
}

/// Create a capped cylinder centered at `position` with its axis parallel
/// to Y.
///
/// The side is split into `n_radial` segments around the axis and
/// `n_height` segments along it. Both caps are fans around a center
/// vertex.
///
/// # Panics
/// Panics if number of radial segments is less than 3 or number of height
/// segments is zero.
pub fn create_cylinder(
    position: [f32; 3],
    radius: f32,
    height: f32,
    n_radial: u32,
    n_height: u32,
) -> Mesh {
    assert!(n_radial >= 3, "Need at least 3 radial segments");
    assert!(n_height >= 1, "Need at least 1 height segment");

    let rings = n_height + 1;
    let half_height = 0.5 * height;

    // `rings` * `n_radial` side vertices + 2 cap centers
    let vertex_data_count = cast_usize(rings * n_radial + 2);
    let mut vertex_positions = Vec::with_capacity(vertex_data_count);

    // Rings go from the top cap to the bottom one
    for ring in 0..rings {
        let y = half_height - ring as f32 * height / n_height as f32;
        for segment in 0..n_radial {
            let theta = TWO_PI * segment as f32 / n_radial as f32;
            let x = radius * theta.sin();
            let z = radius * theta.cos();

            vertex_positions.push(v(x, y, z, position, 1.0));
        }
    }

    let faces_count = cast_usize(2 * n_radial * n_height + 2 * n_radial);
    let mut faces = Vec::with_capacity(faces_count);

    for ring in 0..n_height {
        for segment in 0..n_radial {
            let next_segment = (segment + 1) % n_radial;

            let a = ring * n_radial + segment;
            let b = (ring + 1) * n_radial + segment;
            let c = (ring + 1) * n_radial + next_segment;
            let d = ring * n_radial + next_segment;

            faces.push((a, b, d));
            faces.push((b, c, d));
        }
    }

    let top_center = cast_u32(vertex_positions.len());
    vertex_positions.push(v(0.0, half_height, 0.0, position, 1.0));

    let bottom_center = cast_u32(vertex_positions.len());
    vertex_positions.push(v(0.0, -half_height, 0.0, position, 1.0));

    let bottom_ring = n_height * n_radial;
    for segment in 0..n_radial {
        let next_segment = (segment + 1) % n_radial;

        faces.push((top_center, segment, next_segment));
        faces.push((
            bottom_center,
            bottom_ring + next_segment,
            bottom_ring + segment,
        ));
    }

    assert_eq!(vertex_positions.len(), vertex_data_count);
    assert_eq!(faces.len(), faces_count);

    Mesh::from_triangle_faces_with_vertices(faces, vertex_positions)
}

fn v(x: f32, y: f32, z: f32, translation: [f32; 3], scale: f32) -> Point3<f32> {
    Point3::new(
        scale * x + translation[0],
        scale * y + translation[1],
        scale * z + translation[2],
    )
}

/// Rotates a Z-up unit shape point by -90° around X so that Z-up becomes
/// Y-up. The rotation keeps the winding of faces intact.
fn v_y_up(x: f32, y: f32, z: f32, translation: [f32; 3], scale: f32) -> Point3<f32> {
    v(x, z, -y, translation, scale)
}
