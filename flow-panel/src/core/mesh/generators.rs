//! Mesh generators for test and demonstration geometries
//!
//! Lifting surfaces here are thin flat plates in the z = 0 plane: chord
//! along +x, span along y centred on the origin, normals along +z. The
//! trailing edge is the x = chord line.

use crate::core::error::Result;
use crate::core::geometry::Vec3D;
use crate::core::mesh::Mesh;

/// Generate a flat rectangular plate of quadrilateral panels
///
/// # Arguments
/// * `chord` - Extent along x
/// * `span` - Extent along y, centred on y = 0
/// * `n_chord` - Panels along the chord
/// * `n_span` - Panels along the span
///
/// # Returns
/// A `Mesh` with `n_chord · n_span` quads and `n_span` trailing edges,
/// each touching one panel.
///
/// # Example
/// ```
/// use flow_panel::core::mesh::flat_plate_mesh;
///
/// let mesh = flat_plate_mesh(1.0, 4.0, 4, 6).unwrap();
/// assert_eq!(mesh.num_panels(), 24);
/// assert_eq!(mesh.num_trailing_edges(), 6);
/// ```
pub fn flat_plate_mesh(chord: f64, span: f64, n_chord: usize, n_span: usize) -> Result<Mesh> {
    let (vertices, cells) = plate_grid(chord, span, n_chord, n_span);
    let faces: Vec<Vec<usize>> = cells.iter().map(|c| c.to_vec()).collect();
    Mesh::new(vertices, &faces, &plate_trailing_edges(n_chord, n_span))
}

/// Same plate as [`flat_plate_mesh`] with every quad split into two triangles
///
/// The split runs along the first-to-third corner diagonal, so each
/// trailing edge touches exactly one triangle.
pub fn flat_plate_triangle_mesh(
    chord: f64,
    span: f64,
    n_chord: usize,
    n_span: usize,
) -> Result<Mesh> {
    let (vertices, cells) = plate_grid(chord, span, n_chord, n_span);
    let faces: Vec<Vec<usize>> = cells
        .iter()
        .flat_map(|&[a, b, c, d]| [vec![a, b, c], vec![a, c, d]])
        .collect();
    Mesh::new(vertices, &faces, &plate_trailing_edges(n_chord, n_span))
}

fn plate_grid(
    chord: f64,
    span: f64,
    n_chord: usize,
    n_span: usize,
) -> (Vec<Vec3D>, Vec<[usize; 4]>) {
    let mut vertices = Vec::with_capacity((n_chord + 1) * (n_span + 1));
    for i in 0..=n_chord {
        let x = chord * i as f64 / n_chord.max(1) as f64;
        for j in 0..=n_span {
            let y = -0.5 * span + span * j as f64 / n_span.max(1) as f64;
            vertices.push(Vec3D::new(x, y, 0.0));
        }
    }

    let mut cells = Vec::with_capacity(n_chord * n_span);
    for i in 0..n_chord {
        for j in 0..n_span {
            cells.push([
                grid_index(i, j, n_span),
                grid_index(i + 1, j, n_span),
                grid_index(i + 1, j + 1, n_span),
                grid_index(i, j + 1, n_span),
            ]);
        }
    }

    (vertices, cells)
}

fn plate_trailing_edges(n_chord: usize, n_span: usize) -> Vec<[usize; 2]> {
    (0..n_span)
        .map(|j| [grid_index(n_chord, j, n_span), grid_index(n_chord, j + 1, n_span)])
        .collect()
}

#[inline]
fn grid_index(i: usize, j: usize, n_span: usize) -> usize {
    i * (n_span + 1) + j
}
