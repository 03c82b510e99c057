//! Surface mesh: vertices, panels, adjacency and trailing edges
//!
//! A [`Mesh`] is validated once on construction; every index it stores is
//! in range afterwards, so the assembly and wake code can index freely.

pub mod adjacency;
pub mod generators;
pub mod panel;

pub use adjacency::VertexAdjacency;
pub use generators::{flat_plate_mesh, flat_plate_triangle_mesh};
pub use panel::{LocalFrame, Panel, PanelDefect, PanelShape};

use serde::{Deserialize, Serialize};

use crate::core::error::{PanelError, Result};
use crate::core::geometry::Vec3D;

/// Trailing edge: two mesh vertices and the panels that share them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrailingEdge {
    /// First vertex (start of filament 1)
    pub v1: usize,
    /// Second vertex (start of filament 2)
    pub v2: usize,
    /// First panel containing both vertices
    pub face1: usize,
    /// Second panel containing both vertices, absent for a one-sided surface
    pub face2: Option<usize>,
}

/// Validated panel mesh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    vertices: Vec<Vec3D>,
    panels: Vec<Panel>,
    adjacency: VertexAdjacency,
    trailing_edges: Vec<TrailingEdge>,
}

impl Mesh {
    /// Build a mesh from vertices, 3- or 4-corner faces and trailing-edge vertex pairs
    pub fn new(
        vertices: Vec<Vec3D>,
        faces: &[Vec<usize>],
        trailing_edges: &[[usize; 2]],
    ) -> Result<Self> {
        let panels = build_panels(&vertices, faces)?;
        let adjacency = VertexAdjacency::build(
            vertices.len(),
            panels.iter().map(|p| p.vertex_ids()),
        );

        let trailing_edges = trailing_edges
            .iter()
            .enumerate()
            .map(|(t, &[v1, v2])| resolve_trailing_edge(t, v1, v2, &vertices, &panels, &adjacency))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            vertices,
            panels,
            adjacency,
            trailing_edges,
        })
    }

    /// Build a mesh from flat arrays; triangles are numbered before quads
    ///
    /// `vertices` holds 3·n_v coordinates, `faces3` 3·n_f3 ids, `faces4`
    /// 4·n_f4 ids and `trailing_edges` 2·n_te ids.
    pub fn from_flat(
        vertices: &[f64],
        faces3: &[usize],
        faces4: &[usize],
        trailing_edges: &[usize],
    ) -> Result<Self> {
        let vertices = flat_vertices(vertices)?;
        let faces = flat_faces(faces3, faces4)?;
        let edges = chunked(trailing_edges, 2, "trailing_edges")?
            .map(|c| [c[0], c[1]])
            .collect::<Vec<_>>();
        Self::new(vertices, &faces, &edges)
    }

    /// Vertex positions
    pub fn vertices(&self) -> &[Vec3D] {
        &self.vertices
    }

    /// Panels in face order
    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    /// Number of vertices
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of panels
    pub fn num_panels(&self) -> usize {
        self.panels.len()
    }

    /// Vertex to panel adjacency
    pub fn adjacency(&self) -> &VertexAdjacency {
        &self.adjacency
    }

    /// Trailing edges in input order
    pub fn trailing_edges(&self) -> &[TrailingEdge] {
        &self.trailing_edges
    }

    /// Number of trailing edges
    pub fn num_trailing_edges(&self) -> usize {
        self.trailing_edges.len()
    }

    /// Outward normals of all panels
    pub fn normals(&self) -> Vec<Vec3D> {
        self.panels.iter().map(|p| p.normal()).collect()
    }

    /// Control points of all panels
    pub fn control_points(&self) -> Vec<Vec3D> {
        self.panels.iter().map(|p| p.control_point()).collect()
    }

    /// Face corner lists, as accepted by [`Mesh::new`]
    pub fn faces(&self) -> Vec<Vec<usize>> {
        self.panels.iter().map(|p| p.vertex_ids().to_vec()).collect()
    }
}

/// Build panels from face lists, checking ids against the vertex count
pub(crate) fn build_panels(vertices: &[Vec3D], faces: &[Vec<usize>]) -> Result<Vec<Panel>> {
    faces
        .iter()
        .enumerate()
        .map(|(i, face)| {
            if let Some(&bad) = face.iter().find(|&&v| v >= vertices.len()) {
                return Err(PanelError::Index(format!(
                    "face {i} references vertex {bad}, but the mesh has {} vertices",
                    vertices.len()
                )));
            }
            let corners: Vec<Vec3D> = face.iter().map(|&v| vertices[v]).collect();
            Panel::new(face.clone(), &corners).map_err(|e| PanelError::geometry(i, e.to_string()))
        })
        .collect()
}

/// Split a flat coordinate array into points
pub(crate) fn flat_vertices(coords: &[f64]) -> Result<Vec<Vec3D>> {
    Ok(chunked(coords, 3, "vertices")?
        .map(|c| Vec3D::new(c[0], c[1], c[2]))
        .collect())
}

/// Merge flat triangle and quad id arrays, triangles first
pub(crate) fn flat_faces(faces3: &[usize], faces4: &[usize]) -> Result<Vec<Vec<usize>>> {
    let tris = chunked(faces3, 3, "faces3")?;
    let quads = chunked(faces4, 4, "faces4")?;
    Ok(tris.chain(quads).map(|c| c.to_vec()).collect())
}

fn chunked<'a, T>(
    data: &'a [T],
    stride: usize,
    name: &str,
) -> Result<std::slice::ChunksExact<'a, T>> {
    if data.len() % stride != 0 {
        return Err(PanelError::Index(format!(
            "{name} has length {}, which is not a multiple of {stride}",
            data.len()
        )));
    }
    Ok(data.chunks_exact(stride))
}

fn resolve_trailing_edge(
    index: usize,
    v1: usize,
    v2: usize,
    vertices: &[Vec3D],
    panels: &[Panel],
    adjacency: &VertexAdjacency,
) -> Result<TrailingEdge> {
    if v1 >= vertices.len() || v2 >= vertices.len() {
        return Err(PanelError::Index(format!(
            "trailing edge {index} ({v1}, {v2}) is outside the {} mesh vertices",
            vertices.len()
        )));
    }
    if v1 == v2 {
        return Err(PanelError::Index(format!(
            "trailing edge {index} uses vertex {v1} twice"
        )));
    }

    let mut sharing = adjacency
        .faces_of(v1)
        .iter()
        .copied()
        .filter(|&f| is_side(&panels[f], v1, v2));

    let face1 = sharing.next().ok_or_else(|| {
        PanelError::Index(format!(
            "trailing edge {index} ({v1}, {v2}) is not a side of any panel"
        ))
    })?;

    Ok(TrailingEdge {
        v1,
        v2,
        face1,
        face2: sharing.next(),
    })
}

/// True when `a` and `b` are consecutive corners of `panel`
fn is_side(panel: &Panel, a: usize, b: usize) -> bool {
    let n = panel.num_sides();
    match (panel.corner_index(a), panel.corner_index(b)) {
        (Some(i), Some(j)) => (i + 1) % n == j || (j + 1) % n == i,
        _ => false,
    }
}
