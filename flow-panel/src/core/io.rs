//! JSON mesh input and solution output
//!
//! ## Mesh file
//!
//! ```json
//! {
//!     "vertices": [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
//!     "faces": [[0, 1, 2, 3]],
//!     "trailing_edges": [[1, 2]]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::freestream::Freestream;
use crate::core::geometry::Vec3D;
use crate::core::mesh::Mesh;
use crate::core::panel_solver::{AeroSolution, SolveStats};

/// Mesh as stored on disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshFile {
    /// Vertex coordinates
    pub vertices: Vec<[f64; 3]>,
    /// Faces of 3 or 4 vertex ids
    pub faces: Vec<Vec<usize>>,
    /// Trailing-edge vertex pairs
    #[serde(default)]
    pub trailing_edges: Vec<[usize; 2]>,
}

impl MeshFile {
    /// Copy the connectivity of an existing mesh
    pub fn from_mesh(mesh: &Mesh) -> Self {
        Self {
            vertices: mesh.vertices().iter().map(|v| v.to_array()).collect(),
            faces: mesh.faces(),
            trailing_edges: mesh.trailing_edges().iter().map(|te| [te.v1, te.v2]).collect(),
        }
    }

    /// Build and validate the mesh
    pub fn to_mesh(&self) -> Result<Mesh> {
        let vertices = self.vertices.iter().map(|&v| Vec3D::from(v)).collect();
        Mesh::new(vertices, &self.faces, &self.trailing_edges)
    }
}

/// Read a mesh from a JSON file
pub fn load_mesh<P: AsRef<Path>>(path: P) -> Result<Mesh> {
    let content = fs::read_to_string(path)?;
    let file: MeshFile = serde_json::from_str(&content)?;
    file.to_mesh()
}

/// Write a mesh to a JSON file
pub fn save_mesh<P: AsRef<Path>>(mesh: &Mesh, path: P) -> Result<()> {
    fs::write(path, serde_json::to_string_pretty(&MeshFile::from_mesh(mesh))?)?;
    Ok(())
}

/// Wake filaments of one trailing edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilamentReport {
    /// Trailing-edge vertex pair
    pub vertices: [usize; 2],
    /// Rows shed from the first vertex
    pub filament1: Vec<[f64; 3]>,
    /// Rows shed from the second vertex
    pub filament2: Vec<[f64; 3]>,
    /// Segment circulations, newest first
    pub circulation: Vec<f64>,
}

/// Serializable snapshot of a solution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionReport {
    /// Crate version that produced the file
    pub version: String,
    /// Onset flow
    pub freestream: Freestream,
    /// Per-panel source strengths
    pub source: Vec<f64>,
    /// Per-panel doublet strengths
    pub doublet: Vec<f64>,
    /// Per-panel velocity
    pub velocity: Vec<[f64; 3]>,
    /// Per-panel pressure coefficient
    pub cp: Vec<f64>,
    /// Per-panel transpiration
    pub transpiration: Vec<f64>,
    /// Per-vertex doublet strength
    pub vertex_doublet: Vec<f64>,
    /// Per-vertex velocity
    pub vertex_velocity: Vec<[f64; 3]>,
    /// Per-vertex pressure coefficient
    pub vertex_cp: Vec<f64>,
    /// Wake filaments per trailing edge
    pub wake: Vec<FilamentReport>,
    /// Linear solve statistics
    pub solves: Vec<SolveStats>,
}

impl SolutionReport {
    /// Snapshot a solution
    pub fn from_solution(solution: &AeroSolution) -> Self {
        let points = |v: &[Vec3D]| v.iter().map(|p| p.to_array()).collect::<Vec<_>>();
        Self {
            version: crate::VERSION.to_string(),
            freestream: solution.freestream,
            source: solution.source.clone(),
            doublet: solution.doublet.clone(),
            velocity: points(&solution.surface.velocity),
            cp: solution.surface.cp.clone(),
            transpiration: solution.surface.transpiration.clone(),
            vertex_doublet: solution.vertices.doublet.clone(),
            vertex_velocity: points(&solution.vertices.velocity),
            vertex_cp: solution.vertices.cp.clone(),
            wake: solution
                .wake
                .edges()
                .iter()
                .map(|e| FilamentReport {
                    vertices: [e.edge.v1, e.edge.v2],
                    filament1: points(&e.filament1),
                    filament2: points(&e.filament2),
                    circulation: e.segments.iter().map(|s| s.circulation).collect(),
                })
                .collect(),
            solves: solution.solves.clone(),
        }
    }

    /// Write as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Read back a saved report
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
