//! Vertex-to-panel adjacency in compressed (offset, index) form

use serde::{Deserialize, Serialize};

/// For every vertex, the panels that use it as a corner, in panel order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VertexAdjacency {
    offsets: Vec<usize>,
    faces: Vec<usize>,
}

impl VertexAdjacency {
    /// Build from the corner lists of every panel.
    ///
    /// Counts incidences first, then fills; corner ids must be below `num_vertices`.
    pub fn build<'a, I>(num_vertices: usize, panels: I) -> Self
    where
        I: IntoIterator<Item = &'a [usize]> + Clone,
    {
        let mut offsets = vec![0usize; num_vertices + 1];
        for corners in panels.clone() {
            for &v in corners {
                offsets[v + 1] += 1;
            }
        }
        for v in 0..num_vertices {
            offsets[v + 1] += offsets[v];
        }

        let mut cursor = offsets.clone();
        let mut faces = vec![0usize; offsets[num_vertices]];
        for (face, corners) in panels.into_iter().enumerate() {
            for &v in corners {
                faces[cursor[v]] = face;
                cursor[v] += 1;
            }
        }

        Self { offsets, faces }
    }

    /// Panels incident to vertex `v` (empty for unknown or unused vertices)
    pub fn faces_of(&self, v: usize) -> &[usize] {
        match (self.offsets.get(v), self.offsets.get(v + 1)) {
            (Some(&start), Some(&end)) => &self.faces[start..end],
            _ => &[],
        }
    }

    /// Number of vertices covered
    pub fn num_vertices(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    /// Total number of (vertex, panel) incidences
    pub fn num_incidences(&self) -> usize {
        self.faces.len()
    }
}
