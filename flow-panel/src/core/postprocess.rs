//! Surface and vertex fields reconstructed from the solved strengths

use serde::{Deserialize, Serialize};

use crate::core::assembly::InfluenceMatrix;
use crate::core::geometry::Vec3D;
use crate::core::mesh::Mesh;

/// Per-panel flow quantities at the control points
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceField {
    /// Total velocity V∞ + B + Σ μ AIC + W
    pub velocity: Vec<Vec3D>,
    /// Pressure coefficient, see [`PressureModel`]
    pub cp: Vec<f64>,
    /// Normal velocity v · n (zero when the boundary condition holds)
    pub transpiration: Vec<f64>,
}

/// How the pressure coefficient is derived from the local speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PressureModel {
    /// cp = 1 - |v|/|V∞|
    #[default]
    SpeedRatio,
    /// Incompressible Bernoulli, cp = 1 - |v|²/|V∞|²
    Bernoulli,
}

impl PressureModel {
    /// Pressure coefficient at local velocity `v` for onset speed `v_inf`
    pub fn cp(self, v: Vec3D, v_inf: f64) -> f64 {
        match self {
            PressureModel::SpeedRatio => 1.0 - v.norm() / v_inf,
            PressureModel::Bernoulli => 1.0 - v.norm_squared() / (v_inf * v_inf),
        }
    }
}

impl SurfaceField {
    /// Reconstruct the surface velocity, pressure coefficient and transpiration
    pub fn compute(
        mesh: &Mesh,
        influence: &InfluenceMatrix,
        doublet: &[f64],
        freestream: Vec3D,
        wake_velocity: Option<&[Vec3D]>,
        pressure: PressureModel,
    ) -> Self {
        let v_inf = freestream.norm();
        let n = mesh.num_panels();
        let mut field = Self {
            velocity: Vec::with_capacity(n),
            cp: Vec::with_capacity(n),
            transpiration: Vec::with_capacity(n),
        };

        for (i, panel) in mesh.panels().iter().enumerate() {
            let mut v = freestream + influence.induced_velocity(i, doublet);
            if let Some(w) = wake_velocity {
                v += w[i];
            }
            field.cp.push(pressure.cp(v, v_inf));
            field.transpiration.push(v.dot(&panel.normal()));
            field.velocity.push(v);
        }
        field
    }

    /// Velocity at a mesh vertex as the plain mean over its incident panels
    pub fn vertex_velocity(&self, mesh: &Mesh, vertex: usize) -> Vec3D {
        let faces = mesh.adjacency().faces_of(vertex);
        if faces.is_empty() {
            return Vec3D::ZERO;
        }
        faces.iter().map(|&f| self.velocity[f]).sum::<Vec3D>() * (1.0 / faces.len() as f64)
    }
}

/// How incident panels are weighted when averaging onto a vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VertexWeighting {
    /// Every incident panel counts once
    #[default]
    Equal,
    /// Weighted by panel area
    Area,
    /// Weighted by the panel's interior angle at the vertex
    Angle,
}

/// Per-vertex averages of the panel quantities
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VertexField {
    /// Source strength
    pub source: Vec<f64>,
    /// Doublet strength
    pub doublet: Vec<f64>,
    /// Velocity
    pub velocity: Vec<Vec3D>,
    /// Pressure coefficient
    pub cp: Vec<f64>,
    /// Transpiration
    pub transpiration: Vec<f64>,
}

impl VertexField {
    /// Average panel values onto vertices; vertices without panels get zeros
    pub fn compute(
        mesh: &Mesh,
        weighting: VertexWeighting,
        source: &[f64],
        doublet: &[f64],
        surface: &SurfaceField,
    ) -> Self {
        let nv = mesh.num_vertices();
        let mut field = Self {
            source: vec![0.0; nv],
            doublet: vec![0.0; nv],
            velocity: vec![Vec3D::ZERO; nv],
            cp: vec![0.0; nv],
            transpiration: vec![0.0; nv],
        };

        for v in 0..nv {
            let faces = mesh.adjacency().faces_of(v);
            let weights: Vec<f64> = faces
                .iter()
                .map(|&f| face_weight(mesh, weighting, f, v))
                .collect();
            let total: f64 = weights.iter().sum();
            if total <= 0.0 {
                continue;
            }

            for (&f, &w) in faces.iter().zip(&weights) {
                let w = w / total;
                field.source[v] += w * source[f];
                field.doublet[v] += w * doublet[f];
                field.velocity[v] += surface.velocity[f] * w;
                field.cp[v] += w * surface.cp[f];
                field.transpiration[v] += w * surface.transpiration[f];
            }
        }
        field
    }
}

fn face_weight(mesh: &Mesh, weighting: VertexWeighting, face: usize, vertex: usize) -> f64 {
    let panel = &mesh.panels()[face];
    match weighting {
        VertexWeighting::Equal => 1.0,
        VertexWeighting::Area => panel.area(),
        VertexWeighting::Angle => {
            let ids = panel.vertex_ids();
            let Some(k) = panel.corner_index(vertex) else {
                return 0.0;
            };
            let n = ids.len();
            let here = mesh.vertices()[vertex];
            let a = mesh.vertices()[ids[(k + n - 1) % n]] - here;
            let b = mesh.vertices()[ids[(k + 1) % n]] - here;
            a.cross(&b).norm().atan2(a.dot(&b))
        }
    }
}
