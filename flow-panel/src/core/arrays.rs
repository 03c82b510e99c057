//! Flat-array entry points
//!
//! These functions take and return plain `f64`/`usize` slices in row-major
//! layout, for callers that keep meshes and wakes in their own buffers.
//! They build panels with the same builder and call the same kernels as
//! [`crate::core::PanelSolver`], so both paths give identical numbers.
//!
//! Layouts:
//! - vertices: `3·n_v` coordinates
//! - `faces3` / `faces4`: `3·n_f3` / `4·n_f4` vertex ids; triangles are
//!   numbered before quads
//! - wake ids: `[n_te][n_w][2]` indices into the wake vertex array
//! - wake areas and circulations: `[n_te][n_w - 1]`

use crate::core::assembly::influence_row;
use crate::core::error::{PanelError, Result};
use crate::core::geometry::Vec3D;
use crate::core::mesh::{Panel, build_panels, flat_faces, flat_vertices};
use crate::core::parallel::parallel_map_indexed;
use crate::core::velocity::surface_induced;
use crate::core::wake::{Wake, WakeEdgeMode, WakeSegment, segment_velocity};

/// Panels built from flat vertex and face arrays
#[derive(Debug, Clone, PartialEq)]
pub struct FlatPanels {
    panels: Vec<Panel>,
}

/// Influence coefficients in split-component, row-major form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InfluenceArrays {
    /// x of unit-doublet velocity, `aij_x[i * n + j]` = panel j at control point i
    pub aij_x: Vec<f64>,
    /// y of unit-doublet velocity
    pub aij_y: Vec<f64>,
    /// z of unit-doublet velocity
    pub aij_z: Vec<f64>,
    /// x of V∞ + source-induced velocity at control point i
    pub bi_x: Vec<f64>,
    /// y of V∞ + source-induced velocity
    pub bi_y: Vec<f64>,
    /// z of V∞ + source-induced velocity
    pub bi_z: Vec<f64>,
}

/// Borrowed wake buffers
#[derive(Debug, Clone, Copy)]
pub struct FlatWake<'a> {
    /// Number of trailing edges
    pub num_trailing_edges: usize,
    /// Rows per trailing edge (n_w)
    pub num_rows: usize,
    /// Segments currently active per trailing edge (≤ n_w - 1)
    pub num_segments: usize,
    /// `[n_te][n_w][2]` wake vertex ids
    pub ids: &'a [usize],
    /// Wake vertex coordinates, 3 per vertex
    pub vertices: &'a [f64],
    /// `[n_te][n_w - 1]` segment areas at shedding
    pub areas: &'a [f64],
    /// `[n_te][n_w - 1]` segment circulations
    pub circulations: &'a [f64],
}

impl FlatWake<'_> {
    /// Check buffer lengths and id ranges
    pub fn validate(&self) -> Result<()> {
        let n_te = self.num_trailing_edges;
        let n_w = self.num_rows;
        let segments = n_w.saturating_sub(1);

        if self.num_segments > segments {
            return Err(PanelError::Index(format!(
                "{} active wake segments requested, but {n_w} rows allow at most {segments}",
                self.num_segments
            )));
        }
        if self.ids.len() != n_te * n_w * 2 {
            return Err(PanelError::Index(format!(
                "wake ids have length {}, expected {}",
                self.ids.len(),
                n_te * n_w * 2
            )));
        }
        if self.vertices.len() % 3 != 0 {
            return Err(PanelError::Index(format!(
                "wake vertices have length {}, which is not a multiple of 3",
                self.vertices.len()
            )));
        }
        for (name, data) in [("areas", self.areas), ("circulations", self.circulations)] {
            if data.len() != n_te * segments {
                return Err(PanelError::Index(format!(
                    "wake {name} have length {}, expected {}",
                    data.len(),
                    n_te * segments
                )));
            }
        }
        let nv = self.vertices.len() / 3;
        if let Some(&bad) = self.ids.iter().find(|&&id| id >= nv) {
            return Err(PanelError::Index(format!(
                "wake id {bad} is outside the {nv} wake vertices"
            )));
        }
        Ok(())
    }

    fn vertex(&self, te: usize, row: usize, side: usize) -> Vec3D {
        let id = self.ids[(te * self.num_rows + row) * 2 + side];
        Vec3D::new(
            self.vertices[3 * id],
            self.vertices[3 * id + 1],
            self.vertices[3 * id + 2],
        )
    }

    /// Corners of segment `j` of trailing edge `te`
    fn corners(&self, te: usize, j: usize) -> [Vec3D; 4] {
        [
            self.vertex(te, j, 0),
            self.vertex(te, j, 1),
            self.vertex(te, j + 1, 1),
            self.vertex(te, j + 1, 0),
        ]
    }

    fn segment(&self, te: usize, j: usize) -> WakeSegment {
        let k = te * (self.num_rows - 1) + j;
        WakeSegment {
            circulation: self.circulations[k],
            area: self.areas[k],
        }
    }

    fn induced_velocity(
        &self,
        p: Vec3D,
        mode: WakeEdgeMode,
        skip: Option<(usize, usize)>,
    ) -> Vec3D {
        (0..self.num_trailing_edges)
            .map(|te| {
                (0..self.num_segments)
                    .filter(|&j| skip != Some((te, j)))
                    .map(|j| {
                        let corners = self.corners(te, j);
                        segment_velocity(&corners, &self.segment(te, j), j == 0, mode, p)
                    })
                    .sum::<Vec3D>()
            })
            .sum()
    }
}

/// Owned wake buffers in the flat layout, taken from a [`Wake`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatWakeBuffers {
    /// Number of trailing edges
    pub num_trailing_edges: usize,
    /// Rows per trailing edge
    pub num_rows: usize,
    /// `[n_te][n_w][2]` wake vertex ids
    pub ids: Vec<usize>,
    /// Wake vertex coordinates
    pub vertices: Vec<f64>,
    /// `[n_te][n_w - 1]` segment areas
    pub areas: Vec<f64>,
    /// `[n_te][n_w - 1]` segment circulations
    pub circulations: Vec<f64>,
}

impl FlatWakeBuffers {
    /// Copy the rows built so far; every row gets its own pair of vertex ids
    pub fn from_wake(wake: &Wake) -> Self {
        let n_w = wake.num_rows();
        let mut out = Self {
            num_trailing_edges: wake.num_trailing_edges(),
            num_rows: n_w,
            ..Default::default()
        };

        for edge in wake.edges() {
            for j in 0..n_w {
                for filament in [&edge.filament1, &edge.filament2] {
                    out.ids.push(out.vertices.len() / 3);
                    out.vertices.extend_from_slice(&filament[j].to_array());
                }
            }
            for seg in &edge.segments {
                out.areas.push(seg.area);
                out.circulations.push(seg.circulation);
            }
        }
        out
    }

    /// Borrow with every segment active
    pub fn view(&self) -> FlatWake<'_> {
        FlatWake {
            num_trailing_edges: self.num_trailing_edges,
            num_rows: self.num_rows,
            num_segments: self.num_rows.saturating_sub(1),
            ids: &self.ids,
            vertices: &self.vertices,
            areas: &self.areas,
            circulations: &self.circulations,
        }
    }
}

impl FlatPanels {
    /// Build panels from flat arrays
    pub fn from_arrays(vertices: &[f64], faces3: &[usize], faces4: &[usize]) -> Result<Self> {
        let vertices = flat_vertices(vertices)?;
        let faces = flat_faces(faces3, faces4)?;
        Ok(Self {
            panels: build_panels(&vertices, &faces)?,
        })
    }

    /// Panels in face order
    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    /// Number of panels
    pub fn len(&self) -> usize {
        self.panels.len()
    }

    /// True when there are no panels
    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// Control points, 3 coordinates per panel
    pub fn control_points(&self) -> Vec<f64> {
        self.panels
            .iter()
            .flat_map(|p| p.control_point().to_array())
            .collect()
    }

    /// Unit-doublet influence and V∞ + source velocity at every control point
    pub fn aij_and_bi(&self, freestream: [f64; 3], source: &[f64]) -> Result<InfluenceArrays> {
        let n = self.len();
        self.check_strengths("source", source)?;
        let v_inf = Vec3D::from(freestream);

        let rows = parallel_map_indexed(n, |i| {
            influence_row(&self.panels, source, self.panels[i].control_point())
        });

        let mut out = InfluenceArrays {
            aij_x: Vec::with_capacity(n * n),
            aij_y: Vec::with_capacity(n * n),
            aij_z: Vec::with_capacity(n * n),
            bi_x: Vec::with_capacity(n),
            bi_y: Vec::with_capacity(n),
            bi_z: Vec::with_capacity(n),
        };
        for (aic, b) in rows {
            for v in aic {
                out.aij_x.push(v.x);
                out.aij_y.push(v.y);
                out.aij_z.push(v.z);
            }
            let b = v_inf + b;
            out.bi_x.push(b.x);
            out.bi_y.push(b.y);
            out.bi_z.push(b.z);
        }
        Ok(out)
    }

    /// Velocity at `point` from freestream, surface singularities and wake
    ///
    /// `skip` leaves out one (trailing edge, segment) pair.
    #[allow(clippy::too_many_arguments)]
    pub fn point_velocity(
        &self,
        point: [f64; 3],
        freestream: [f64; 3],
        source: &[f64],
        doublet: &[f64],
        wake: Option<&FlatWake<'_>>,
        edge_mode: WakeEdgeMode,
        skip: Option<(usize, usize)>,
    ) -> Result<[f64; 3]> {
        self.check_strengths("source", source)?;
        self.check_strengths("doublet", doublet)?;
        let p = Vec3D::from(point);

        let mut v = Vec3D::from(freestream) + surface_induced(&self.panels, source, doublet, p);
        if let Some(wake) = wake {
            wake.validate()?;
            v += wake.induced_velocity(p, edge_mode, skip);
        }
        Ok(v.to_array())
    }

    /// Unit-circulation velocity of each trailing edge's first wake quad at every control point
    ///
    /// Returns `[n_te][n_panels]` velocities, row-major.
    pub fn wake_influence(&self, wake: &FlatWake<'_>) -> Result<Vec<[f64; 3]>> {
        wake.validate()?;
        if wake.num_rows < 2 {
            return Err(PanelError::Index(
                "wake influence needs at least two wake rows".into(),
            ));
        }

        let mut out = Vec::with_capacity(wake.num_trailing_edges * self.len());
        for te in 0..wake.num_trailing_edges {
            let corners = wake.corners(te, 0);
            match Panel::new(Vec::new(), &corners) {
                Ok(ring) => out.extend(
                    self.panels
                        .iter()
                        .map(|p| ring.doublet_velocity(p.control_point()).to_array()),
                ),
                Err(defect) => {
                    log::warn!("First wake quad of trailing edge {te} is degenerate ({defect})");
                    out.extend(std::iter::repeat_n([0.0; 3], self.len()));
                }
            }
        }
        Ok(out)
    }

    fn check_strengths(&self, name: &str, values: &[f64]) -> Result<()> {
        if values.len() != self.len() {
            return Err(PanelError::Index(format!(
                "{name} has {} values for {} panels",
                values.len(),
                self.len()
            )));
        }
        Ok(())
    }
}
