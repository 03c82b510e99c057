//! Free wake shed from the trailing edges
//!
//! Each trailing edge sheds two filaments, one per trailing-edge vertex.
//! Row 0 of a filament is the trailing-edge vertex itself; each rollup step
//! convects every existing row by one time step and appends a row. The
//! quadrilateral between rows j and j+1 of the two filaments is wake
//! segment j, acting as a vortex ring whose strength was fixed when it was
//! shed. Segment 0 is always the newest.

use serde::{Deserialize, Serialize};

use crate::core::constants::{DEFAULT_WAKE_CIRCULATION, WAKE_PROXIMITY, ZERO_ERROR};
use crate::core::geometry::{Vec3D, quad_area};
use crate::core::kernels::line_vortex;
use crate::core::mesh::{Mesh, Panel, TrailingEdge};

/// Circulation assigned to a newly shed segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WakeCirculation {
    /// Same constant for every segment
    Fixed(f64),
    /// Doublet jump across the trailing edge: μ(face1) - μ(face2), or μ(face1)
    /// when only one panel touches the edge
    KuttaJump,
}

impl Default for WakeCirculation {
    fn default() -> Self {
        WakeCirculation::Fixed(DEFAULT_WAKE_CIRCULATION)
    }
}

impl WakeCirculation {
    /// Circulation of the next segment shed from `edge`
    pub fn value(&self, edge: &TrailingEdge, doublet: &[f64]) -> f64 {
        match *self {
            WakeCirculation::Fixed(gamma) => gamma,
            WakeCirculation::KuttaJump => {
                let upper = doublet[edge.face1];
                match edge.face2 {
                    Some(f) => upper - doublet[f],
                    None => upper,
                }
            }
        }
    }
}

/// How a wake segment induces velocity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WakeEdgeMode {
    /// Full vortex ring of every segment (doublet-panel kernel with far-field switch)
    #[default]
    ClosedRing,
    /// Only the bound edge (row 0) of the newest segment
    BoundEdgeOnly,
}

/// Strength record of one shed segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WakeSegment {
    /// Ring circulation at the time of shedding
    pub circulation: f64,
    /// Quad area at the time of shedding
    pub area: f64,
}

/// Velocity induced at `p` by one wake segment with the given corners
///
/// Corners are ordered filament1[j], filament2[j], filament2[j+1],
/// filament1[j+1]. The ring strength is scaled by the ratio of the area at
/// shedding to the current area, so a stretched segment keeps its total
/// vorticity. `newest` marks segment 0, the only one that contributes in
/// [`WakeEdgeMode::BoundEdgeOnly`]. Points within the proximity radius of a
/// corner and degenerate quads give zero.
pub fn segment_velocity(
    corners: &[Vec3D; 4],
    segment: &WakeSegment,
    newest: bool,
    mode: WakeEdgeMode,
    p: Vec3D,
) -> Vec3D {
    if corners.iter().any(|c| c.distance(&p) < WAKE_PROXIMITY) {
        return Vec3D::ZERO;
    }
    match mode {
        WakeEdgeMode::ClosedRing => match Panel::new(Vec::new(), corners) {
            Ok(ring) => {
                let scale = segment.circulation * segment.area / (ring.area() + ZERO_ERROR);
                ring.doublet_velocity(p) * scale
            }
            Err(_) => Vec3D::ZERO,
        },
        WakeEdgeMode::BoundEdgeOnly => {
            if !newest {
                return Vec3D::ZERO;
            }
            let [a, b, c, d] = *corners;
            let scale = segment.circulation * segment.area / (quad_area(a, b, c, d) + ZERO_ERROR);
            line_vortex(a, b, p) * scale
        }
    }
}

/// Wake of one trailing edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrailingEdgeWake {
    /// Trailing edge the filaments start from
    pub edge: TrailingEdge,
    /// Rows shed from `edge.v1`
    pub filament1: Vec<Vec3D>,
    /// Rows shed from `edge.v2`
    pub filament2: Vec<Vec3D>,
    /// One record per segment, newest first
    pub segments: Vec<WakeSegment>,
}

impl TrailingEdgeWake {
    /// Number of rows, trailing-edge row included
    pub fn num_rows(&self) -> usize {
        self.filament1.len()
    }

    /// Corners of segment `j`
    pub fn segment_corners(&self, j: usize) -> [Vec3D; 4] {
        [
            self.filament1[j],
            self.filament2[j],
            self.filament2[j + 1],
            self.filament1[j + 1],
        ]
    }

    /// Velocity induced at `p` by all segments except `skip`
    pub fn induced_velocity(&self, p: Vec3D, mode: WakeEdgeMode, skip: Option<usize>) -> Vec3D {
        self.segments
            .iter()
            .enumerate()
            .filter(|&(j, _)| Some(j) != skip)
            .map(|(j, seg)| segment_velocity(&self.segment_corners(j), seg, j == 0, mode, p))
            .sum()
    }
}

/// Velocities of the rows of one trailing-edge wake, row 0 first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowVelocities {
    /// Velocity of each row of filament 1
    pub filament1: Vec<Vec3D>,
    /// Velocity of each row of filament 2
    pub filament2: Vec<Vec3D>,
}

/// All trailing-edge wakes of a mesh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wake {
    edges: Vec<TrailingEdgeWake>,
    max_rows: usize,
    edge_mode: WakeEdgeMode,
}

impl Wake {
    /// Start a wake with only the trailing-edge row; `max_rows` caps the rows ever built
    pub fn new(mesh: &Mesh, max_rows: usize, edge_mode: WakeEdgeMode) -> Self {
        let capacity = max_rows.max(1);
        let edges = mesh
            .trailing_edges()
            .iter()
            .map(|&edge| {
                let mut filament1 = Vec::with_capacity(capacity);
                let mut filament2 = Vec::with_capacity(capacity);
                filament1.push(mesh.vertices()[edge.v1]);
                filament2.push(mesh.vertices()[edge.v2]);
                TrailingEdgeWake {
                    edge,
                    filament1,
                    filament2,
                    segments: Vec::with_capacity(capacity - 1),
                }
            })
            .collect();

        Self {
            edges,
            max_rows: capacity,
            edge_mode,
        }
    }

    /// Per trailing-edge wakes, in trailing-edge order
    pub fn edges(&self) -> &[TrailingEdgeWake] {
        &self.edges
    }

    /// Number of trailing edges
    pub fn num_trailing_edges(&self) -> usize {
        self.edges.len()
    }

    /// Rows built so far (all trailing edges advance together)
    pub fn num_rows(&self) -> usize {
        self.edges.first().map_or(1, |e| e.num_rows())
    }

    /// Row cap given at construction (at least 1)
    pub fn max_rows(&self) -> usize {
        self.max_rows
    }

    /// True once every row has been built
    pub fn is_complete(&self) -> bool {
        self.num_rows() >= self.max_rows
    }

    /// Segment velocity mode
    pub fn edge_mode(&self) -> WakeEdgeMode {
        self.edge_mode
    }

    /// Velocity induced at `p` by every segment, except segment `skip.1` of trailing edge `skip.0`
    pub fn induced_velocity(&self, p: Vec3D, skip: Option<(usize, usize)>) -> Vec3D {
        self.edges
            .iter()
            .enumerate()
            .map(|(t, wake)| {
                let skip_segment = skip.and_then(|(te, seg)| (te == t).then_some(seg));
                wake.induced_velocity(p, self.edge_mode, skip_segment)
            })
            .sum()
    }

    /// Convect every row by `dt` and append one row
    ///
    /// `velocities[t]` holds the velocities of the current rows of trailing
    /// edge t. Row j+1 becomes row j + dt·v_j; row 0 stays on the trailing
    /// edge.
    pub fn convect(&mut self, velocities: &[RowVelocities], dt: f64) {
        for (wake, vel) in self.edges.iter_mut().zip(velocities) {
            advance_filament(&mut wake.filament1, &vel.filament1, dt);
            advance_filament(&mut wake.filament2, &vel.filament2, dt);
        }
    }

    /// Push the segment history back by one and record the newest segment
    ///
    /// `circulations[t]` is the strength of the segment now spanning rows 0
    /// and 1 of trailing edge t; its area is measured here.
    pub fn shed(&mut self, circulations: &[f64]) {
        for (t, (wake, &circulation)) in self.edges.iter_mut().zip(circulations).enumerate() {
            if wake.num_rows() < 2 {
                continue;
            }
            let corners = wake.segment_corners(0);
            let [a, b, c, d] = corners;
            if let Err(defect) = Panel::new(Vec::new(), &corners) {
                log::warn!(
                    "Wake segment 0 of trailing edge {t} is degenerate ({defect}); \
                     it will induce no velocity"
                );
            }
            wake.segments.insert(
                0,
                WakeSegment {
                    circulation,
                    area: quad_area(a, b, c, d),
                },
            );
        }
    }

    /// Filament rows as a flat array, one block of 6·rows values per trailing edge
    ///
    /// Block layout: filament1 x, y, z then filament2 x, y, z, each over all rows.
    pub fn filament_points(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.edges.len() * 6 * self.num_rows());
        for wake in &self.edges {
            for filament in [&wake.filament1, &wake.filament2] {
                out.extend(filament.iter().map(|p| p.x));
                out.extend(filament.iter().map(|p| p.y));
                out.extend(filament.iter().map(|p| p.z));
            }
        }
        out
    }
}

fn advance_filament(rows: &mut Vec<Vec3D>, velocity: &[Vec3D], dt: f64) {
    let moved: Vec<Vec3D> = rows
        .iter()
        .zip(velocity)
        .map(|(&p, &v)| p + v * dt)
        .collect();
    rows.truncate(1);
    rows.extend(moved);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mesh::flat_plate_mesh;
    use approx::assert_relative_eq;

    fn uniform(wake: &Wake, v: Vec3D) -> Vec<RowVelocities> {
        wake.edges()
            .iter()
            .map(|e| RowVelocities {
                filament1: vec![v; e.num_rows()],
                filament2: vec![v; e.num_rows()],
            })
            .collect()
    }

    fn step(wake: &mut Wake, v: Vec3D, dt: f64, gamma: f64) {
        let vel = uniform(wake, v);
        wake.convect(&vel, dt);
        let circ = vec![gamma; wake.num_trailing_edges()];
        wake.shed(&circ);
    }

    #[test]
    fn test_uniform_convection_builds_rows() {
        let mesh = flat_plate_mesh(1.0, 2.0, 2, 2).unwrap();
        let mut wake = Wake::new(&mesh, 4, WakeEdgeMode::ClosedRing);
        assert_eq!(wake.num_rows(), 1);
        assert!(wake.edges()[0].segments.is_empty());

        for k in 0..3 {
            step(&mut wake, Vec3D::new(1.0, 0.0, 0.0), 0.5, k as f64);
        }
        assert!(wake.is_complete());

        let e = &wake.edges()[0];
        assert_eq!(e.num_rows(), 4);
        for (j, p) in e.filament1.iter().enumerate() {
            assert_relative_eq!(p.x, 1.0 + 0.5 * j as f64, epsilon = 1e-14);
        }
        // newest first
        let circ: Vec<f64> = e.segments.iter().map(|s| s.circulation).collect();
        assert_eq!(circ, vec![2.0, 1.0, 0.0]);
        for s in &e.segments {
            assert_relative_eq!(s.area, 0.5, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_filament_layout() {
        let mesh = flat_plate_mesh(1.0, 2.0, 1, 2).unwrap();
        let mut wake = Wake::new(&mesh, 3, WakeEdgeMode::ClosedRing);
        step(&mut wake, Vec3D::new(1.0, 0.0, 0.0), 1.0, -5.0);
        step(&mut wake, Vec3D::new(1.0, 0.0, 0.0), 1.0, -5.0);

        let flat = wake.filament_points();
        assert_eq!(flat.len(), 2 * 6 * 3);
        // trailing edge 1, filament 2, y block
        let base = 6 * 3;
        assert_eq!(&flat[base + 4 * 3..base + 5 * 3], &[1.0, 1.0, 1.0]);
        assert_eq!(&flat[base..base + 3], &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_kutta_jump() {
        let edge = TrailingEdge {
            v1: 0,
            v2: 1,
            face1: 0,
            face2: Some(2),
        };
        let mu = [0.7, 0.0, 0.2];
        assert_relative_eq!(WakeCirculation::KuttaJump.value(&edge, &mu), 0.5);
        let one_sided = TrailingEdge { face2: None, ..edge };
        assert_relative_eq!(WakeCirculation::KuttaJump.value(&one_sided, &mu), 0.7);
        assert_eq!(WakeCirculation::default().value(&edge, &mu), -5.0);
    }

    #[test]
    fn test_segment_velocity_modes() {
        let corners = [
            Vec3D::new(0.0, 0.0, 0.0),
            Vec3D::new(0.0, 1.0, 0.0),
            Vec3D::new(1.0, 1.0, 0.0),
            Vec3D::new(1.0, 0.0, 0.0),
        ];
        let seg = WakeSegment {
            circulation: 2.0,
            area: 1.0,
        };
        let p = Vec3D::new(0.5, 0.5, 0.3);

        let ring = segment_velocity(&corners, &seg, true, WakeEdgeMode::ClosedRing, p);
        let unit = Panel::new(Vec::new(), &corners).unwrap().doublet_velocity(p);
        assert!((ring - unit * (2.0 / (1.0 + ZERO_ERROR))).norm() < 1e-14);

        let bound = segment_velocity(&corners, &seg, true, WakeEdgeMode::BoundEdgeOnly, p);
        let edge = line_vortex(corners[0], corners[1], p) * (2.0 / (1.0 + ZERO_ERROR));
        assert!((bound - edge).norm() < 1e-14);

        let old = segment_velocity(&corners, &seg, false, WakeEdgeMode::BoundEdgeOnly, p);
        assert_eq!(old, Vec3D::ZERO);

        let at_corner =
            segment_velocity(&corners, &seg, true, WakeEdgeMode::ClosedRing, corners[2]);
        assert_eq!(at_corner, Vec3D::ZERO);
    }

    #[test]
    fn test_skip_pair() {
        let mesh = flat_plate_mesh(1.0, 2.0, 1, 2).unwrap();
        let mut wake = Wake::new(&mesh, 2, WakeEdgeMode::ClosedRing);
        step(&mut wake, Vec3D::new(1.0, 0.0, 0.0), 1.0, 1.0);

        let p = Vec3D::new(1.5, 0.3, 0.2);
        let all = wake.induced_velocity(p, None);
        let without_first = wake.induced_velocity(p, Some((0, 0)));
        let first_only = wake.edges()[0].induced_velocity(p, WakeEdgeMode::ClosedRing, None);
        assert!((all - first_only - without_first).norm() < 1e-14);
    }
}
