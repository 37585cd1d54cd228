//! Circular sector through three points.

use std::f64::consts::TAU;

use crate::geometry::vector::{Pos3d, add, cross, dot, norm, scale, sub};
use crate::mesh_error::MeshError;

const EPS: f64 = 1e-12;

/// Circular arc from `start` through `mid` to `end`.
///
/// The arc lives in the plane of the three points; angles are measured from
/// `start` around the normal `(mid - start) × (end - start)`, so the sector
/// always sweeps through `mid`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircularSector {
    center: Pos3d,
    radius: f64,
    e1: Pos3d,
    e2: Pos3d,
    start: Pos3d,
    end: Pos3d,
    mid_angle: f64,
    swept: f64,
}

impl CircularSector {
    /// Builds the sector; fails on coincident or collinear points.
    pub fn from_three_points(start: Pos3d, mid: Pos3d, end: Pos3d) -> Result<Self, MeshError> {
        let ab = sub(mid, start);
        let ac = sub(end, start);
        let n = cross(ab, ac);
        let n2 = dot(n, n);
        if n2 <= EPS * dot(ab, ab) * dot(ac, ac) {
            return Err(MeshError::InvalidGeometry(
                "circular arc points are collinear or coincident".into(),
            ));
        }
        let offset = add(scale(cross(ac, n), dot(ab, ab)), scale(cross(n, ab), dot(ac, ac)));
        let center = add(start, scale(offset, 1.0 / (2.0 * n2)));
        let radial = sub(start, center);
        let radius = norm(radial);
        let e1 = scale(radial, 1.0 / radius);
        let normal = scale(n, 1.0 / n2.sqrt());
        let e2 = cross(normal, e1);

        let mut sector = Self {
            center,
            radius,
            e1,
            e2,
            start,
            end,
            mid_angle: 0.0,
            swept: 0.0,
        };
        sector.mid_angle = sector.angle_of(mid);
        sector.swept = sector.angle_of(end);
        Ok(sector)
    }

    /// Angle of `p` in `[0, 2π)` measured from `start`.
    fn angle_of(&self, p: Pos3d) -> f64 {
        let v = sub(p, self.center);
        let theta = dot(v, self.e2).atan2(dot(v, self.e1));
        if theta < 0.0 { theta + TAU } else { theta }
    }

    pub fn center(&self) -> Pos3d {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Angle swept from start to end, in radians.
    pub fn included_angle(&self) -> f64 {
        self.swept
    }

    /// Angle of the midpoint, in radians from start.
    pub fn mid_angle(&self) -> f64 {
        self.mid_angle
    }

    pub fn length(&self) -> f64 {
        self.radius * self.swept
    }

    /// Point at normalized parameter `t ∈ [0, 1]`.
    pub fn point_at(&self, t: f64) -> Pos3d {
        let theta = t * self.swept;
        add(
            self.center,
            add(
                scale(self.e1, self.radius * theta.cos()),
                scale(self.e2, self.radius * theta.sin()),
            ),
        )
    }

    /// `ndiv + 1` points at equal angular increments; ends are the exact
    /// input points.
    pub fn positions(&self, ndiv: usize) -> Vec<Pos3d> {
        if ndiv == 0 {
            return vec![self.start];
        }
        let mut out: Vec<Pos3d> = (0..=ndiv)
            .map(|k| self.point_at(k as f64 / ndiv as f64))
            .collect();
        out[0] = self.start;
        out[ndiv] = self.end;
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::vector::dist2;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn quarter_circle() {
        let s = CircularSector::from_three_points(
            [1.0, 0.0, 0.0],
            [(0.25 * PI).cos(), (0.25 * PI).sin(), 0.0],
            [0.0, 1.0, 0.0],
        )
        .unwrap();
        assert!(dist2(s.center(), [0.0; 3]) < 1e-20);
        assert!((s.radius() - 1.0).abs() < 1e-12);
        assert!((s.included_angle() - FRAC_PI_2).abs() < 1e-12);
        assert!((s.length() - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn positions_are_equiangular_and_on_circle() {
        let s = CircularSector::from_three_points([2.0, 0.0, 1.0], [0.0, 2.0, 1.0], [-2.0, 0.0, 1.0])
            .unwrap();
        let pts = s.positions(4);
        assert_eq!(pts.len(), 5);
        assert_eq!(pts[0], [2.0, 0.0, 1.0]);
        assert_eq!(pts[4], [-2.0, 0.0, 1.0]);
        for p in &pts {
            assert!((dist2(*p, [0.0, 0.0, 1.0]) - 4.0).abs() < 1e-12);
        }
        assert!(dist2(pts[2], [0.0, 2.0, 1.0]) < 1e-20);
        let c = 2f64.sqrt();
        assert!(dist2(pts[1], [c, c, 1.0]) < 1e-20);
    }

    #[test]
    fn major_arc_through_mid() {
        // Three-quarter circle: start (1,0), mid (-1,0), end (0,-1).
        let s = CircularSector::from_three_points([1.0, 0.0, 0.0], [-1.0, 0.0, 0.0], [0.0, -1.0, 0.0])
            .unwrap();
        assert!((s.included_angle() - 1.5 * PI).abs() < 1e-12);
        assert!((s.mid_angle() - PI).abs() < 1e-12);
    }

    #[test]
    fn collinear_points_are_rejected() {
        let err = CircularSector::from_three_points([0.0; 3], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]);
        assert!(matches!(err, Err(MeshError::InvalidGeometry(_))));
    }
}
