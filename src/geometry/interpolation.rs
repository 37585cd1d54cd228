//! Position kernels of the structured lattice builder.
//!
//! Parametrization is uniform in every direction: the `k`-th of `n`
//! divisions sits at `t = k / n`.

use crate::data::lattice::Lattice;
use crate::geometry::vector::{Pos3d, combine, dist, lerp};

/// `ndiv + 1` equally spaced points from `p1` to `p2`.
pub fn linear_positions(p1: Pos3d, p2: Pos3d, ndiv: usize) -> Vec<Pos3d> {
    if ndiv == 0 {
        return vec![p1];
    }
    let mut out: Vec<Pos3d> = (0..=ndiv)
        .map(|k| lerp(p1, p2, k as f64 / ndiv as f64))
        .collect();
    out[ndiv] = p2;
    out
}

/// Total length of a polyline.
pub fn polyline_length(vertices: &[Pos3d]) -> f64 {
    vertices.windows(2).map(|w| dist(w[0], w[1])).sum()
}

/// `ndiv + 1` points at equal arc length along a polyline.
pub fn polyline_positions(vertices: &[Pos3d], ndiv: usize) -> Vec<Pos3d> {
    let Some((&first, rest)) = vertices.split_first() else {
        return Vec::new();
    };
    let last = rest.last().copied().unwrap_or(first);
    if ndiv == 0 {
        return vec![first];
    }
    let total = polyline_length(vertices);
    if total <= 0.0 {
        return vec![first; ndiv + 1];
    }

    let mut out = Vec::with_capacity(ndiv + 1);
    out.push(first);
    let mut seg = 0usize;
    let mut walked = 0.0;
    for k in 1..ndiv {
        let target = total * k as f64 / ndiv as f64;
        while seg + 1 < vertices.len() {
            let len = dist(vertices[seg], vertices[seg + 1]);
            if walked + len >= target || seg + 2 == vertices.len() {
                let t = if len > 0.0 { (target - walked) / len } else { 0.0 };
                out.push(lerp(vertices[seg], vertices[seg + 1], t.clamp(0.0, 1.0)));
                break;
            }
            walked += len;
            seg += 1;
        }
    }
    out.push(last);
    out
}

/// Discrete bilinearly blended (Coons) patch over four boundary sequences.
///
/// `bottom` and `top` run along the `i` direction (`n_i + 1` points each),
/// `left` and `right` along `j` (`n_j + 1` points each); all four start at
/// the `i = 0` / `j = 0` end. The result has shape `1 × (n_j+1) × (n_i+1)` and
/// reproduces the boundary sequences exactly when their corners agree.
pub fn transfinite_quad(
    bottom: &[Pos3d],
    right: &[Pos3d],
    top: &[Pos3d],
    left: &[Pos3d],
) -> Lattice<Pos3d> {
    let ni = bottom.len().saturating_sub(1);
    let nj = left.len().saturating_sub(1);
    let p00 = bottom[0];
    let p10 = bottom[ni];
    let p01 = top[0];
    let p11 = top[ni];
    let frac = |x: usize, n: usize| if n == 0 { 0.0 } else { x as f64 / n as f64 };

    Lattice::from_fn(1, nj + 1, ni + 1, |(_, j, i)| {
        if j == 0 {
            return bottom[i];
        }
        if j == nj {
            return top[i];
        }
        if i == 0 {
            return left[j];
        }
        if i == ni {
            return right[j];
        }
        let u = frac(i, ni);
        let v = frac(j, nj);
        combine(&[
            (1.0 - v, bottom[i]),
            (v, top[i]),
            (1.0 - u, left[j]),
            (u, right[j]),
            (-(1.0 - u) * (1.0 - v), p00),
            (-u * (1.0 - v), p10),
            (-u * v, p11),
            (-(1.0 - u) * v, p01),
        ])
    })
}

/// Trilinear blend of a hexahedron's eight corners.
///
/// Corners follow block vertex order: `0..4` the base loop, `4..8` the
/// vertices above them. `i` runs 0→1, `j` runs 1→2 (equivalently 0→3) and
/// `k` runs 0→4. Shape is `(nk+1) × (nj+1) × (ni+1)`.
pub fn trilinear_hex(corners: &[Pos3d; 8], ni: usize, nj: usize, nk: usize) -> Lattice<Pos3d> {
    let frac = |x: usize, n: usize| if n == 0 { 0.0 } else { x as f64 / n as f64 };
    Lattice::from_fn(nk + 1, nj + 1, ni + 1, |(k, j, i)| {
        let u = frac(i, ni);
        let v = frac(j, nj);
        let w = frac(k, nk);
        let bilinear = |c: &[Pos3d]| {
            combine(&[
                ((1.0 - u) * (1.0 - v), c[0]),
                (u * (1.0 - v), c[1]),
                (u * v, c[2]),
                ((1.0 - u) * v, c[3]),
            ])
        };
        combine(&[(1.0 - w, bilinear(&corners[0..4])), (w, bilinear(&corners[4..8]))])
    })
}

/// Transfinite (Gordon-Hall) blend of a hexahedral lattice's boundary.
///
/// Only the cells on the six faces of `boundary` are read; every cell of the
/// result is recomputed from them. Boundary cells come back unchanged and
/// planar, evenly divided boundaries give the same lattice as
/// [`trilinear_hex`].
pub fn transfinite_hex(boundary: &Lattice<Pos3d>) -> Lattice<Pos3d> {
    let (layers, rows, cols) = boundary.shape();
    let (nk, nj, ni) = (
        layers.saturating_sub(1),
        rows.saturating_sub(1),
        cols.saturating_sub(1),
    );
    let x = |k: usize, j: usize, i: usize| boundary[(k, j, i)];
    let frac = |x: usize, n: usize| if n == 0 { 0.0 } else { x as f64 / n as f64 };
    let corners = [
        x(0, 0, 0),
        x(0, 0, ni),
        x(0, nj, ni),
        x(0, nj, 0),
        x(nk, 0, 0),
        x(nk, 0, ni),
        x(nk, nj, ni),
        x(nk, nj, 0),
    ];
    let trilinear = trilinear_hex(&corners, ni, nj, nk);

    Lattice::from_fn(layers, rows, cols, |(k, j, i)| {
        if boundary.is_boundary((k, j, i)) {
            return x(k, j, i);
        }
        let (u, v, w) = (frac(i, ni), frac(j, nj), frac(k, nk));
        let (su, sv, sw) = (1.0 - u, 1.0 - v, 1.0 - w);
        combine(&[
            // faces
            (su, x(k, j, 0)),
            (u, x(k, j, ni)),
            (sv, x(k, 0, i)),
            (v, x(k, nj, i)),
            (sw, x(0, j, i)),
            (w, x(nk, j, i)),
            // edges along k
            (-su * sv, x(k, 0, 0)),
            (-u * sv, x(k, 0, ni)),
            (-su * v, x(k, nj, 0)),
            (-u * v, x(k, nj, ni)),
            // edges along i
            (-sv * sw, x(0, 0, i)),
            (-v * sw, x(0, nj, i)),
            (-sv * w, x(nk, 0, i)),
            (-v * w, x(nk, nj, i)),
            // edges along j
            (-su * sw, x(0, j, 0)),
            (-u * sw, x(0, j, ni)),
            (-su * w, x(nk, j, 0)),
            (-u * w, x(nk, j, ni)),
            // corners
            (1.0, trilinear[(k, j, i)]),
        ])
    })
}
