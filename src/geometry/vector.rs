//! Small helpers over `[f64; 3]` positions.

/// A position (or displacement) in 3D space.
pub type Pos3d = [f64; 3];

#[inline]
pub fn add(a: Pos3d, b: Pos3d) -> Pos3d {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

#[inline]
pub fn sub(a: Pos3d, b: Pos3d) -> Pos3d {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
pub fn scale(a: Pos3d, s: f64) -> Pos3d {
    [a[0] * s, a[1] * s, a[2] * s]
}

#[inline]
pub fn dot(a: Pos3d, b: Pos3d) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
pub fn cross(a: Pos3d, b: Pos3d) -> Pos3d {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[inline]
pub fn norm(a: Pos3d) -> f64 {
    dot(a, a).sqrt()
}

/// Squared distance between two positions.
#[inline]
pub fn dist2(a: Pos3d, b: Pos3d) -> f64 {
    let d = sub(a, b);
    dot(d, d)
}

#[inline]
pub fn dist(a: Pos3d, b: Pos3d) -> f64 {
    dist2(a, b).sqrt()
}

/// `a + t (b - a)`.
#[inline]
pub fn lerp(a: Pos3d, b: Pos3d, t: f64) -> Pos3d {
    add(a, scale(sub(b, a), t))
}

/// Weighted sum `Σ wᵢ pᵢ`.
pub fn combine(terms: &[(f64, Pos3d)]) -> Pos3d {
    terms
        .iter()
        .fold([0.0; 3], |acc, &(w, p)| add(acc, scale(p, w)))
}

/// Arithmetic mean of a non-empty set of positions.
pub fn centroid(points: &[Pos3d]) -> Option<Pos3d> {
    if points.is_empty() {
        return None;
    }
    let sum = points.iter().fold([0.0; 3], |acc, &p| add(acc, p));
    Some(scale(sum, 1.0 / points.len() as f64))
}
