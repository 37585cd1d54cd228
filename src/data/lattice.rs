//! Structured 3D arrays indexed by `(layer, row, col)`.
//!
//! Every meshed entity stores its nodes in a [`Lattice`]: an edge uses a
//! `1 × 1 × (ndiv+1)` lattice, a face `1 × (ndiv_j+1) × (ndiv_i+1)` and a
//! block `(ndiv_k+1) × (ndiv_j+1) × (ndiv_i+1)`. Storage is row-major with the
//! column index varying fastest.

use std::ops::{Index, IndexMut};

/// Lattice coordinates `(layer, row, col)`.
pub type LatticeIndex = (usize, usize, usize);

#[derive(Clone, Debug, PartialEq)]
pub struct Lattice<T> {
    layers: usize,
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Clone> Lattice<T> {
    /// A lattice with every cell set to `value`.
    pub fn filled(layers: usize, rows: usize, cols: usize, value: T) -> Self {
        Self {
            layers,
            rows,
            cols,
            data: vec![value; layers * rows * cols],
        }
    }
}

impl<T> Lattice<T> {
    /// Builds a lattice by evaluating `f` at every index.
    pub fn from_fn(
        layers: usize,
        rows: usize,
        cols: usize,
        mut f: impl FnMut(LatticeIndex) -> T,
    ) -> Self {
        let mut data = Vec::with_capacity(layers * rows * cols);
        for k in 0..layers {
            for j in 0..rows {
                for i in 0..cols {
                    data.push(f((k, j, i)));
                }
            }
        }
        Self {
            layers,
            rows,
            cols,
            data,
        }
    }

    /// One-layer, one-row lattice over a sequence.
    pub fn from_row(values: Vec<T>) -> Self {
        Self {
            layers: 1,
            rows: 1,
            cols: values.len(),
            data: values,
        }
    }

    /// `(layers, rows, cols)`.
    #[inline]
    pub fn shape(&self) -> LatticeIndex {
        (self.layers, self.rows, self.cols)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    fn offset(&self, (k, j, i): LatticeIndex) -> Option<usize> {
        (k < self.layers && j < self.rows && i < self.cols)
            .then(|| (k * self.rows + j) * self.cols + i)
    }

    pub fn get(&self, idx: LatticeIndex) -> Option<&T> {
        self.offset(idx).map(|o| &self.data[o])
    }

    pub fn get_mut(&mut self, idx: LatticeIndex) -> Option<&mut T> {
        self.offset(idx).map(move |o| &mut self.data[o])
    }

    /// Values in storage order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.data.iter()
    }

    /// `(index, value)` pairs in storage order.
    pub fn indexed_iter(&self) -> impl Iterator<Item = (LatticeIndex, &T)> + '_ {
        let (rows, cols) = (self.rows, self.cols);
        self.data.iter().enumerate().map(move |(o, v)| {
            let i = o % cols;
            let j = (o / cols) % rows;
            let k = o / (cols * rows);
            ((k, j, i), v)
        })
    }

    /// Index of the first cell satisfying `pred`.
    pub fn position(&self, mut pred: impl FnMut(&T) -> bool) -> Option<LatticeIndex> {
        self.indexed_iter().find(|(_, v)| pred(v)).map(|(idx, _)| idx)
    }

    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Lattice<U> {
        Lattice {
            layers: self.layers,
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(f).collect(),
        }
    }

    /// Whether `idx` lies on the outer hull of the lattice along any axis that
    /// has more than one cell.
    pub fn is_boundary(&self, (k, j, i): LatticeIndex) -> bool {
        let on = |x: usize, n: usize| n > 1 && (x == 0 || x == n - 1);
        on(k, self.layers) || on(j, self.rows) || on(i, self.cols)
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

impl<T> Lattice<Option<T>> {
    /// Converts a fully populated lattice of options into a lattice of values.
    ///
    /// On failure returns the first empty cell.
    pub fn into_complete(self) -> Result<Lattice<T>, LatticeIndex> {
        if let Some(hole) = self.position(Option::is_none) {
            return Err(hole);
        }
        Ok(Lattice {
            layers: self.layers,
            rows: self.rows,
            cols: self.cols,
            data: self.data.into_iter().flatten().collect(),
        })
    }
}

impl<T> Index<LatticeIndex> for Lattice<T> {
    type Output = T;

    fn index(&self, idx: LatticeIndex) -> &T {
        match self.offset(idx) {
            Some(o) => &self.data[o],
            None => panic!("lattice index {idx:?} out of bounds for shape {:?}", self.shape()),
        }
    }
}

impl<T> IndexMut<LatticeIndex> for Lattice<T> {
    fn index_mut(&mut self, idx: LatticeIndex) -> &mut T {
        let shape = self.shape();
        match self.offset(idx) {
            Some(o) => &mut self.data[o],
            None => panic!("lattice index {idx:?} out of bounds for shape {shape:?}"),
        }
    }
}
