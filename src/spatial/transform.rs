//! Affine mapping between world space and fractional grid coordinates
//!
//! The basis matrix holds the row axis, the column axis and a unit z column,
//! in that order, with the grid origin as translation. Local coordinates are
//! therefore `[row, col, depth]`, which keeps `world_to_cell` the exact inverse
//! of `cell_to_world`.

use ndarray::{Array1, Array2, arr1};

use crate::io::configuration::DEGENERATE_DETERMINANT_EPSILON;
use crate::spatial::coords::Vec3;

/// Basis matrix and its inverse for one grid
#[derive(Debug, Clone)]
pub struct GridTransform {
    origin: Array1<f64>,
    basis: Array2<f64>,
    inverse: Array2<f64>,
    determinant: f64,
}

impl GridTransform {
    /// Build the transform for the given origin and basis vectors
    ///
    /// Collinear or zero axes are accepted; the resulting inverse holds
    /// non-finite values and `is_degenerate` reports it.
    pub fn new(origin: Vec3, axis_row: Vec3, axis_col: Vec3) -> Self {
        let mut basis = Array2::<f64>::zeros((3, 3));
        basis.column_mut(0).assign(&to_array1(axis_row));
        basis.column_mut(1).assign(&to_array1(axis_col));
        basis.column_mut(2).assign(&arr1(&[0.0, 0.0, 1.0]));

        let (inverse, determinant) = invert_3x3(&basis);

        Self {
            origin: to_array1(origin),
            basis,
            inverse,
            determinant,
        }
    }

    /// Determinant of the basis matrix
    pub const fn determinant(&self) -> f64 {
        self.determinant
    }

    /// Check whether the basis is too close to singular to invert reliably
    pub fn is_degenerate(&self) -> bool {
        self.determinant.is_nan() || self.determinant.abs() <= DEGENERATE_DETERMINANT_EPSILON
    }

    /// The basis matrix (columns: row axis, column axis, unit z)
    pub const fn basis(&self) -> &Array2<f64> {
        &self.basis
    }

    /// Map a world position to fractional `[row, col, depth]` coordinates
    pub fn to_local(&self, world: Vec3) -> [f64; 3] {
        let local = self.inverse.dot(&(to_array1(world) - &self.origin));
        let component = |i: usize| local.get(i).copied().unwrap_or(f64::NAN);
        [component(0), component(1), component(2)]
    }

    /// Map fractional `[row, col, depth]` coordinates back to world space
    pub fn to_world(&self, local: [f64; 3]) -> Vec3 {
        let world = self.basis.dot(&arr1(&local)) + &self.origin;
        let component = |i: usize| world.get(i).copied().unwrap_or(f64::NAN) as f32;
        Vec3::new(component(0), component(1), component(2))
    }
}

fn to_array1(v: Vec3) -> Array1<f64> {
    arr1(&[f64::from(v.x), f64::from(v.y), f64::from(v.z)])
}

// Rows or columns left over when `i` is struck out of a 3x3 matrix
const fn complement(i: usize) -> (usize, usize) {
    match i {
        0 => (1, 2),
        1 => (0, 2),
        _ => (0, 1),
    }
}

/// Invert a 3x3 matrix through its adjugate
///
/// Returns the inverse and the determinant. A zero determinant yields
/// non-finite entries rather than an error.
fn invert_3x3(m: &Array2<f64>) -> (Array2<f64>, f64) {
    let at = |r: usize, c: usize| m.get((r, c)).copied().unwrap_or(0.0);
    let cofactor = |r: usize, c: usize| {
        let (r0, r1) = complement(r);
        let (c0, c1) = complement(c);
        let minor = at(r0, c0) * at(r1, c1) - at(r0, c1) * at(r1, c0);
        if (r + c) % 2 == 0 { minor } else { -minor }
    };

    let determinant: f64 = (0..3).map(|c| at(0, c) * cofactor(0, c)).sum();
    let inverse = Array2::from_shape_fn((3, 3), |(r, c)| cofactor(c, r) / determinant);

    (inverse, determinant)
}
