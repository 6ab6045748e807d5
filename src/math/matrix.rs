//! Row-major `M x N` matrices.
//!
//! # Convention
//! - Vectors are **column vectors** on the right: `Matrix * Vector`
//! - Translation is stored in the **last column**
//! - Transforms chain **right-to-left**: `A * B * v` applies B first, then A

use std::cmp::Ordering;
use std::ops::{Add, Index, IndexMut, Mul, Sub};

use approx::{AbsDiffEq, RelativeEq};

use super::{Float, Scalar, Vector};

/// `M` rows of `N`-component vectors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix<T, const M: usize, const N: usize> {
    rows: [Vector<T, N>; M],
}

impl<T: Scalar, const M: usize, const N: usize> Matrix<T, M, N> {
    pub const fn new(rows: [Vector<T, N>; M]) -> Self {
        Self { rows }
    }

    /// Builds a matrix from nested arrays, `data[row][col]`.
    pub fn from_rows(data: [[T; N]; M]) -> Self {
        Self::new(data.map(Vector::new))
    }

    pub fn zero() -> Self {
        Self::new([Vector::zero(); M])
    }

    pub fn row(&self, index: usize) -> Vector<T, N> {
        self.rows[index]
    }

    pub fn column(&self, index: usize) -> Vector<T, M> {
        Vector::from_fn(|row| self.rows[row][index])
    }

    pub fn transpose(&self) -> Matrix<T, N, M> {
        Matrix::new(std::array::from_fn(|col| self.column(col)))
    }
}

impl<T: Scalar, const N: usize> Matrix<T, N, N> {
    pub fn identity() -> Self {
        Self::new(std::array::from_fn(|row| {
            Vector::from_fn(|col| if row == col { T::ONE } else { T::ZERO })
        }))
    }
}

impl<T: Float, const N: usize> Matrix<T, N, N> {
    /// Computes the inverse by Gauss-Jordan elimination with partial pivoting.
    ///
    /// Each column picks the remaining row with the largest absolute
    /// coefficient as its pivot. Returns `None` when that pivot is at or
    /// below `10 * epsilon`, i.e. the matrix is singular for practical
    /// purposes.
    pub fn inverse(&self) -> Option<Self> {
        let threshold = T::EPSILON * T::from_f64(10.0);
        let mut a = *self;
        let mut inv = Self::identity();

        for col in 0..N {
            let pivot = (col..N).max_by(|&i, &j| {
                a.rows[i][col]
                    .abs()
                    .partial_cmp(&a.rows[j][col].abs())
                    .unwrap_or(Ordering::Equal)
            })?;

            // Written as a negated comparison so NaN pivots are rejected too.
            if !(a.rows[pivot][col].abs() > threshold) {
                return None;
            }

            a.rows.swap(col, pivot);
            inv.rows.swap(col, pivot);

            let p = a.rows[col][col];
            a.rows[col] = a.rows[col].map(|v| v / p);
            inv.rows[col] = inv.rows[col].map(|v| v / p);

            for row in 0..N {
                if row == col {
                    continue;
                }
                let factor = a.rows[row][col];
                if factor == T::ZERO {
                    continue;
                }
                a.rows[row] = a.rows[row] - a.rows[col] * factor;
                inv.rows[row] = inv.rows[row] - inv.rows[col] * factor;
            }
        }

        Some(inv)
    }

    pub fn is_invertible(&self) -> bool {
        self.inverse().is_some()
    }
}

impl Matrix<f64, 4, 4> {
    /// Creates a translation matrix.
    pub fn translation(x: f64, y: f64, z: f64) -> Self {
        Self::from_rows([
            [1.0, 0.0, 0.0, x],
            [0.0, 1.0, 0.0, y],
            [0.0, 0.0, 1.0, z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a rotation matrix around the X axis.
    pub fn rotation_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, -s, 0.0],
            [0.0, s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a rotation matrix around the Y axis.
    pub fn rotation_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows([
            [c, 0.0, s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }
}

impl<T, const M: usize, const N: usize> Index<usize> for Matrix<T, M, N> {
    type Output = Vector<T, N>;

    #[inline]
    fn index(&self, index: usize) -> &Vector<T, N> {
        &self.rows[index]
    }
}

impl<T, const M: usize, const N: usize> IndexMut<usize> for Matrix<T, M, N> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Vector<T, N> {
        &mut self.rows[index]
    }
}

impl<T: Scalar, const M: usize, const N: usize> Add for Matrix<T, M, N> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(std::array::from_fn(|i| self.rows[i] + rhs.rows[i]))
    }
}

impl<T: Scalar, const M: usize, const N: usize> Sub for Matrix<T, M, N> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(std::array::from_fn(|i| self.rows[i] - rhs.rows[i]))
    }
}

/// Transform a column vector: each output component is a row dot `v`.
impl<T: Scalar, const M: usize, const N: usize> Mul<Vector<T, N>> for Matrix<T, M, N> {
    type Output = Vector<T, M>;

    fn mul(self, v: Vector<T, N>) -> Vector<T, M> {
        Vector::from_fn(|i| self.rows[i].dot(&v))
    }
}

/// Matrix product: `(M x N) * (N x P) = (M x P)`.
impl<T: Scalar, const M: usize, const N: usize, const P: usize> Mul<Matrix<T, N, P>>
    for Matrix<T, M, N>
{
    type Output = Matrix<T, M, P>;

    fn mul(self, rhs: Matrix<T, N, P>) -> Matrix<T, M, P> {
        let columns = rhs.transpose();
        Matrix::new(std::array::from_fn(|i| {
            Vector::from_fn(|j| self.rows[i].dot(&columns.rows[j]))
        }))
    }
}

impl<T: AbsDiffEq, const M: usize, const N: usize> AbsDiffEq for Matrix<T, M, N>
where
    T::Epsilon: Copy,
{
    type Epsilon = T::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        T::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.rows
            .iter()
            .zip(other.rows.iter())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl<T: RelativeEq, const M: usize, const N: usize> RelativeEq for Matrix<T, M, N>
where
    T::Epsilon: Copy,
{
    fn default_max_relative() -> Self::Epsilon {
        T::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.rows
            .iter()
            .zip(other.rows.iter())
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}
