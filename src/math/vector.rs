use std::ops::{Add, Index, IndexMut, Mul, Neg, Sub};

use approx::{AbsDiffEq, RelativeEq};

use super::Scalar;

/// An `N`-component vector of `T`.
///
/// The dimension is part of the type, so mixing vectors of different sizes
/// is a compile error rather than a runtime check.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vector<T, const N: usize> {
    data: [T; N],
}

impl<T: Scalar, const N: usize> Vector<T, N> {
    pub const fn new(data: [T; N]) -> Self {
        Self { data }
    }

    pub fn zero() -> Self {
        Self::new([T::ZERO; N])
    }

    /// Builds a vector by evaluating `f` for every component index.
    pub fn from_fn(f: impl FnMut(usize) -> T) -> Self {
        Self::new(std::array::from_fn(f))
    }

    pub fn to_array(self) -> [T; N] {
        self.data
    }

    pub fn dot(&self, other: &Self) -> T {
        self.data
            .iter()
            .zip(other.data.iter())
            .fold(T::ZERO, |acc, (&a, &b)| acc + a * b)
    }

    /// Euclidean length, computed in `f64` for every element type.
    pub fn length(&self) -> f64 {
        self.data
            .iter()
            .map(|c| {
                let c = c.to_f64();
                c * c
            })
            .sum::<f64>()
            .sqrt()
    }

    /// Angle between two vectors in radians.
    ///
    /// The cosine is clamped to [-1, 1] so nearly parallel vectors do not
    /// produce NaN. Callers must not pass a zero-length vector.
    pub fn angle(&self, other: &Self) -> f64 {
        let cos = self.dot(other).to_f64() / (self.length() * other.length());
        cos.clamp(-1.0, 1.0).acos()
    }

    /// Applies `f` to every component, possibly changing the element type.
    pub fn map<U: Scalar>(self, mut f: impl FnMut(T) -> U) -> Vector<U, N> {
        Vector::from_fn(|i| f(self.data[i]))
    }
}

impl<T: Scalar> Vector<T, 2> {
    pub fn x(&self) -> T {
        self.data[0]
    }

    pub fn y(&self) -> T {
        self.data[1]
    }
}

impl<T: Scalar> Vector<T, 3> {
    pub fn x(&self) -> T {
        self.data[0]
    }

    pub fn y(&self) -> T {
        self.data[1]
    }

    pub fn z(&self) -> T {
        self.data[2]
    }

    /// Returns the cross product of two vectors.
    /// The resulting vector is perpendicular to both input vectors.
    pub fn cross(&self, other: &Self) -> Self {
        let [ax, ay, az] = self.data;
        let [bx, by, bz] = other.data;
        Self::new([ay * bz - az * by, az * bx - ax * bz, ax * by - ay * bx])
    }

    /// Drops the third component.
    pub fn xy(&self) -> Vector<T, 2> {
        Vector::new([self.data[0], self.data[1]])
    }

    /// Appends a fourth component, e.g. `1` to make a homogeneous point.
    pub fn extend(&self, w: T) -> Vector<T, 4> {
        let [x, y, z] = self.data;
        Vector::new([x, y, z, w])
    }
}

impl<T: Scalar> Vector<T, 4> {
    pub fn x(&self) -> T {
        self.data[0]
    }

    pub fn y(&self) -> T {
        self.data[1]
    }

    pub fn z(&self) -> T {
        self.data[2]
    }

    pub fn w(&self) -> T {
        self.data[3]
    }

    /// Drops the fourth component.
    pub fn truncate(&self) -> Vector<T, 3> {
        let [x, y, z, _] = self.data;
        Vector::new([x, y, z])
    }
}

impl<T: Scalar, const N: usize> Default for Vector<T, N> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<T: Scalar, const N: usize> From<[T; N]> for Vector<T, N> {
    fn from(data: [T; N]) -> Self {
        Self::new(data)
    }
}

impl<T, const N: usize> Index<usize> for Vector<T, N> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        &self.data[index]
    }
}

impl<T, const N: usize> IndexMut<usize> for Vector<T, N> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.data[index]
    }
}

/// Component-wise addition of two vectors.
impl<T: Scalar, const N: usize> Add for Vector<T, N> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::from_fn(|i| self.data[i] + rhs.data[i])
    }
}

/// Component-wise subtraction of two vectors.
impl<T: Scalar, const N: usize> Sub for Vector<T, N> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::from_fn(|i| self.data[i] - rhs.data[i])
    }
}

/// Scalar multiplication of a vector.
impl<T: Scalar, const N: usize> Mul<T> for Vector<T, N> {
    type Output = Self;

    fn mul(self, rhs: T) -> Self {
        Self::from_fn(|i| self.data[i] * rhs)
    }
}

impl<T: Scalar + Neg<Output = T>, const N: usize> Neg for Vector<T, N> {
    type Output = Self;

    fn neg(self) -> Self {
        Self::from_fn(|i| -self.data[i])
    }
}

impl<T: AbsDiffEq, const N: usize> AbsDiffEq for Vector<T, N>
where
    T::Epsilon: Copy,
{
    type Epsilon = T::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        T::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.data
            .iter()
            .zip(other.data.iter())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl<T: RelativeEq, const N: usize> RelativeEq for Vector<T, N>
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
        self.data
            .iter()
            .zip(other.data.iter())
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}
