//! Fixed-size linear algebra.
//!
//! [`Vector`] and [`Matrix`] are generic over the element type and their
//! dimensions, so the same code serves integer screen coordinates and
//! floating-point model positions. Everything is a `Copy` value type and
//! every operation returns a new value.

pub mod matrix;
pub mod vector;

pub use matrix::Matrix;
pub use vector::Vector;

use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Sub};

/// Numeric element type usable inside a [`Vector`] or [`Matrix`].
pub trait Scalar:
    Copy
    + Debug
    + Default
    + PartialEq
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
{
    const ZERO: Self;
    const ONE: Self;

    /// Widens the value to `f64` for length and angle computations.
    fn to_f64(self) -> f64;
}

/// Floating-point element type, required by matrix inversion.
pub trait Float: Scalar + Div<Output = Self> {
    /// Machine epsilon of the type.
    const EPSILON: Self;

    fn abs(self) -> Self;
    fn from_f64(value: f64) -> Self;
}

macro_rules! impl_scalar {
    ($($t:ty => $zero:expr, $one:expr);* $(;)?) => {
        $(
            impl Scalar for $t {
                const ZERO: Self = $zero;
                const ONE: Self = $one;

                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_scalar! {
    i32 => 0, 1;
    i64 => 0, 1;
    isize => 0, 1;
    u32 => 0, 1;
    u64 => 0, 1;
    usize => 0, 1;
    f32 => 0.0, 1.0;
    f64 => 0.0, 1.0;
}

impl Float for f32 {
    const EPSILON: Self = f32::EPSILON;

    #[inline]
    fn abs(self) -> Self {
        f32::abs(self)
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        value as f32
    }
}

impl Float for f64 {
    const EPSILON: Self = f64::EPSILON;

    #[inline]
    fn abs(self) -> Self {
        f64::abs(self)
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        value
    }
}

pub type Vec2<T> = Vector<T, 2>;
pub type Vec3<T> = Vector<T, 3>;
pub type Vec4<T> = Vector<T, 4>;

/// Model-space vertex position.
pub type Vec3f = Vector<f32, 3>;

pub type Mat4 = Matrix<f64, 4, 4>;
