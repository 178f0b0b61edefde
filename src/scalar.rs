//! The [`Scalar`] trait for writing engine-generic expressions.
//!
//! Functions written as `fn f<S: Scalar>(x: &[S]) -> S` work transparently
//! with plain numbers, [`Dual`] and [`Var`], so one expression can be
//! evaluated, pushed forward, or recorded for a reverse sweep.

use std::ops::{Add, Mul};

use crate::dual::Dual;
use crate::var::Var;
use crate::Numeric;

/// The expression language shared by both engines: `+`, `*` and `relu`.
///
/// Constants enter generic code through [`Scalar::lift`].
pub trait Scalar: Copy + Add<Output = Self> + Mul<Output = Self> {
    /// The underlying primitive type.
    type Value: Numeric;

    /// Extract the primal value.
    fn value(&self) -> Self::Value;

    /// Lift a constant into the same engine as `self` (zero derivative).
    fn lift(&self, c: Self::Value) -> Self;

    /// Rectified linear unit, `max(self, 0)`.
    fn relu(self) -> Self;
}

macro_rules! impl_scalar_primitive {
    ($($t:ty),* $(,)?) => {
        $(
            impl Scalar for $t {
                type Value = $t;

                #[inline]
                fn value(&self) -> $t {
                    *self
                }

                #[inline]
                fn lift(&self, c: $t) -> $t {
                    c
                }

                #[inline]
                fn relu(self) -> $t {
                    self.rectify().0
                }
            }
        )*
    };
}

impl_scalar_primitive!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl<T: Numeric> Scalar for Dual<T> {
    type Value = T;

    #[inline]
    fn value(&self) -> T {
        self.value
    }

    #[inline]
    fn lift(&self, c: T) -> Self {
        Dual::constant(c)
    }

    #[inline]
    fn relu(self) -> Self {
        Dual::relu(self)
    }
}

impl<'t, T: Numeric> Scalar for Var<'t, T> {
    type Value = T;

    #[inline]
    fn value(&self) -> T {
        Var::value(self)
    }

    #[inline]
    fn lift(&self, c: T) -> Self {
        self.constant(c)
    }

    #[inline]
    fn relu(self) -> Self {
        Var::relu(self)
    }
}

/// `a + b` in either engine.
#[inline]
pub fn add<S: Scalar>(a: S, b: S) -> S {
    a + b
}

/// `a * b` in either engine.
#[inline]
pub fn mul<S: Scalar>(a: S, b: S) -> S {
    a * b
}

/// `max(x, 0)` in either engine.
#[inline]
pub fn relu<S: Scalar>(x: S) -> S {
    x.relu()
}
