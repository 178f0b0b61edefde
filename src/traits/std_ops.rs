use std::ops::{Add, AddAssign, Mul, MulAssign};

use crate::dual::Dual;
use crate::numeric::Numeric;
use crate::var::Var;

// ──────────────────────────────────────────────
//  Dual<T> operators
// ──────────────────────────────────────────────

impl<T: Numeric> Add for Dual<T> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Dual {
            value: self.value + rhs.value,
            tangent: self.tangent + rhs.tangent,
        }
    }
}

impl<T: Numeric> Mul for Dual<T> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Dual {
            value: self.value * rhs.value,
            tangent: self.tangent * rhs.value + rhs.tangent * self.value,
        }
    }
}

impl<T: Numeric> AddAssign for Dual<T> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<T: Numeric> MulAssign for Dual<T> {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

// A constant contributes zero tangent.
impl<T: Numeric> Add<T> for Dual<T> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: T) -> Self {
        Dual {
            value: self.value + rhs,
            tangent: self.tangent,
        }
    }
}

impl<T: Numeric> Mul<T> for Dual<T> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: T) -> Self {
        Dual {
            value: self.value * rhs,
            tangent: self.tangent * rhs,
        }
    }
}

// ──────────────────────────────────────────────
//  Var<'t, T> operators
// ──────────────────────────────────────────────

impl<'t, T: Numeric> Add for Var<'t, T> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        let tape = self.same_tape(&rhs);
        Var::new(tape, tape.add(self.id, rhs.id))
    }
}

impl<'t, T: Numeric> Mul for Var<'t, T> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        let tape = self.same_tape(&rhs);
        Var::new(tape, tape.mul(self.id, rhs.id))
    }
}

impl<'t, T: Numeric> AddAssign for Var<'t, T> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<'t, T: Numeric> MulAssign for Var<'t, T> {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

// Constants are promoted to leaf nodes on the handle's tape.
impl<'t, T: Numeric> Add<T> for Var<'t, T> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: T) -> Self {
        self + self.constant(rhs)
    }
}

impl<'t, T: Numeric> Mul<T> for Var<'t, T> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: T) -> Self {
        self * self.constant(rhs)
    }
}

// Constant on the left: generated per primitive, since a blanket
// `impl<T> Add<Dual<T>> for T` is not allowed.
macro_rules! impl_constant_lhs_ops {
    ($($t:ty),* $(,)?) => {
        $(
            impl Add<Dual<$t>> for $t {
                type Output = Dual<$t>;
                #[inline]
                fn add(self, rhs: Dual<$t>) -> Dual<$t> {
                    Dual {
                        value: self + rhs.value,
                        tangent: rhs.tangent,
                    }
                }
            }

            impl Mul<Dual<$t>> for $t {
                type Output = Dual<$t>;
                #[inline]
                fn mul(self, rhs: Dual<$t>) -> Dual<$t> {
                    Dual {
                        value: self * rhs.value,
                        tangent: self * rhs.tangent,
                    }
                }
            }

            impl<'t> Add<Var<'t, $t>> for $t {
                type Output = Var<'t, $t>;
                #[inline]
                fn add(self, rhs: Var<'t, $t>) -> Var<'t, $t> {
                    rhs.constant(self) + rhs
                }
            }

            impl<'t> Mul<Var<'t, $t>> for $t {
                type Output = Var<'t, $t>;
                #[inline]
                fn mul(self, rhs: Var<'t, $t>) -> Var<'t, $t> {
                    rhs.constant(self) * rhs
                }
            }
        )*
    };
}

impl_constant_lhs_ops!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);
