use std::iter::{Product, Sum};

use num_traits::{One, Zero};

use crate::dual::Dual;
use crate::numeric::Numeric;

// ══════════════════════════════════════════════
//  Dual<T>
// ══════════════════════════════════════════════

impl<T: Numeric> Zero for Dual<T> {
    #[inline]
    fn zero() -> Self {
        Dual::constant(T::zero())
    }
    #[inline]
    fn is_zero(&self) -> bool {
        self.value.is_zero() && self.tangent.is_zero()
    }
}

impl<T: Numeric> One for Dual<T> {
    #[inline]
    fn one() -> Self {
        Dual::constant(T::one())
    }
}

impl<T: Numeric> Sum for Dual<T> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Dual::zero(), |acc, x| acc + x)
    }
}

impl<T: Numeric> Product for Dual<T> {
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Dual::one(), |acc, x| acc * x)
    }
}
