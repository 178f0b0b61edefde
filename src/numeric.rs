//! The [`Numeric`] trait: the primitive scalar both engines are generic over.

use std::fmt::{Debug, Display};

use num_traits::Num;

/// Marker trait for primitive arithmetic scalars (integers and floats).
///
/// Bundles the numeric and utility traits needed throughout dualtape.
/// Only primitive types implement this; AD wrapper types do not.
pub trait Numeric: Num + Copy + PartialOrd + Default + Debug + Display + 'static {
    /// Rectify `self`: `(max(self, 0), active)` where `active` is `self > 0`.
    ///
    /// Zero itself is on the dead branch.
    #[inline]
    fn rectify(self) -> (Self, bool) {
        if self <= Self::zero() {
            (Self::zero(), false)
        } else {
            (self, true)
        }
    }
}

macro_rules! impl_numeric {
    ($($t:ty),* $(,)?) => {
        $(impl Numeric for $t {})*
    };
}

impl_numeric!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);
