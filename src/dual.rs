use std::fmt::{self, Display};

use crate::Numeric;

/// Forward-mode dual number: a value paired with its tangent (derivative).
///
/// `Dual { value, tangent }` represents `value + tangent·ε` where `ε² = 0`.
/// Every operator returns a fresh pair; nothing is recorded.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Dual<T: Numeric> {
    /// Primal value.
    pub value: T,
    /// Tangent (directional derivative) value.
    pub tangent: T,
}

impl<T: Numeric> Display for Dual<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {}ε", self.value, self.tangent)
    }
}

impl<T: Numeric> Dual<T> {
    /// Create a new dual number.
    #[inline]
    pub fn new(value: T, tangent: T) -> Self {
        Dual { value, tangent }
    }

    /// Create a constant (zero tangent).
    #[inline]
    pub fn constant(value: T) -> Self {
        Dual {
            value,
            tangent: T::zero(),
        }
    }

    /// Create a variable (unit tangent) for differentiation.
    #[inline]
    pub fn variable(value: T) -> Self {
        Dual {
            value,
            tangent: T::one(),
        }
    }

    /// Rectified linear unit.
    ///
    /// On the dead branch (`value <= 0`) both value and tangent are zero;
    /// otherwise the pair passes through unchanged.
    #[inline]
    pub fn relu(self) -> Self {
        match self.value.rectify() {
            (value, true) => Dual {
                value,
                tangent: self.tangent,
            },
            (value, false) => Dual {
                value,
                tangent: T::zero(),
            },
        }
    }
}
