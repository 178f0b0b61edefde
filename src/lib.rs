//! Automatic differentiation of scalar expressions built from `+`, `*` and
//! `relu`, in two modes:
//!
//! - **forward**: [`Dual`] numbers carry a tangent alongside each value, so a
//!   single pass yields one directional derivative;
//! - **reverse**: [`Var`] handles record a graph on a [`Tape`], and one sweep
//!   from the output yields the gradient with respect to every input.
//!
//! ```
//! use dualtape::{relu, Dual, Tape};
//!
//! // Forward: ∂y/∂x1 with x1 seeded.
//! let x1 = Dual::variable(2.0);
//! let x2 = Dual::constant(-3.0);
//! assert_eq!((x1 * x2 + x1).tangent, -2.0);
//!
//! // Reverse: every partial in one sweep.
//! let tape = Tape::new();
//! let (a, b) = (tape.var(-2.0), tape.var(-3.0));
//! let y = relu(a + b);
//! y.backward().unwrap();
//! assert_eq!((a.adjoint(), b.adjoint()), (0.0, 0.0));
//! ```

pub mod api;
pub mod dual;
pub mod error;
pub mod node;
pub mod numeric;
pub mod scalar;
pub mod sweep;
pub mod tape;
pub mod var;
mod traits;

pub use api::{finite_diff_grad, forward_grad, grad, jvp, value_and_grad};
pub use dual::Dual;
pub use error::{GraphError, Result};
pub use node::{Node, NodeId, Op};
pub use numeric::Numeric;
pub use scalar::{add, mul, relu, Scalar};
pub use sweep::Traversal;
pub use tape::{Tape, TapeState};
pub use var::Var;

/// Type alias for forward-mode dual numbers over `f64`.
pub type Dual64 = Dual<f64>;
/// Type alias for forward-mode dual numbers over `f32`.
pub type Dual32 = Dual<f32>;
/// Type alias for reverse-mode tapes over `f64`.
pub type Tape64 = Tape<f64>;
/// Type alias for reverse-mode tapes over `f32`.
pub type Tape32 = Tape<f32>;
