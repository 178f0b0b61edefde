use std::fmt::{self, Display};

use crate::error::Result;
use crate::node::NodeId;
use crate::sweep::Traversal;
use crate::tape::Tape;
use crate::Numeric;

/// Reverse-mode handle: a node id plus the tape that owns it.
///
/// `Copy`, so the same node can feed any number of parents. Operators on
/// handles record new nodes on the shared tape.
#[derive(Clone, Copy, Debug)]
pub struct Var<'t, T: Numeric> {
    pub(crate) tape: &'t Tape<T>,
    pub(crate) id: NodeId,
}

impl<'t, T: Numeric> Var<'t, T> {
    #[inline]
    pub(crate) fn new(tape: &'t Tape<T>, id: NodeId) -> Self {
        Var { tape, id }
    }

    /// Tape id of this node.
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The tape this handle records on.
    #[inline]
    pub fn tape(&self) -> &'t Tape<T> {
        self.tape
    }

    /// Forward value.
    #[inline]
    pub fn value(&self) -> T {
        self.tape.value(self.id)
    }

    /// Raw adjoint accumulator.
    #[inline]
    pub fn adjoint(&self) -> T {
        self.tape.adjoint(self.id)
    }

    /// Checked gradient; fails unless the tape has been evaluated.
    #[inline]
    pub fn gradient(&self) -> Result<T> {
        self.tape.gradient(self.id)
    }

    /// Record a constant on the same tape.
    #[inline]
    pub fn constant(&self, value: T) -> Self {
        Var::new(self.tape, self.tape.constant(value))
    }

    /// Rectified linear unit, `max(self, 0)`.
    #[inline]
    pub fn relu(self) -> Self {
        Var::new(self.tape, self.tape.relu(self.id))
    }

    /// Set this node's adjoint to `seed`.
    #[inline]
    pub fn seed(&self, seed: T) -> Result<()> {
        self.tape.seed(self.id, seed)
    }

    /// Sweep from this node.
    #[inline]
    pub fn evaluate(&self) -> Result<()> {
        self.tape.evaluate(self.id)
    }

    /// Sweep from this node using the given traversal.
    #[inline]
    pub fn evaluate_with(&self, traversal: Traversal) -> Result<()> {
        self.tape.evaluate_with(self.id, traversal)
    }

    /// Seed this node with one and sweep.
    pub fn backward(&self) -> Result<()> {
        self.seed(T::one())?;
        self.evaluate()
    }

    pub(crate) fn same_tape(&self, other: &Self) -> &'t Tape<T> {
        assert!(
            std::ptr::eq(self.tape, other.tape),
            "cannot combine nodes from different tapes"
        );
        self.tape
    }
}

impl<T: Numeric> Display for Var<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}
