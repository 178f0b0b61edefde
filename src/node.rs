//! Node variants of the reverse-mode graph.
//!
//! Each [`Op`] carries its operands as [`NodeId`]s into the owning
//! [`Tape`](crate::Tape). Operands are always allocated before the node that
//! refers to them, so an id is strictly greater than every id it points at.

use std::fmt;

use crate::Numeric;

/// Stable index of a node inside its tape.
///
/// Ids are tagged with the tape that issued them. Within one tape,
/// ordering follows construction order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId {
    pub(crate) tape: u32,
    pub(crate) index: u32,
}

impl NodeId {
    /// Position of the node in the tape.
    #[inline]
    pub fn index(self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.index)
    }
}

/// Operation recorded by a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    /// Terminal node: an input or a promoted constant.
    Leaf,
    /// `lhs + rhs`.
    Add(NodeId, NodeId),
    /// `lhs * rhs`.
    Mul(NodeId, NodeId),
    /// `max(arg, 0)`. `active` is `arg > 0`, frozen when the node was built.
    Relu { arg: NodeId, active: bool },
}

impl Op {
    /// Operand ids, in `(lhs, rhs)` order. Leaves have none.
    #[inline]
    pub fn operands(&self) -> impl Iterator<Item = NodeId> {
        let (a, b) = match *self {
            Op::Leaf => (None, None),
            Op::Add(l, r) | Op::Mul(l, r) => (Some(l), Some(r)),
            Op::Relu { arg, .. } => (Some(arg), None),
        };
        a.into_iter().chain(b)
    }
}

/// A single entry in the tape.
#[derive(Clone, Copy, Debug)]
pub struct Node<T: Numeric> {
    /// Forward value, fixed at construction.
    pub value: T,
    /// Accumulated `∂root/∂self`. Set by seeding, then only grown by addition
    /// during a sweep.
    pub adjoint: T,
    /// Operation and operand references.
    pub op: Op,
}

impl<T: Numeric> Node<T> {
    #[inline]
    pub(crate) fn new(value: T, op: Op) -> Self {
        Node {
            value,
            adjoint: T::zero(),
            op,
        }
    }

    /// Local backward rule: the contribution this node's adjoint makes to
    /// each operand, given the nodes that precede it.
    ///
    /// `Mul` weights each side by the *other* operand's forward value.
    /// A dead `Relu` and a `Leaf` contribute nothing.
    #[inline]
    pub(crate) fn pullback(&self, nodes: &[Node<T>]) -> [Option<(NodeId, T)>; 2] {
        let a = self.adjoint;
        match self.op {
            Op::Leaf => [None, None],
            Op::Add(l, r) => [Some((l, a)), Some((r, a))],
            Op::Mul(l, r) => {
                let lv = nodes[l.index()].value;
                let rv = nodes[r.index()].value;
                [Some((l, a * rv)), Some((r, a * lv))]
            }
            Op::Relu { arg, active: true } => [Some((arg, a)), None],
            Op::Relu { active: false, .. } => [None, None],
        }
    }
}
