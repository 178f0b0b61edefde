//! Arena tape for reverse-mode AD.
//!
//! Nodes are appended in construction order and addressed by [`NodeId`].
//! An operation can only reference ids that already exist, so the recorded
//! graph is acyclic and the tape order is a valid topological order. The
//! reverse sweep lives in [`crate::sweep`].

use std::cell::{Cell, RefCell};
use std::sync::atomic::{AtomicU32, Ordering};

use crate::error::{GraphError, Result};
use crate::node::{Node, NodeId, Op};
use crate::var::Var;
use crate::Numeric;

static NEXT_TAPE: AtomicU32 = AtomicU32::new(0);

/// Lifecycle of the adjoints stored on a tape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TapeState {
    /// All adjoints are zero.
    Recording,
    /// At least one adjoint was seeded; no sweep has run yet.
    Seeded,
    /// A sweep ran; adjoints hold gradients until the next [`Tape::reset`].
    Evaluated,
}

/// Arena of graph nodes.
///
/// Building goes through `&self` so that [`Var`] handles can share the
/// tape and still record new nodes.
#[derive(Debug)]
pub struct Tape<T: Numeric> {
    id: u32,
    pub(crate) nodes: RefCell<Vec<Node<T>>>,
    inputs: RefCell<Vec<NodeId>>,
    pub(crate) seeds: RefCell<Vec<NodeId>>,
    pub(crate) state: Cell<TapeState>,
}

impl<T: Numeric> Default for Tape<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Numeric> Tape<T> {
    /// Create an empty tape.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a tape with pre-allocated room for `est_nodes` nodes.
    ///
    /// # Panics
    ///
    /// If more than `u32::MAX` tapes have been created in this process.
    pub fn with_capacity(est_nodes: usize) -> Self {
        Tape {
            id: NEXT_TAPE
                .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_add(1))
                .expect("more than u32::MAX tapes created"),
            nodes: RefCell::new(Vec::with_capacity(est_nodes)),
            inputs: RefCell::new(Vec::new()),
            seeds: RefCell::new(Vec::new()),
            state: Cell::new(TapeState::Recording),
        }
    }

    /// Number of recorded nodes.
    pub fn len(&self) -> usize {
        self.nodes.borrow().len()
    }

    /// True if no node has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.nodes.borrow().is_empty()
    }

    /// Current adjoint lifecycle state.
    pub fn state(&self) -> TapeState {
        self.state.get()
    }

    /// Ids of independent inputs created with [`Tape::leaf`], in creation order.
    pub fn inputs(&self) -> Vec<NodeId> {
        self.inputs.borrow().clone()
    }

    /// Snapshot of every node, in construction order.
    ///
    /// The copy does not track later construction or sweeps.
    pub fn nodes(&self) -> Vec<Node<T>> {
        self.nodes.borrow().clone()
    }

    // ── Construction ──

    fn push(&self, value: T, op: Op) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        let id = NodeId {
            tape: self.id,
            index: u32::try_from(nodes.len()).expect("tape exceeds u32::MAX nodes"),
        };
        nodes.push(Node::new(value, op));
        id
    }

    /// Register a new independent input.
    pub fn leaf(&self, value: T) -> NodeId {
        let id = self.push(value, Op::Leaf);
        self.inputs.borrow_mut().push(id);
        id
    }

    /// Record a constant. It is a leaf, but not listed in [`Tape::inputs`].
    pub fn constant(&self, value: T) -> NodeId {
        self.push(value, Op::Leaf)
    }

    /// Register a new independent input and return an operator-capable handle.
    pub fn var(&self, value: T) -> Var<'_, T> {
        Var::new(self, self.leaf(value))
    }

    /// Wrap an existing id in a handle.
    ///
    /// # Panics
    ///
    /// If `id` was issued by another tape.
    pub fn handle(&self, id: NodeId) -> Var<'_, T> {
        self.expect_owned(id);
        Var::new(self, id)
    }

    /// Record `a + b`.
    ///
    /// # Panics
    ///
    /// If either id was issued by another tape.
    pub fn add(&self, a: NodeId, b: NodeId) -> NodeId {
        let value = self.value(a) + self.value(b);
        self.push(value, Op::Add(a, b))
    }

    /// Record `a * b`.
    ///
    /// # Panics
    ///
    /// If either id was issued by another tape.
    pub fn mul(&self, a: NodeId, b: NodeId) -> NodeId {
        let value = self.value(a) * self.value(b);
        self.push(value, Op::Mul(a, b))
    }

    /// Record `max(a, 0)`. Which branch is taken is decided now, from the
    /// forward value, and never revisited.
    ///
    /// # Panics
    ///
    /// If `a` was issued by another tape.
    pub fn relu(&self, a: NodeId) -> NodeId {
        let (value, active) = self.value(a).rectify();
        self.push(value, Op::Relu { arg: a, active })
    }

    // ── Inspection ──

    pub(crate) fn check(&self, id: NodeId) -> Result<()> {
        if id.tape == self.id && id.index() < self.nodes.borrow().len() {
            Ok(())
        } else {
            Err(GraphError::ForeignNode { node: id })
        }
    }

    fn expect_owned(&self, id: NodeId) {
        assert!(
            self.check(id).is_ok(),
            "node {id} belongs to a different tape"
        );
    }

    /// Forward value of `id`.
    ///
    /// # Panics
    ///
    /// If `id` was issued by another tape.
    pub fn value(&self, id: NodeId) -> T {
        self.expect_owned(id);
        self.nodes.borrow()[id.index()].value
    }

    /// Operation recorded at `id`.
    ///
    /// # Panics
    ///
    /// If `id` was issued by another tape.
    pub fn op(&self, id: NodeId) -> Op {
        self.expect_owned(id);
        self.nodes.borrow()[id.index()].op
    }

    /// Raw adjoint accumulator of `id`, whatever the tape state.
    ///
    /// # Panics
    ///
    /// If `id` was issued by another tape.
    pub fn adjoint(&self, id: NodeId) -> T {
        self.expect_owned(id);
        self.nodes.borrow()[id.index()].adjoint
    }

    /// Gradient `∂root/∂id` from the last sweep.
    ///
    /// Unlike [`Tape::adjoint`], fails unless a sweep has completed.
    pub fn gradient(&self, id: NodeId) -> Result<T> {
        self.check(id)?;
        match self.state.get() {
            TapeState::Evaluated => Ok(self.nodes.borrow()[id.index()].adjoint),
            state => Err(GraphError::NotEvaluated { state }),
        }
    }

    /// Gradients for every input in [`Tape::inputs`] order.
    pub fn input_gradients(&self) -> Result<Vec<T>> {
        self.inputs
            .borrow()
            .iter()
            .map(|&id| self.gradient(id))
            .collect()
    }

    // ── Adjoint lifecycle ──

    /// Set the adjoint of `id` to `seed`, replacing any previous seed.
    ///
    /// Several nodes may be seeded before one sweep, as long as all of them
    /// belong to the graph of the root that is then evaluated.
    pub fn seed(&self, id: NodeId, seed: T) -> Result<()> {
        self.check(id)?;
        if self.state.get() == TapeState::Evaluated {
            return Err(GraphError::AlreadyEvaluated);
        }
        self.nodes.borrow_mut()[id.index()].adjoint = seed;
        self.seeds.borrow_mut().push(id);
        self.state.set(TapeState::Seeded);
        Ok(())
    }

    /// Zero every adjoint and return to [`TapeState::Recording`].
    ///
    /// Topology and forward values are kept, so the same graph can be swept
    /// again with a different seed.
    pub fn reset(&self) {
        for node in self.nodes.borrow_mut().iter_mut() {
            node.adjoint = T::zero();
        }
        self.seeds.borrow_mut().clear();
        self.state.set(TapeState::Recording);
        log::trace!("tape {} reset ({} nodes)", self.id, self.len());
    }
}
