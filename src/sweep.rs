//! Reverse sweep: propagating adjoints from a root back to its operands.
//!
//! Both traversals guarantee that a node's adjoint has received every
//! contribution from its parents before the node itself propagates, and that
//! each node propagates exactly once. Shared subexpressions are therefore
//! counted once per path, not once per visit.

use crate::error::{GraphError, Result};
use crate::node::{Node, NodeId};
use crate::tape::{Tape, TapeState};
use crate::Numeric;

/// Visitation order for the reverse sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Traversal {
    /// Replay the tape backwards from the root.
    ///
    /// Every node at or below the root is visited; nodes with a zero adjoint
    /// are skipped without work.
    #[default]
    Replay,
    /// Kahn-style traversal of the sub-graph reachable from the root.
    ///
    /// Parent counts are computed first and a node is released only once all
    /// of its parents have propagated.
    Topological,
}

impl<T: Numeric> Tape<T> {
    /// Propagate seeded adjoints back from `root`, replaying the tape.
    ///
    /// ```
    /// let tape = dualtape::Tape::new();
    /// let x = tape.var(3.0);
    /// let y = x * x + x;
    /// y.seed(1.0).unwrap();
    /// y.evaluate().unwrap();
    /// assert_eq!(x.adjoint(), 7.0);
    /// ```
    pub fn evaluate(&self, root: NodeId) -> Result<()> {
        self.evaluate_with(root, Traversal::Replay)
    }

    /// Propagate seeded adjoints back from `root` with the given traversal.
    ///
    /// Every seeded node must be `root` or one of its (transitive) operands.
    /// Fails if nothing was seeded since the last reset, if a seed lies
    /// outside the root's graph, or if the tape was already evaluated. A
    /// failed call leaves every adjoint untouched.
    pub fn evaluate_with(&self, root: NodeId, traversal: Traversal) -> Result<()> {
        self.check(root)?;
        match self.state.get() {
            TapeState::Recording => return Err(GraphError::NotSeeded),
            TapeState::Evaluated => return Err(GraphError::AlreadyEvaluated),
            TapeState::Seeded => {}
        }

        let mut nodes = self.nodes.borrow_mut();
        let reach = reachable(&nodes, root);
        if let Some(&node) = self
            .seeds
            .borrow()
            .iter()
            .find(|s| !reach.get(s.index()).copied().unwrap_or(false))
        {
            return Err(GraphError::UnreachableSeed { node, root });
        }

        let visited = match traversal {
            Traversal::Replay => replay(&mut nodes, root),
            Traversal::Topological => topological(&mut nodes, root, &reach),
        };
        drop(nodes);

        self.state.set(TapeState::Evaluated);
        log::trace!("reverse sweep from {root} ({traversal:?}): {visited} nodes propagated");
        Ok(())
    }
}

#[inline]
fn propagate<T: Numeric>(nodes: &mut [Node<T>], at: usize) {
    let node = nodes[at];
    for (operand, contribution) in node.pullback(&nodes[..at]).into_iter().flatten() {
        let target = &mut nodes[operand.index()];
        target.adjoint = target.adjoint + contribution;
    }
}

/// Mark every node `root` depends on, `root` included. Indices past the
/// root are absent, since an operand always precedes its parent.
fn reachable<T: Numeric>(nodes: &[Node<T>], root: NodeId) -> Vec<bool> {
    let mut seen = vec![false; root.index() + 1];
    let mut stack = vec![root];
    seen[root.index()] = true;
    while let Some(id) = stack.pop() {
        for operand in nodes[id.index()].op.operands() {
            if !seen[operand.index()] {
                seen[operand.index()] = true;
                stack.push(operand);
            }
        }
    }
    seen
}

/// Walk the tape from `root` down to the first node. Returns the number of
/// nodes that propagated.
fn replay<T: Numeric>(nodes: &mut [Node<T>], root: NodeId) -> usize {
    let mut visited = 0;
    for i in (0..=root.index()).rev() {
        if nodes[i].adjoint != T::zero() {
            propagate(nodes, i);
            visited += 1;
        }
    }
    visited
}

/// Kahn-style sweep over the nodes reachable from `root`. Returns the number
/// of nodes that propagated.
fn topological<T: Numeric>(nodes: &mut [Node<T>], root: NodeId, reach: &[bool]) -> usize {
    // Count incoming edges (parents) among the reachable nodes.
    // An operand used twice by the same parent counts twice.
    let mut pending = vec![0u32; reach.len()];
    for i in (0..reach.len()).filter(|&i| reach[i]) {
        for operand in nodes[i].op.operands() {
            pending[operand.index()] += 1;
        }
    }

    let mut visited = 0;
    let mut ready = vec![root];
    while let Some(id) = ready.pop() {
        propagate(nodes, id.index());
        visited += 1;
        for operand in nodes[id.index()].op.operands() {
            let count = &mut pending[operand.index()];
            *count -= 1;
            if *count == 0 {
                ready.push(operand);
            }
        }
    }
    visited
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Op;

    /// `s = (x*x) + (x*x)` with the product shared, built by hand.
    ///
    /// ```text
    ///  x ──▶ sq ══▶ s
    /// ```
    fn shared_square() -> (Tape<f64>, NodeId, NodeId) {
        let tape = Tape::new();
        let x = tape.leaf(3.0);
        let sq = tape.mul(x, x);
        let s = tape.add(sq, sq);
        (tape, x, s)
    }

    #[test]
    fn replay_counts_shared_node_once_per_path() {
        let (tape, x, s) = shared_square();
        tape.seed(s, 1.0).unwrap();
        tape.evaluate_with(s, Traversal::Replay).unwrap();
        assert_eq!(tape.gradient(x).unwrap(), 12.0);
    }

    #[test]
    fn topological_counts_shared_node_once_per_path() {
        let (tape, x, s) = shared_square();
        tape.seed(s, 1.0).unwrap();
        tape.evaluate_with(s, Traversal::Topological).unwrap();
        assert_eq!(tape.gradient(x).unwrap(), 12.0);
    }

    /// `x=2, y=5, unrelated=y*y, root=x+x, above=x*y`.
    fn multi_seed_graph() -> (Tape<f64>, [NodeId; 5]) {
        let tape = Tape::new();
        let x = tape.leaf(2.0);
        let y = tape.leaf(5.0);
        let unrelated = tape.mul(y, y);
        let root = tape.add(x, x);
        let above = tape.mul(x, y);
        (tape, [x, y, unrelated, root, above])
    }

    #[test]
    fn seeds_outside_root_graph_are_rejected_by_both_traversals() {
        for traversal in [Traversal::Replay, Traversal::Topological] {
            for stray in [2, 4] {
                let (tape, ids) = multi_seed_graph();
                let root = ids[3];
                tape.seed(root, 1.0).unwrap();
                tape.seed(ids[stray], 1.0).unwrap();
                assert_eq!(
                    tape.evaluate_with(root, traversal),
                    Err(GraphError::UnreachableSeed {
                        node: ids[stray],
                        root
                    })
                );
                assert_eq!(tape.state(), TapeState::Seeded);
                assert_eq!(tape.adjoint(ids[0]), 0.0);
            }
        }
    }

    #[test]
    fn traversals_agree_on_multiple_seeds() {
        // out = s + x, s = x*y; seeding both `out` and the interior `s`.
        let mut grads = Vec::new();
        for traversal in [Traversal::Replay, Traversal::Topological] {
            let tape = Tape::new();
            let x = tape.leaf(2.0);
            let y = tape.leaf(5.0);
            let s = tape.mul(x, y);
            let out = tape.add(s, x);
            tape.seed(out, 1.0).unwrap();
            tape.seed(s, 2.0).unwrap();
            tape.evaluate_with(out, traversal).unwrap();
            grads.push((tape.gradient(x).unwrap(), tape.gradient(y).unwrap()));
        }
        // ∂/∂x = (1 + 2)·y + 1, ∂/∂y = (1 + 2)·x
        assert_eq!(grads, vec![(16.0, 6.0), (16.0, 6.0)]);
    }

    #[test]
    fn reset_forgets_seeds() {
        let (tape, ids) = multi_seed_graph();
        tape.seed(ids[4], 1.0).unwrap();
        tape.reset();
        tape.seed(ids[3], 1.0).unwrap();
        tape.evaluate(ids[3]).unwrap();
        assert_eq!(tape.gradient(ids[0]).unwrap(), 2.0);
        assert_eq!(tape.gradient(ids[4]).unwrap(), 0.0);
    }

    #[test]
    fn replay_skips_zero_adjoints() {
        let mut nodes = vec![
            Node::new(1.0, Op::Leaf),
            Node::new(1.0, Op::Leaf),
        ];
        let root = NodeId { tape: 0, index: 1 };
        assert_eq!(replay(&mut nodes, root), 0);
    }

    #[test]
    fn dead_relu_still_releases_operand() {
        let tape = Tape::new();
        let x = tape.leaf(-1.0);
        let r = tape.relu(x);
        let root = tape.add(r, x);
        tape.seed(root, 1.0).unwrap();
        tape.evaluate_with(root, Traversal::Topological).unwrap();
        assert_eq!(tape.gradient(x).unwrap(), 1.0);
    }
}
