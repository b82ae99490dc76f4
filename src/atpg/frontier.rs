use crate::circuit::{Circuit, LogicValue};

/// Nodes with an unknown value and a fault effect on one of their inputs
///
/// These are the gates through which the fault effect may still be propagated. The set is
/// recomputed from scratch after each simulation, since backtracking invalidates it.
#[derive(Debug, Clone, Default)]
pub struct DFrontier {
    nodes: Vec<usize>,
}

impl DFrontier {
    /// Create an empty frontier
    pub fn new() -> DFrontier {
        DFrontier::default()
    }

    /// Recompute the frontier from the current values of the circuit, in node order
    pub fn update(&mut self, circuit: &Circuit) {
        self.nodes.clear();
        for n in circuit.nodes() {
            if n.value() != LogicValue::X {
                continue;
            }
            if n
                .inputs()
                .iter()
                .any(|&p| circuit.value(p).is_fault_effect())
            {
                self.nodes.push(n.id());
            }
        }
    }

    /// First node of the frontier, in node order
    pub fn first(&self) -> Option<usize> {
        self.nodes.first().copied()
    }

    /// Returns whether the fault effect is blocked everywhere
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes in the frontier
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Iterate over the nodes of the frontier
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes.iter().copied()
    }
}
