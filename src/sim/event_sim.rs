use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::circuit::{Circuit, GateType, LogicValue};

use super::logic::eval_node;

/// Structure for simulation that only touches the values that may be modified
///
/// Nodes whose inputs changed are queued, lowest topological level first, so that a
/// node is evaluated after all queued nodes in its fanin. Starting from a state computed
/// by full simulation, it reaches the same values as a new full simulation.
#[derive(Debug, Clone)]
pub struct EventSimulator {
    /// Queue of nodes to update, lowest level first
    update_queue: BinaryHeap<Reverse<(u32, usize)>>,
    /// Whether each node is already in the queue
    is_queued: Vec<bool>,
}

impl EventSimulator {
    /// Build a simulator for a circuit
    pub fn new(circuit: &Circuit) -> EventSimulator {
        EventSimulator {
            update_queue: BinaryHeap::new(),
            is_queued: vec![false; circuit.nb_nodes()],
        }
    }

    /// Queue a node whose inputs may have changed
    pub fn push(&mut self, circuit: &Circuit, i: usize) {
        if !self.is_queued[i] {
            self.is_queued[i] = true;
            self.update_queue.push(Reverse((circuit.level(i), i)));
        }
    }

    /// Queue the users of a node
    fn push_fanouts(&mut self, circuit: &Circuit, i: usize) {
        for &o in circuit.node(i).outputs() {
            self.push(circuit, o);
        }
    }

    /// Set the value of a primary input, and queue its users if it changed
    pub fn assign_input(&mut self, circuit: &mut Circuit, i: usize, value: LogicValue) {
        assert_eq!(circuit.node(i).gate(), GateType::Input);
        let old_val = circuit.value(i);
        circuit.assign(i, value);
        if circuit.value(i) != old_val {
            self.push_fanouts(circuit, i);
        }
    }

    /// Process the queue until no value changes anymore
    pub fn run(&mut self, circuit: &mut Circuit) {
        while let Some(Reverse((_, i))) = self.update_queue.pop() {
            self.is_queued[i] = false;
            if circuit.node(i).gate() == GateType::Input {
                // Assigned by the caller: only its users need an update
                self.push_fanouts(circuit, i);
                continue;
            }
            let old_val = circuit.value(i);
            if circuit.is_observable(i) {
                let v = eval_node(circuit, i);
                circuit.assign(i, v);
            } else {
                // Full simulation never computes these
                circuit.set_raw_value(i, LogicValue::Unset);
            }
            if circuit.value(i) != old_val {
                self.push_fanouts(circuit, i);
            }
        }
    }
}
