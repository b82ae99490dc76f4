use crate::circuit::{Circuit, GateType, LogicValue};

use super::logic::eval_node;

/// Simulate the whole circuit from the values of its primary inputs
///
/// All nodes except primary inputs are reset, then the fanin cone of each primary output
/// is evaluated, each node once, after its inputs. Nodes outside of these cones are left unset.
pub fn simulate_full(circuit: &mut Circuit) {
    for i in 0..circuit.nb_nodes() {
        if circuit.node(i).gate() != GateType::Input {
            circuit.set_raw_value(i, LogicValue::Unset);
        }
    }

    // Depth-first traversal, evaluating each node when its inputs are done
    let mut to_visit: Vec<(usize, bool)> = Vec::new();
    for o in 0..circuit.nb_outputs() {
        to_visit.push((circuit.output(o), false));
        while let Some((i, expanded)) = to_visit.pop() {
            if circuit.value(i) != LogicValue::Unset {
                continue;
            }
            if expanded {
                let v = eval_node(circuit, i);
                circuit.assign(i, v);
            } else {
                to_visit.push((i, true));
                for &p in circuit.node(i).inputs().iter().rev() {
                    if circuit.value(p) == LogicValue::Unset {
                        to_visit.push((p, false));
                    }
                }
            }
        }
    }
}
