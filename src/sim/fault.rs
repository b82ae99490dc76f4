use std::fmt;

use crate::circuit::{Circuit, LogicValue};

/// Output stuck-at fault: the output of the given node is stuck at a fixed value
///
/// Since fanouts are split into branches, input faults of a gate are output faults of
/// the fanout branch driving it.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Fault {
    /// Node where the fault is located
    pub node: usize,
    /// Fault value
    pub value: bool,
}

impl Fault {
    /// Create a stuck-at fault on a node given by name
    pub fn from_name(circuit: &Circuit, name: &str, value: bool) -> Result<Fault, String> {
        match circuit.node_by_name(name) {
            Some(node) => Ok(Fault { node, value }),
            None => Err(format!("Fault location {name} is not a signal of the circuit")),
        }
    }

    /// Get all possible faults in a circuit: stuck-at-0 and stuck-at-1 on every node
    pub fn all(circuit: &Circuit) -> Vec<Fault> {
        let mut ret = Vec::new();
        for node in 0..circuit.nb_nodes() {
            for value in [false, true] {
                ret.push(Fault { node, value });
            }
        }
        ret
    }

    /// Value the fault site must take in the good circuit to activate the fault
    pub fn activation_value(&self) -> LogicValue {
        LogicValue::from_bool(!self.value)
    }

    /// Description using the name of the faulty signal
    pub fn describe(&self, circuit: &Circuit) -> String {
        format!(
            "{} / {}",
            circuit.node(self.node).name(),
            i32::from(self.value)
        )
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Gate {} output stuck at {}",
            self.node,
            i32::from(self.value)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Fault;
    use crate::circuit::{CircuitBuilder, GateType, LogicValue};

    #[test]
    fn test_faults() {
        let mut b = CircuitBuilder::new();
        b.add_input("a");
        b.add_gate_with_inputs("x", GateType::Not, &["a"]);
        b.add_gate_with_inputs("y", GateType::Buf, &["a"]);
        b.add_output("x");
        b.add_output("y");
        let c = b.build().unwrap();

        // a, x, y and two branches
        let all = Fault::all(&c);
        assert_eq!(all.len(), 10);
        assert_eq!(all[0], Fault { node: 0, value: false });
        assert_eq!(all[1], Fault { node: 0, value: true });

        let f = Fault::from_name(&c, "a_1", true).unwrap();
        assert_eq!(f.describe(&c), "a_1 / 1");
        assert_eq!(f.activation_value(), LogicValue::Zero);
        assert_eq!(format!("{}", f), format!("Gate {} output stuck at 1", f.node));
        assert!(Fault::from_name(&c, "b", false).is_err());
    }
}
