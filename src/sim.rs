//! Five-valued simulation of a circuit with a stuck-at fault
//!
//! Values are stored on the circuit nodes. Two simulation modes are available: full
//! simulation recomputes every node in the fanin of the outputs, while event-driven
//! simulation only recomputes nodes whose inputs changed.

mod event_sim;
mod fault;
mod full_sim;
pub mod logic;

use crate::circuit::{Circuit, LogicValue};

pub use event_sim::EventSimulator;
pub use fault::Fault;
pub use full_sim::simulate_full;

/// Returns whether a fault effect (D or D') reached a primary output
pub fn fault_observed(circuit: &Circuit) -> bool {
    circuit
        .outputs()
        .iter()
        .any(|&o| circuit.value(o).is_fault_effect())
}

/// Simulate the circuit with the given input values; return the output values
///
/// The active fault of the circuit, if any, is taken into account.
pub fn simulate(circuit: &mut Circuit, input_values: &[LogicValue]) -> Vec<LogicValue> {
    circuit.set_input_values(input_values);
    simulate_full(circuit);
    circuit.output_values()
}

/// Returns whether the input values expose the fault at a primary output
///
/// The fault previously active on the circuit is restored afterwards.
pub fn detects_fault(circuit: &mut Circuit, input_values: &[LogicValue], fault: Fault) -> bool {
    let previous = circuit.fault();
    circuit.set_fault(fault);
    simulate(circuit, input_values);
    let ret = fault_observed(circuit);
    match previous {
        Some(f) => circuit.set_fault(f),
        None => circuit.clear_faults(),
    }
    ret
}

#[cfg(test)]
mod tests {
    use super::{detects_fault, simulate, Fault};
    use crate::circuit::LogicValue::*;
    use crate::circuit::{CircuitBuilder, GateType};

    #[test]
    fn test_basic() {
        let mut b = CircuitBuilder::new();
        b.add_input("i0");
        b.add_input("i1");
        b.add_input("i2");
        b.add_gate_with_inputs("x1", GateType::Xor, &["i0", "i1"]);
        b.add_gate_with_inputs("x2", GateType::And, &["i0", "i2"]);
        b.add_gate_with_inputs("n1", GateType::Not, &["i1"]);
        b.add_gate_with_inputs("x3", GateType::And, &["x2", "n1"]);
        b.add_output("x1");
        b.add_output("x3");
        let mut c = b.build().unwrap();

        assert_eq!(simulate(&mut c, &[Zero, Zero, Zero]), vec![Zero, Zero]);
        assert_eq!(simulate(&mut c, &[One, Zero, Zero]), vec![One, Zero]);
        assert_eq!(simulate(&mut c, &[One, Zero, One]), vec![One, One]);
        assert_eq!(simulate(&mut c, &[One, One, One]), vec![Zero, Zero]);
        assert_eq!(simulate(&mut c, &[One, X, One]), vec![X, X]);
    }

    #[test]
    fn test_nary() {
        use GateType::*;
        let mut b = CircuitBuilder::new();
        for i in ["i0", "i1", "i2", "i3"] {
            b.add_input(i);
        }
        let ins = ["i0", "i1", "i2", "i3"];
        for (name, gate) in [
            ("x0", And),
            ("x1", Xor),
            ("x2", Or),
            ("x3", Nand),
            ("x4", Nor),
            ("x5", Xnor),
        ] {
            b.add_gate_with_inputs(name, gate, &ins);
            b.add_output(name);
        }
        let mut c = b.build().unwrap();

        let patterns = [
            [Zero, Zero, Zero, Zero],
            [One, Zero, Zero, Zero],
            [Zero, One, Zero, Zero],
            [Zero, Zero, One, Zero],
            [Zero, Zero, Zero, One],
            [One, One, One, One],
        ];
        let expected = [
            [Zero, Zero, Zero, One, One, One],
            [Zero, One, One, One, Zero, Zero],
            [Zero, One, One, One, Zero, Zero],
            [Zero, One, One, One, Zero, Zero],
            [Zero, One, One, One, Zero, Zero],
            [One, Zero, One, Zero, Zero, One],
        ];
        for (p, e) in patterns.iter().zip(expected.iter()) {
            assert_eq!(simulate(&mut c, p), e.to_vec());
        }
    }

    #[test]
    fn test_detection() {
        let mut b = CircuitBuilder::new();
        b.add_input("a");
        b.add_input("b");
        let y = b.add_gate_with_inputs("y", GateType::Or, &["a", "b"]);
        b.add_output("y");
        let mut c = b.build().unwrap();

        let sa0 = Fault { node: y, value: false };
        let sa1 = Fault { node: y, value: true };
        assert!(detects_fault(&mut c, &[One, Zero], sa0));
        assert!(!detects_fault(&mut c, &[One, Zero], sa1));
        assert!(detects_fault(&mut c, &[Zero, Zero], sa1));
        assert!(!detects_fault(&mut c, &[Zero, X], sa1));
        assert_eq!(c.fault(), None);

        c.set_fault(sa1);
        assert!(detects_fault(&mut c, &[Zero, One], sa0));
        assert_eq!(c.fault(), Some(sa1));
    }

    /// A fault that is never activated does not change the outputs
    #[test]
    fn test_inactive_fault() {
        let mut b = CircuitBuilder::new();
        b.add_input("a");
        b.add_input("b");
        let x = b.add_gate_with_inputs("x", GateType::Nand, &["a", "b"]);
        b.add_gate_with_inputs("y", GateType::Xor, &["x", "b"]);
        b.add_output("y");
        let mut c = b.build().unwrap();

        // x is 1 for every pattern here, so stuck-at-1 is never activated
        for p in [[Zero, Zero], [Zero, One], [One, Zero], [X, Zero]] {
            c.clear_faults();
            let good = simulate(&mut c, &p);
            c.set_fault(Fault { node: x, value: true });
            assert_eq!(simulate(&mut c, &p), good);
        }
    }
}
