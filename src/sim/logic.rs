//! Five-valued evaluation of gates

use crate::circuit::{Circuit, GateType, LogicValue};

/// Panics on a value that cannot be evaluated
fn check_computed(v: LogicValue) -> LogicValue {
    if v == LogicValue::Unset {
        panic!("Gate input used before its value is computed");
    }
    v
}

/// Evaluate an And, Or, Nand or Nor gate
///
/// `c` is the controlling value (false for And/Nand) and `inv` the output inversion
/// (true for Nand/Nor). A D and a D' on the same gate mask each other.
pub fn eval_and_like<I: IntoIterator<Item = LogicValue>>(
    inputs: I,
    c: bool,
    inv: bool,
) -> LogicValue {
    use LogicValue::*;
    let ctrl = LogicValue::from_bool(c);
    let mut any_c = false;
    let mut any_x = false;
    let mut any_d = false;
    let mut any_dbar = false;
    for v in inputs {
        match check_computed(v) {
            X => any_x = true,
            D => any_d = true,
            Dbar => any_dbar = true,
            v => any_c |= v == ctrl,
        }
    }
    let out = if any_c || (any_d && any_dbar) {
        LogicValue::from_bool(c)
    } else if any_x {
        return X;
    } else if any_d {
        D
    } else if any_dbar {
        Dbar
    } else {
        LogicValue::from_bool(!c)
    };
    if inv {
        !out
    } else {
        out
    }
}

/// Evaluate a Xor or Xnor gate, counting ones separately in the good and faulty circuits
pub fn eval_xor_like<I: IntoIterator<Item = LogicValue>>(inputs: I, inv: bool) -> LogicValue {
    let mut any_x = false;
    let mut good = false;
    let mut faulty = false;
    for v in inputs {
        let v = check_computed(v);
        match (v.good(), v.faulty()) {
            (Some(g), Some(f)) => {
                good ^= g;
                faulty ^= f;
            }
            _ => any_x = true,
        }
    }
    if any_x {
        return LogicValue::X;
    }
    LogicValue::from_pair(good ^ inv, faulty ^ inv)
}

/// Evaluate a gate from its input values, without taking any fault into account
pub fn eval_gate<I: IntoIterator<Item = LogicValue>>(gate: GateType, inputs: I) -> LogicValue {
    use GateType::*;
    match gate {
        And | Or | Nand | Nor => match gate.controlling_value() {
            Some((c, inv)) => eval_and_like(inputs, c, inv),
            None => unreachable!(),
        },
        Xor => eval_xor_like(inputs, false),
        Xnor => eval_xor_like(inputs, true),
        Buf | Fanout | Not => {
            let mut it = inputs.into_iter();
            let v = match (it.next(), it.next()) {
                (Some(v), None) => check_computed(v),
                _ => panic!("{} gate requires exactly one input", gate),
            };
            if gate == Not {
                !v
            } else {
                v
            }
        }
        Input => panic!("Primary inputs are assigned, not evaluated"),
    }
}

/// Compute the natural value of a node from the current values of its inputs
pub fn eval_node(circuit: &Circuit, i: usize) -> LogicValue {
    let node = circuit.node(i);
    if node.gate() == GateType::Input {
        panic!("Primary input {} has no value", node.name());
    }
    eval_gate(node.gate(), node.inputs().iter().map(|&p| circuit.value(p)))
}
