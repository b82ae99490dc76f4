//! Circuit generators and templates

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::circuit::{Circuit, CircuitBuilder, GateType};

/// The ISCAS-85 c17 benchmark: 5 inputs, 2 outputs and 6 Nand gates
pub fn c17() -> Circuit {
    let mut b = CircuitBuilder::new();
    for i in ["1", "2", "3", "6", "7"] {
        b.add_input(i);
    }
    b.add_gate_with_inputs("10", GateType::Nand, &["1", "3"]);
    b.add_gate_with_inputs("11", GateType::Nand, &["3", "6"]);
    b.add_gate_with_inputs("16", GateType::Nand, &["2", "11"]);
    b.add_gate_with_inputs("19", GateType::Nand, &["11", "7"]);
    b.add_gate_with_inputs("22", GateType::Nand, &["10", "16"]);
    b.add_gate_with_inputs("23", GateType::Nand, &["16", "19"]);
    b.add_output("22");
    b.add_output("23");
    match b.build() {
        Ok(c) => c,
        Err(e) => panic!("{}", e),
    }
}

/// A ripple-carry adder with inputs a0, b0, a1, b1, ... and a carry-in
///
/// Outputs are the sum bits followed by the carry-out.
pub fn ripple_carry_adder(len: usize) -> Circuit {
    let mut b = CircuitBuilder::new();
    b.add_input("cin");
    let mut carry = "cin".to_string();
    for i in 0..len {
        let a = format!("a{i}");
        let x = format!("b{i}");
        b.add_input(&a);
        b.add_input(&x);
        let p = format!("p{i}");
        let gn = format!("gn{i}");
        let t = format!("t{i}");
        let s = format!("s{i}");
        b.add_gate_with_inputs(&p, GateType::Xor, &[a.as_str(), x.as_str()]);
        b.add_gate_with_inputs(&gn, GateType::Nand, &[a.as_str(), x.as_str()]);
        b.add_gate_with_inputs(&s, GateType::Xor, &[p.as_str(), carry.as_str()]);
        b.add_gate_with_inputs(&t, GateType::Nand, &[p.as_str(), carry.as_str()]);
        let carry_out = format!("co{i}");
        b.add_gate_with_inputs(&carry_out, GateType::Nand, &[gn.as_str(), t.as_str()]);
        b.add_output(&s);
        carry = carry_out;
    }
    b.add_output(&carry);
    match b.build() {
        Ok(c) => c,
        Err(e) => panic!("{}", e),
    }
}

/// A random circuit where each gate takes its inputs among the previous signals
///
/// The last gate is always a primary output; others are outputs with probability 0.3.
/// Some gates may be left unobservable.
pub fn random(nb_inputs: usize, nb_gates: usize, seed: u64) -> Circuit {
    use GateType::*;
    let types = [And, Or, Nand, Nor, Xor, Xnor, Buf, Not];
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut b = CircuitBuilder::new();
    let mut names = Vec::new();
    for i in 0..nb_inputs {
        let n = format!("i{}", i);
        b.add_input(&n);
        names.push(n);
    }
    for i in 0..nb_gates {
        let gate = types[rng.gen_range(0..types.len())];
        let arity = if gate.is_buf_like() {
            1
        } else {
            rng.gen_range(2..4)
        };
        let n = format!("x{}", i);
        let g = b.add_gate(&n, gate);
        for _ in 0..arity {
            b.add_input_name(g, &names[rng.gen_range(0..names.len())]);
        }
        names.push(n);
    }
    for i in 0..nb_gates {
        if rng.gen_bool(0.3) || i + 1 == nb_gates {
            b.add_output(&format!("x{}", i));
        }
    }
    match b.build() {
        Ok(c) => c,
        Err(e) => panic!("{}", e),
    }
}
