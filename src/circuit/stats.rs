//! Compute circuit statistics
//!
//! ```
//! # use podem::circuit::CircuitBuilder;
//! # let circuit = CircuitBuilder::new().build().unwrap();
//! use podem::circuit::stats::stats;
//! let stats = stats(&circuit);
//!
//! // Check that there is no Xor gate
//! assert_eq!(stats.nb_xor, 0);
//!
//! // Show the statistics
//! println!("{}", stats);
//! ```

use std::fmt;

use crate::circuit::{Circuit, GateType};

/// Number of inputs, outputs and gates in a circuit
#[derive(Clone, Debug)]
pub struct CircuitStats {
    /// Number of inputs
    pub nb_inputs: usize,
    /// Number of outputs
    pub nb_outputs: usize,
    /// Number of And and Nand gates
    pub nb_and: usize,
    /// Number of Or and Nor gates
    pub nb_or: usize,
    /// Arity of And, Nand, Or and Nor gates
    pub and_arity: Vec<usize>,
    /// Number of Xor and Xnor gates
    pub nb_xor: usize,
    /// Arity of Xor and Xnor gates
    pub xor_arity: Vec<usize>,
    /// Number of inverting gates (Nand, Nor, Xnor, Not)
    pub nb_inverting: usize,
    /// Number of Buf
    pub nb_buf: usize,
    /// Number of Not
    pub nb_not: usize,
    /// Number of fanout branches
    pub nb_fanout: usize,
    /// Maximum topological level
    pub depth: u32,
    /// Number of nodes outside the fanin of the outputs
    pub nb_unobservable: usize,
}

impl CircuitStats {
    /// Total number of logic gates, excluding inputs and fanout branches
    pub fn nb_gates(&self) -> usize {
        self.nb_and + self.nb_or + self.nb_xor + self.nb_buf + self.nb_not
    }

    /// Number of stuck-at faults: two per node, including inputs and fanout branches
    pub fn nb_faults(&self) -> usize {
        2 * (self.nb_inputs + self.nb_gates() + self.nb_fanout)
    }

    fn add_arity(v: &mut Vec<usize>, sz: usize) {
        while v.len() <= sz {
            v.push(0);
        }
        v[sz] += 1;
    }
}

impl fmt::Display for CircuitStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Stats:")?;
        writeln!(f, "  Inputs: {}", self.nb_inputs)?;
        writeln!(f, "  Outputs: {}", self.nb_outputs)?;
        writeln!(f, "  Gates: {}", self.nb_gates())?;
        if self.nb_and != 0 {
            writeln!(f, "  And: {}", self.nb_and)?;
        }
        if self.nb_or != 0 {
            writeln!(f, "  Or: {}", self.nb_or)?;
        }
        if self.nb_and + self.nb_or != 0 {
            for (i, nb) in self.and_arity.iter().enumerate() {
                if *nb != 0 {
                    writeln!(f, "      {}: {}", i, nb)?;
                }
            }
        }
        if self.nb_xor != 0 {
            writeln!(f, "  Xor: {}", self.nb_xor)?;
            for (i, nb) in self.xor_arity.iter().enumerate() {
                if *nb != 0 {
                    writeln!(f, "      {}: {}", i, nb)?;
                }
            }
        }
        if self.nb_not != 0 {
            writeln!(f, "  Not: {}", self.nb_not)?;
        }
        if self.nb_buf != 0 {
            writeln!(f, "  Buf: {}", self.nb_buf)?;
        }
        writeln!(f, "  Inverting: {}", self.nb_inverting)?;
        writeln!(f, "  Fanout branches: {}", self.nb_fanout)?;
        writeln!(f, "  Depth: {}", self.depth)?;
        if self.nb_unobservable != 0 {
            writeln!(f, "  Unobservable: {}", self.nb_unobservable)?;
        }
        writeln!(f, "  Stuck-at faults: {}", self.nb_faults())?;
        fmt::Result::Ok(())
    }
}

/// Compute the statistics of the circuit
pub fn stats(c: &Circuit) -> CircuitStats {
    use GateType::*;
    let mut ret = CircuitStats {
        nb_inputs: c.nb_inputs(),
        nb_outputs: c.nb_outputs(),
        nb_and: 0,
        nb_or: 0,
        and_arity: Vec::new(),
        nb_xor: 0,
        xor_arity: Vec::new(),
        nb_inverting: 0,
        nb_buf: 0,
        nb_not: 0,
        nb_fanout: 0,
        depth: 0,
        nb_unobservable: 0,
    };
    for n in c.nodes() {
        let arity = n.inputs().len();
        match n.gate() {
            And | Nand => {
                ret.nb_and += 1;
                CircuitStats::add_arity(&mut ret.and_arity, arity);
            }
            Or | Nor => {
                ret.nb_or += 1;
                CircuitStats::add_arity(&mut ret.and_arity, arity);
            }
            Xor | Xnor => {
                ret.nb_xor += 1;
                CircuitStats::add_arity(&mut ret.xor_arity, arity);
            }
            Buf => ret.nb_buf += 1,
            Not => ret.nb_not += 1,
            Fanout => ret.nb_fanout += 1,
            Input => (),
        }
        if n.gate().is_inverting() {
            ret.nb_inverting += 1;
        }
        ret.depth = ret.depth.max(c.level(n.id()));
        if !c.is_observable(n.id()) {
            ret.nb_unobservable += 1;
        }
    }
    ret
}

#[cfg(test)]
mod tests {
    use super::stats;
    use crate::circuit::{CircuitBuilder, GateType};

    #[test]
    fn test_stats() {
        let mut b = CircuitBuilder::new();
        b.add_input("a");
        b.add_input("b");
        b.add_input("c");
        b.add_gate_with_inputs("x", GateType::Nand, &["a", "b"]);
        b.add_gate_with_inputs("y", GateType::Xor, &["x", "c"]);
        b.add_gate_with_inputs("z", GateType::Nor, &["x", "a", "c"]);
        b.add_gate_with_inputs("w", GateType::Not, &["z"]);
        b.add_output("y");
        b.add_output("w");
        let s = stats(&b.build().unwrap());
        assert_eq!(s.nb_inputs, 3);
        assert_eq!(s.nb_outputs, 2);
        assert_eq!(s.nb_and, 1);
        assert_eq!(s.nb_or, 1);
        assert_eq!(s.nb_xor, 1);
        assert_eq!(s.nb_not, 1);
        assert_eq!(s.nb_gates(), 4);
        assert_eq!(s.and_arity, vec![0, 0, 1, 1]);
        assert_eq!(s.nb_inverting, 3);
        // a, c and x have two fanouts each
        assert_eq!(s.nb_fanout, 6);
        assert_eq!(s.nb_unobservable, 0);
        assert_eq!(s.nb_faults(), 2 * 13);
        // a -> a_0 -> x -> x_1 -> z -> w
        assert_eq!(s.depth, 5);
        assert!(format!("{}", s).contains("Fanout branches: 6"));
    }
}
