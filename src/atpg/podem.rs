use std::fmt;

use crate::circuit::{Circuit, GateType, LogicValue};
use crate::sim::{fault_observed, simulate_full, EventSimulator, Fault};

use super::frontier::DFrontier;
use super::SimMode;

/// A value to obtain on a node
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Objective {
    /// Node to control
    pub node: usize,
    /// Value wanted on the node, in the good circuit
    pub value: LogicValue,
}

/// Counters for a single search
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Number of primary input assignments decided by backtrace
    pub nb_decisions: usize,
    /// Number of decisions that had to be reversed
    pub nb_backtracks: usize,
}

impl SearchStats {
    /// Accumulate the counters of another search
    pub fn merge(&mut self, other: &SearchStats) {
        self.nb_decisions += other.nb_decisions;
        self.nb_backtracks += other.nb_backtracks;
    }
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} decisions, {} backtracks",
            self.nb_decisions, self.nb_backtracks
        )
    }
}

/// Search state for a single fault
///
/// The circuit is borrowed for the duration of the search: its values are modified, and
/// the fault is left active when the search ends.
pub struct Podem<'a> {
    circuit: &'a mut Circuit,
    fault: Fault,
    activation: LogicValue,
    frontier: DFrontier,
    sim: EventSimulator,
    sim_mode: SimMode,
    stats: SearchStats,
}

impl<'a> Podem<'a> {
    /// Prepare the search: all values unknown and the fault as the only active one
    pub fn new(circuit: &'a mut Circuit, fault: Fault, sim_mode: SimMode) -> Podem<'a> {
        circuit.clear_faults();
        circuit.set_fault(fault);
        circuit.reset_values(LogicValue::X);
        simulate_full(circuit);
        let sim = EventSimulator::new(circuit);
        Podem {
            circuit,
            fault,
            activation: fault.activation_value(),
            frontier: DFrontier::new(),
            sim,
            sim_mode,
            stats: SearchStats::default(),
        }
    }

    /// Counters of the search so far
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Choose the next value to justify
    ///
    /// Activating the fault comes first. Once activated, the first input with an unknown
    /// value of the first gate of the D-frontier is set to the non-controlling value.
    /// Returns None if the current assignment cannot lead to a test.
    pub fn objective(&mut self) -> Option<Objective> {
        let site = self.circuit.value(self.fault.node);
        if site == LogicValue::X {
            return Some(Objective {
                node: self.fault.node,
                value: self.activation,
            });
        }
        if !site.is_fault_effect() {
            // Blocked by the opposite value, or outside of the fanin of the outputs
            return None;
        }
        self.frontier.update(self.circuit);
        let gate = self.frontier.first()?;
        let node = self.circuit.node(gate);
        let value = node.gate().propagation_value();
        if value == LogicValue::X {
            return None;
        }
        let input = node
            .inputs()
            .iter()
            .copied()
            .find(|&p| self.circuit.value(p) == LogicValue::X)?;
        Some(Objective { node: input, value })
    }

    /// Map an objective to a primary input assignment
    ///
    /// Follows the first input with an unknown value back to a primary input, and
    /// complements the value for each inverting gate on the way.
    pub fn backtrace(&self, objective: Objective) -> Option<(usize, LogicValue)> {
        let mut node = objective.node;
        let mut inverted = false;
        while self.circuit.node(node).gate() != GateType::Input {
            let n = self.circuit.node(node);
            if n.gate().is_inverting() {
                inverted = !inverted;
            }
            node = n
                .inputs()
                .iter()
                .copied()
                .find(|&p| self.circuit.value(p) == LogicValue::X)?;
        }
        let value = if inverted {
            !objective.value
        } else {
            objective.value
        };
        Some((node, value))
    }

    /// Assign a primary input and update the values of the circuit
    fn apply(&mut self, input: usize, value: LogicValue) {
        match self.sim_mode {
            SimMode::Full => {
                self.circuit.assign(input, value);
                simulate_full(self.circuit);
            }
            SimMode::EventDriven => {
                self.sim.assign_input(self.circuit, input, value);
                self.sim.run(self.circuit);
            }
        }
    }

    /// Depth-first search over primary input assignments
    ///
    /// On failure, the inputs assigned by this call are back to X.
    fn search(&mut self) -> bool {
        if fault_observed(self.circuit) {
            return true;
        }
        let Some(objective) = self.objective() else {
            return false;
        };
        let Some((input, value)) = self.backtrace(objective) else {
            return false;
        };
        self.stats.nb_decisions += 1;
        self.apply(input, value);
        if self.search() {
            return true;
        }

        self.stats.nb_backtracks += 1;
        self.apply(input, !value);
        if self.search() {
            return true;
        }

        self.apply(input, LogicValue::X);
        false
    }

    /// Run the search; return whether a test was found
    pub fn run(&mut self) -> bool {
        self.search()
    }

    /// Values of the primary inputs in the good circuit, X for unassigned inputs
    pub fn test_pattern(&self) -> Vec<LogicValue> {
        self.circuit
            .input_values()
            .into_iter()
            .map(|v| match v.good() {
                Some(b) => LogicValue::from_bool(b),
                None => LogicValue::X,
            })
            .collect()
    }
}

/// Find a test pattern for a fault with PODEM
///
/// Inputs that do not matter for the test are left as X. Returns None if no test
/// exists. The fault stays active on the circuit afterwards.
pub fn find_test_pattern(
    circuit: &mut Circuit,
    fault: Fault,
    sim_mode: SimMode,
) -> (Option<Vec<LogicValue>>, SearchStats) {
    let mut podem = Podem::new(circuit, fault, sim_mode);
    let found = podem.run();
    let pattern = if found {
        Some(podem.test_pattern())
    } else {
        None
    };
    (pattern, podem.stats())
}

#[cfg(test)]
mod tests {
    use super::{find_test_pattern, Objective, Podem};
    use crate::atpg::SimMode;
    use crate::circuit::generators::{c17, random, ripple_carry_adder};
    use crate::circuit::LogicValue::{self, *};
    use crate::circuit::{Circuit, CircuitBuilder, GateType};
    use crate::sim::{detects_fault, Fault};

    fn and2() -> Circuit {
        let mut b = CircuitBuilder::new();
        b.add_input("a");
        b.add_input("b");
        b.add_gate_with_inputs("y", GateType::And, &["a", "b"]);
        b.add_output("y");
        b.build().unwrap()
    }

    /// Every binary input vector
    fn all_vectors(nb_inputs: usize) -> Vec<Vec<LogicValue>> {
        (0..(1u64 << nb_inputs))
            .map(|v| {
                (0..nb_inputs)
                    .map(|i| LogicValue::from_bool((v >> i) & 1 != 0))
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_and_stuck_at_0() {
        let mut c = and2();
        let y = c.node_by_name("y").unwrap();
        let fault = Fault { node: y, value: false };
        let mut podem = Podem::new(&mut c, fault, SimMode::EventDriven);
        let obj = podem.objective().unwrap();
        assert_eq!(obj, Objective { node: y, value: One });
        assert_eq!(podem.backtrace(obj), Some((0, One)));

        let (pattern, stats) = find_test_pattern(&mut c, fault, SimMode::EventDriven);
        assert_eq!(pattern, Some(vec![One, One]));
        assert_eq!(stats.nb_decisions, 2);
        assert_eq!(stats.nb_backtracks, 0);
    }

    #[test]
    fn test_and_stuck_at_1() {
        let mut c = and2();
        let y = c.node_by_name("y").unwrap();
        let fault = Fault { node: y, value: true };
        let (pattern, _) = find_test_pattern(&mut c, fault, SimMode::EventDriven);
        let pattern = pattern.unwrap();
        assert!(pattern.contains(&Zero));
        assert_eq!(pattern, vec![Zero, X]);
        assert!(detects_fault(&mut c, &pattern, fault));
    }

    #[test]
    fn test_input_fault() {
        let mut c = and2();
        let b = c.node_by_name("b").unwrap();
        let fault = Fault { node: b, value: true };
        let (pattern, _) = find_test_pattern(&mut c, fault, SimMode::Full);
        assert_eq!(pattern, Some(vec![One, Zero]));
    }

    #[test]
    fn test_unobservable() {
        let mut b = CircuitBuilder::new();
        b.add_input("a");
        b.add_input("b");
        b.add_gate_with_inputs("y", GateType::Buf, &["a"]);
        let d = b.add_gate_with_inputs("dangling", GateType::Not, &["b"]);
        b.add_output("y");
        let mut c = b.build().unwrap();
        for value in [false, true] {
            let fault = Fault { node: d, value };
            for mode in [SimMode::Full, SimMode::EventDriven] {
                let (pattern, stats) = find_test_pattern(&mut c, fault, mode);
                assert_eq!(pattern, None);
                assert_eq!(stats.nb_decisions, 0);
            }
        }
    }

    /// y = OR(a, NOT(a)) is always 1, so a stuck-at-1 on y is redundant
    #[test]
    fn test_redundant() {
        let mut b = CircuitBuilder::new();
        b.add_input("a");
        b.add_gate_with_inputs("na", GateType::Not, &["a"]);
        let y = b.add_gate_with_inputs("y", GateType::Or, &["a", "na"]);
        b.add_output("y");
        let mut c = b.build().unwrap();
        let fault = Fault { node: y, value: true };
        let (pattern, stats) = find_test_pattern(&mut c, fault, SimMode::EventDriven);
        assert_eq!(pattern, None);
        assert_eq!(stats.nb_decisions, 1);
        assert_eq!(stats.nb_backtracks, 1);
        // The decision was undone
        assert_eq!(c.input_values(), vec![X]);

        // The stuck-at-0 is testable
        let fault = Fault { node: y, value: false };
        let (pattern, _) = find_test_pattern(&mut c, fault, SimMode::EventDriven);
        assert!(pattern.is_some());
    }

    #[test]
    fn test_objective_and_backtrace() {
        // z = NOR(NAND(a, b), c)
        let mut b = CircuitBuilder::new();
        let a = b.add_input("a");
        b.add_input("b");
        b.add_input("c");
        let x = b.add_gate_with_inputs("x", GateType::Nand, &["a", "b"]);
        b.add_gate_with_inputs("z", GateType::Nor, &["x", "c"]);
        b.add_output("z");
        let mut c = b.build().unwrap();

        let fault = Fault { node: x, value: true };
        let mut podem = Podem::new(&mut c, fault, SimMode::EventDriven);
        let obj = podem.objective().unwrap();
        assert_eq!(obj, Objective { node: x, value: Zero });
        // One inversion through the Nand
        assert_eq!(podem.backtrace(obj), Some((a, One)));

        assert!(podem.run());
        // Propagation through the Nor requires c = 0
        assert_eq!(podem.test_pattern(), vec![One, One, Zero]);
    }

    /// Objectives and backtraced decisions only carry binary values
    #[test]
    fn test_decisions_are_binary() {
        for seed in 0..10 {
            let mut c = random(8, 60, seed);
            for fault in Fault::all(&c) {
                let mut podem = Podem::new(&mut c, fault, SimMode::EventDriven);
                let Some(obj) = podem.objective() else {
                    continue;
                };
                assert!(obj.value.is_binary());
                let (input, value) = podem.backtrace(obj).unwrap();
                assert!(value.is_binary());
                assert!(c.inputs().contains(&input));
            }
        }
    }

    #[test]
    fn test_c17_fully_testable() {
        let mut c = c17();
        for fault in Fault::all(&c) {
            let (pattern, _) = find_test_pattern(&mut c, fault, SimMode::EventDriven);
            let pattern = pattern.unwrap();
            assert!(detects_fault(&mut c, &pattern, fault));
        }
    }

    #[test]
    fn test_adder_fully_testable() {
        let mut c = ripple_carry_adder(4);
        for fault in Fault::all(&c) {
            let (pattern, _) = find_test_pattern(&mut c, fault, SimMode::EventDriven);
            let pattern = pattern.unwrap();
            assert!(detects_fault(&mut c, &pattern, fault), "{}", fault);
        }
    }

    /// A test is found exactly when some input vector detects the fault
    #[test]
    fn test_random_against_exhaustive() {
        for seed in 0..20 {
            let mut c = random(5, 20, seed);
            let vectors = all_vectors(c.nb_inputs());
            for fault in Fault::all(&c) {
                let (pattern, _) = find_test_pattern(&mut c, fault, SimMode::EventDriven);
                let testable = vectors.iter().any(|v| detects_fault(&mut c, v, fault));
                assert_eq!(pattern.is_some(), testable, "{}", fault.describe(&c));
                if let Some(p) = pattern {
                    assert!(detects_fault(&mut c, &p, fault));
                }
            }
        }
    }

    /// Both simulation modes lead to the same decisions
    #[test]
    fn test_sim_modes_agree() {
        for seed in 0..20 {
            let mut c = random(6, 30, seed);
            for fault in Fault::all(&c) {
                let full = find_test_pattern(&mut c, fault, SimMode::Full);
                let event = find_test_pattern(&mut c, fault, SimMode::EventDriven);
                assert_eq!(full, event);
            }
        }
    }
}
