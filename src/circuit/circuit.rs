use core::fmt;

use fxhash::FxHashMap;
use itertools::Itertools;

use crate::circuit::gates::{GateType, Node};
use crate::circuit::value::LogicValue;
use crate::sim::Fault;

/// Incremental construction of a circuit, with inputs referenced by name
///
/// Gates may reference signals that are declared later. Names are resolved when the
/// circuit is built, and multiple fanouts are split at that point.
#[derive(Debug, Clone, Default)]
pub struct CircuitBuilder {
    nodes: Vec<Node>,
    inputs: Vec<usize>,
    input_names: Vec<Vec<String>>,
    output_names: Vec<String>,
}

impl CircuitBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new node; primary inputs are recorded in declaration order
    pub fn add_gate(&mut self, name: &str, gate: GateType) -> usize {
        assert!(
            gate != GateType::Fanout,
            "Fanout branches are created when building the circuit"
        );
        let id = self.nodes.len();
        self.nodes.push(Node::new(id, name.to_string(), gate));
        self.input_names.push(Vec::new());
        if gate == GateType::Input {
            self.inputs.push(id);
        }
        id
    }

    /// Add a new primary input
    pub fn add_input(&mut self, name: &str) -> usize {
        self.add_gate(name, GateType::Input)
    }

    /// Add a new node and the names of the signals driving it
    pub fn add_gate_with_inputs(&mut self, name: &str, gate: GateType, inputs: &[&str]) -> usize {
        let id = self.add_gate(name, gate);
        for n in inputs {
            self.add_input_name(id, n);
        }
        id
    }

    /// Record the name of a signal driving the next input of a node
    pub fn add_input_name(&mut self, node: usize, name: &str) {
        assert!(node < self.nodes.len(), "Node index {node} out of range");
        self.input_names[node].push(name.to_string());
    }

    /// Record the name of a primary output
    pub fn add_output(&mut self, name: &str) {
        self.output_names.push(name.to_string());
    }

    /// Resolve all names and create the circuit
    ///
    /// Fails if a name is defined twice or never defined, if a gate has an invalid number of
    /// inputs, or if the circuit contains a combinational loop.
    pub fn build(self) -> Result<Circuit, String> {
        let CircuitBuilder {
            mut nodes,
            inputs,
            input_names,
            output_names,
        } = self;

        let mut name_to_node = FxHashMap::default();
        for n in &nodes {
            let present = name_to_node.insert(n.name.clone(), n.id).is_some();
            if present {
                return Err(format!("{} is defined twice", n.name));
            }
        }

        for (i, names) in input_names.iter().enumerate() {
            let gate = nodes[i].gate;
            if !gate.accepts_arity(names.len()) {
                return Err(format!(
                    "Gate {} has {} inputs, which is not valid for {}",
                    nodes[i].name,
                    names.len(),
                    gate
                ));
            }
            for n in names {
                let Some(&pred) = name_to_node.get(n) else {
                    return Err(format!("Gate input {n} is not generated anywhere"));
                };
                nodes[i].inputs.push(pred);
                nodes[pred].outputs.push(i);
            }
        }

        let mut outputs = Vec::new();
        for o in &output_names {
            let Some(&node) = name_to_node.get(o) else {
                return Err(format!("Output {o} is not generated anywhere"));
            };
            outputs.push(node);
        }

        let mut ret = Circuit {
            nodes,
            inputs,
            outputs,
            levels: Vec::new(),
            observable: Vec::new(),
            name_to_node,
            fault_site: None,
        };
        ret.split_fanouts()?;
        ret.compute_levels()?;
        ret.compute_observability();
        ret.check();
        Ok(ret)
    }
}

/// Representation of a combinational circuit as a graph of gates
///
/// Nodes are stored in an arena and reference each other by index, in both directions.
/// The topology is fixed once built: only node values and the fault annotation change.
/// After construction, a node with several fanouts only drives fanout branches, so that
/// the stem and each branch are distinct fault sites.
#[derive(Debug, Clone)]
pub struct Circuit {
    nodes: Vec<Node>,
    inputs: Vec<usize>,
    outputs: Vec<usize>,
    levels: Vec<u32>,
    observable: Vec<bool>,
    name_to_node: FxHashMap<String, usize>,
    fault_site: Option<usize>,
}

impl Circuit {
    /// Return the number of primary inputs
    pub fn nb_inputs(&self) -> usize {
        self.inputs.len()
    }

    /// Return the number of primary outputs
    pub fn nb_outputs(&self) -> usize {
        self.outputs.len()
    }

    /// Return the number of nodes in the circuit, including inputs and fanout branches
    pub fn nb_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Get the node of the primary input at index i
    pub fn input(&self, i: usize) -> usize {
        assert!(i < self.nb_inputs());
        self.inputs[i]
    }

    /// Get the node of the primary output at index i
    pub fn output(&self, i: usize) -> usize {
        assert!(i < self.nb_outputs());
        self.outputs[i]
    }

    /// Primary input nodes, in declaration order
    pub fn inputs(&self) -> &[usize] {
        &self.inputs
    }

    /// Primary output nodes, in declaration order
    pub fn outputs(&self) -> &[usize] {
        &self.outputs
    }

    /// Get the node at index i
    pub fn node(&self, i: usize) -> &Node {
        assert!(i < self.nb_nodes(), "Node index {i} out of range");
        &self.nodes[i]
    }

    /// Iterate over all nodes
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Find the node driving a signal
    pub fn node_by_name(&self, name: &str) -> Option<usize> {
        self.name_to_node.get(name).copied()
    }

    /// Current value of a node
    pub fn value(&self, i: usize) -> LogicValue {
        self.node(i).value
    }

    /// Topological level of a node: 0 for primary inputs
    pub fn level(&self, i: usize) -> u32 {
        self.levels[i]
    }

    /// Returns whether the node is in the transitive fanin of a primary output
    pub fn is_observable(&self, i: usize) -> bool {
        self.observable[i]
    }

    /// Set the value of a node as is
    pub(crate) fn set_raw_value(&mut self, i: usize, value: LogicValue) {
        assert!(i < self.nb_nodes(), "Node index {i} out of range");
        self.nodes[i].value = value;
    }

    /// Set the value of a node, taking the fault on its output into account
    pub fn assign(&mut self, i: usize, value: LogicValue) {
        let v = value.with_fault(self.node(i).fault);
        self.nodes[i].value = v;
    }

    /// Set the values of all primary inputs, taking faults into account
    pub fn set_input_values(&mut self, values: &[LogicValue]) {
        assert_eq!(
            values.len(),
            self.nb_inputs(),
            "Incorrect number of input values"
        );
        for i in 0..self.nb_inputs() {
            self.assign(self.inputs[i], values[i]);
        }
    }

    /// Values of the primary inputs
    pub fn input_values(&self) -> Vec<LogicValue> {
        self.inputs.iter().map(|&i| self.nodes[i].value).collect()
    }

    /// Values of the primary outputs
    pub fn output_values(&self) -> Vec<LogicValue> {
        self.outputs.iter().map(|&i| self.nodes[i].value).collect()
    }

    /// Set all node values, including primary inputs
    pub fn reset_values(&mut self, value: LogicValue) {
        for n in &mut self.nodes {
            n.value = value;
        }
    }

    /// Remove the fault annotation
    pub fn clear_faults(&mut self) {
        if let Some(i) = self.fault_site.take() {
            self.nodes[i].fault = None;
        }
    }

    /// Make a fault the only active one
    pub fn set_fault(&mut self, fault: Fault) {
        assert!(fault.node < self.nb_nodes(), "Fault on invalid node {}", fault.node);
        self.clear_faults();
        self.nodes[fault.node].fault = Some(fault.value);
        self.fault_site = Some(fault.node);
    }

    /// The currently active fault, if any
    pub fn fault(&self) -> Option<Fault> {
        self.fault_site.map(|node| Fault {
            node,
            value: self.nodes[node].fault == Some(true),
        })
    }

    /// Split nodes with multiple fanouts, adding a fanout branch for each
    ///
    /// Node `a` used by two gates becomes `a -> a_0 -> g0` and `a -> a_1 -> g1`.
    fn split_fanouts(&mut self) -> Result<(), String> {
        // Branches are appended and have a single fanout, so they are never split again
        let nb_original = self.nodes.len();
        for i in 0..nb_original {
            if self.nodes[i].outputs.len() <= 1 {
                continue;
            }
            let users = std::mem::take(&mut self.nodes[i].outputs);
            for (j, &user) in users.iter().enumerate() {
                let name = format!("{}_{}", self.nodes[i].name, j);
                let branch = self.nodes.len();
                if self.name_to_node.insert(name.clone(), branch).is_some() {
                    return Err(format!(
                        "Fanout branch {name} conflicts with an existing signal"
                    ));
                }
                let mut node = Node::new(branch, name, GateType::Fanout);
                node.inputs.push(i);
                node.outputs.push(user);
                self.nodes.push(node);
                self.nodes[i].outputs.push(branch);

                // Replace the first connection to the stem that was not replaced yet
                let pos = self.nodes[user].inputs.iter().position(|&p| p == i);
                match pos {
                    Some(p) => self.nodes[user].inputs[p] = branch,
                    None => panic!("Inconsistent connection {} -> {}", i, user),
                }
            }
        }
        Ok(())
    }

    /// Compute the topological level of each node, failing on combinational loops
    fn compute_levels(&mut self) -> Result<(), String> {
        let mut remaining: Vec<usize> = self.nodes.iter().map(|n| n.inputs.len()).collect();
        let mut levels = vec![0u32; self.nb_nodes()];
        let mut to_visit: Vec<usize> = (0..self.nb_nodes())
            .filter(|&i| remaining[i] == 0)
            .collect();
        let mut nb_visited = 0;
        while let Some(i) = to_visit.pop() {
            nb_visited += 1;
            for &o in &self.nodes[i].outputs {
                levels[o] = levels[o].max(levels[i] + 1);
                remaining[o] -= 1;
                if remaining[o] == 0 {
                    to_visit.push(o);
                }
            }
        }
        if nb_visited != self.nb_nodes() {
            let in_loop = (0..self.nb_nodes())
                .filter(|&i| remaining[i] != 0)
                .map(|i| self.nodes[i].name.as_str())
                .take(5)
                .join(", ");
            return Err(format!(
                "Combinational loop in the circuit, involving {in_loop}"
            ));
        }
        self.levels = levels;
        Ok(())
    }

    /// Mark the nodes in the transitive fanin of the primary outputs
    fn compute_observability(&mut self) {
        let mut observable = vec![false; self.nb_nodes()];
        let mut to_visit = self.outputs.clone();
        while let Some(i) = to_visit.pop() {
            if observable[i] {
                continue;
            }
            observable[i] = true;
            to_visit.extend(self.nodes[i].inputs.iter());
        }
        self.observable = observable;
    }

    /// Check consistency of the datastructure
    pub fn check(&self) {
        for (i, n) in self.nodes.iter().enumerate() {
            assert_eq!(n.id, i);
            assert!(
                n.gate.accepts_arity(n.inputs.len()),
                "Invalid number of inputs for {}",
                n.name
            );
            // Connections in both directions, with the same multiplicity
            for &p in &n.inputs {
                let fwd = self.nodes[p].outputs.iter().filter(|&&o| o == i).count();
                let bwd = n.inputs.iter().filter(|&&o| o == p).count();
                assert_eq!(fwd, bwd, "Inconsistent connection {} -> {}", p, i);
            }
            for &o in &n.outputs {
                assert!(
                    self.nodes[o].inputs.contains(&i),
                    "Inconsistent connection {} -> {}",
                    i,
                    o
                );
            }
            // Multiple fanouts only go to fanout branches
            if n.outputs.len() > 1 {
                for &o in &n.outputs {
                    assert_eq!(
                        self.nodes[o].gate,
                        GateType::Fanout,
                        "{} has multiple fanouts that are not split",
                        n.name
                    );
                }
            }
        }
        for &i in &self.inputs {
            assert_eq!(self.nodes[i].gate, GateType::Input);
        }
        for &o in &self.outputs {
            assert!(o < self.nb_nodes(), "Invalid output {o}");
        }
        assert_eq!(self.levels.len(), self.nb_nodes());
        assert_eq!(self.observable.len(), self.nb_nodes());
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = |v: &[usize], sep: &str| {
            v.iter().map(|&i| self.nodes[i].name.as_str()).join(sep)
        };
        writeln!(f, "Inputs: {}", names(&self.inputs, " "))?;
        writeln!(f, "Outputs: {}", names(&self.outputs, " "))?;
        for n in &self.nodes {
            write!(f, "Gate {}: {}", n.id, n.name)?;
            if let Some(v) = n.fault {
                write!(f, "/{}", i32::from(v))?;
            }
            write!(f, " = {}({})", n.gate, names(&n.inputs, ", "))?;
            if n.value != LogicValue::Unset {
                write!(f, " = {}", n.value)?;
            }
            writeln!(f, ";")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::CircuitBuilder;
    use crate::circuit::{GateType, LogicValue};
    use crate::sim::Fault;

    #[test]
    fn test_basic() {
        let mut b = CircuitBuilder::new();
        b.add_input("a");
        b.add_input("b");
        b.add_gate_with_inputs("y", GateType::And, &["a", "b"]);
        b.add_output("y");
        let c = b.build().unwrap();

        assert_eq!(c.nb_inputs(), 2);
        assert_eq!(c.nb_outputs(), 1);
        assert_eq!(c.nb_nodes(), 3);
        assert_eq!(c.input(0), 0);
        assert_eq!(c.input(1), 1);
        assert_eq!(c.output(0), 2);
        assert_eq!(c.node(2).inputs(), &[0, 1]);
        assert_eq!(c.node(0).outputs(), &[2]);
        assert_eq!(c.node_by_name("y"), Some(2));
        assert_eq!(c.node_by_name("z"), None);
        assert_eq!(c.level(2), 1);
        assert!(c.is_observable(0));
        assert_eq!(c.value(2), LogicValue::Unset);
    }

    #[test]
    fn test_forward_reference() {
        let mut b = CircuitBuilder::new();
        b.add_gate_with_inputs("y", GateType::Not, &["x"]);
        b.add_gate_with_inputs("x", GateType::Buf, &["a"]);
        b.add_input("a");
        b.add_output("y");
        let c = b.build().unwrap();
        assert_eq!(c.inputs(), &[2]);
        assert_eq!(c.level(0), 2);
        assert_eq!(c.level(1), 1);
    }

    #[test]
    fn test_fanout_split() {
        // a = AND(b, c); d = OR(a, e); f = OR(a, g)
        let mut b = CircuitBuilder::new();
        for i in ["b", "c", "e", "g"] {
            b.add_input(i);
        }
        b.add_gate_with_inputs("a", GateType::And, &["b", "c"]);
        b.add_gate_with_inputs("d", GateType::Or, &["a", "e"]);
        b.add_gate_with_inputs("f", GateType::Or, &["a", "g"]);
        b.add_output("d");
        b.add_output("f");
        b.add_output("a");
        let c = b.build().unwrap();

        assert_eq!(c.nb_nodes(), 9);
        let a = c.node_by_name("a").unwrap();
        let a0 = c.node_by_name("a_0").unwrap();
        let a1 = c.node_by_name("a_1").unwrap();
        let d = c.node_by_name("d").unwrap();
        let f = c.node_by_name("f").unwrap();
        assert_eq!(c.node(a).outputs(), &[a0, a1]);
        assert_eq!(c.node(a0).gate(), GateType::Fanout);
        assert_eq!(c.node(a0).inputs(), &[a]);
        assert_eq!(c.node(a0).outputs(), &[d]);
        assert_eq!(c.node(a1).outputs(), &[f]);
        assert_eq!(c.node(d).inputs()[0], a0);
        assert_eq!(c.node(f).inputs()[0], a1);
        // The stem stays the primary output
        assert_eq!(c.output(2), a);
        // Nodes with a single fanout are not split
        assert!(c.node_by_name("b_0").is_none());
        assert_eq!(c.node(c.node_by_name("b").unwrap()).outputs(), &[a]);
    }

    #[test]
    fn test_fanout_same_gate() {
        let mut b = CircuitBuilder::new();
        b.add_input("a");
        b.add_gate_with_inputs("y", GateType::Xor, &["a", "a"]);
        b.add_output("y");
        let c = b.build().unwrap();
        let y = c.node_by_name("y").unwrap();
        let a0 = c.node_by_name("a_0").unwrap();
        let a1 = c.node_by_name("a_1").unwrap();
        assert_eq!(c.node(y).inputs(), &[a0, a1]);
    }

    #[test]
    fn test_errors() {
        let mut b = CircuitBuilder::new();
        b.add_input("a");
        b.add_gate_with_inputs("a", GateType::Not, &["a"]);
        assert!(b.build().unwrap_err().contains("defined twice"));

        let mut b = CircuitBuilder::new();
        b.add_input("a");
        b.add_gate_with_inputs("y", GateType::And, &["a", "b"]);
        assert!(b.build().unwrap_err().contains("not generated anywhere"));

        let mut b = CircuitBuilder::new();
        b.add_input("a");
        b.add_output("y");
        assert!(b.build().unwrap_err().contains("Output y"));

        let mut b = CircuitBuilder::new();
        b.add_input("a");
        b.add_input("b");
        b.add_gate_with_inputs("y", GateType::Not, &["a", "b"]);
        assert!(b.build().unwrap_err().contains("inputs"));

        let mut b = CircuitBuilder::new();
        b.add_input("a");
        b.add_gate_with_inputs("x", GateType::And, &["a", "y"]);
        b.add_gate_with_inputs("y", GateType::Buf, &["x"]);
        assert!(b.build().unwrap_err().contains("loop"));

        let mut b = CircuitBuilder::new();
        b.add_input("a");
        b.add_input("a_0");
        b.add_gate_with_inputs("x", GateType::Not, &["a"]);
        b.add_gate_with_inputs("y", GateType::Not, &["a"]);
        assert!(b.build().unwrap_err().contains("conflicts"));
    }

    #[test]
    #[should_panic]
    fn test_out_of_range() {
        let mut b = CircuitBuilder::new();
        b.add_input("a");
        let c = b.build().unwrap();
        c.node(1);
    }

    #[test]
    fn test_observability() {
        let mut b = CircuitBuilder::new();
        b.add_input("a");
        b.add_input("b");
        b.add_gate_with_inputs("y", GateType::Not, &["a"]);
        b.add_gate_with_inputs("dangling", GateType::Not, &["b"]);
        b.add_output("y");
        let c = b.build().unwrap();
        assert!(c.is_observable(c.node_by_name("a").unwrap()));
        assert!(!c.is_observable(c.node_by_name("b").unwrap()));
        assert!(!c.is_observable(c.node_by_name("dangling").unwrap()));
    }

    #[test]
    fn test_faults() {
        let mut b = CircuitBuilder::new();
        b.add_input("a");
        b.add_gate_with_inputs("y", GateType::Buf, &["a"]);
        b.add_output("y");
        let mut c = b.build().unwrap();
        assert_eq!(c.fault(), None);

        c.set_fault(Fault { node: 0, value: true });
        assert_eq!(c.node(0).fault(), Some(true));
        c.assign(0, LogicValue::Zero);
        assert_eq!(c.value(0), LogicValue::Dbar);

        c.set_fault(Fault { node: 1, value: false });
        assert_eq!(c.node(0).fault(), None);
        assert_eq!(c.fault(), Some(Fault { node: 1, value: false }));
        c.assign(0, LogicValue::Zero);
        assert_eq!(c.value(0), LogicValue::Zero);

        c.clear_faults();
        assert_eq!(c.fault(), None);
        assert_eq!(c.node(1).fault(), None);

        c.reset_values(LogicValue::X);
        assert_eq!(c.input_values(), vec![LogicValue::X]);
        assert_eq!(c.output_values(), vec![LogicValue::X]);
    }
}
