use std::fmt;

use crate::circuit::value::LogicValue;

/// Function of a node
///
/// The set of gate types is closed: primary inputs and fanout branches are represented
/// as nodes too, so that every stuck-at fault site is the output of exactly one node.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum GateType {
    /// N-input And gate
    And,
    /// N-input Or gate
    Or,
    /// N-input Nand gate
    Nand,
    /// N-input Nor gate
    Nor,
    /// N-input Xor gate
    Xor,
    /// N-input Xnor gate
    Xnor,
    /// Buffer
    Buf,
    /// Inverter
    Not,
    /// Primary input
    Input,
    /// Fanout branch, copying the value of its stem
    Fanout,
}

impl GateType {
    /// Parse a gate keyword, as used in .bench files
    pub fn from_keyword(s: &str) -> Option<GateType> {
        use GateType::*;
        match s.to_uppercase().as_str() {
            "AND" => Some(And),
            "OR" => Some(Or),
            "NAND" => Some(Nand),
            "NOR" => Some(Nor),
            "XOR" => Some(Xor),
            "XNOR" => Some(Xnor),
            "BUF" | "BUFF" => Some(Buf),
            "NOT" => Some(Not),
            _ => None,
        }
    }

    /// Keyword of the gate type
    pub fn name(&self) -> &'static str {
        use GateType::*;
        match self {
            And => "AND",
            Or => "OR",
            Nand => "NAND",
            Nor => "NOR",
            Xor => "XOR",
            Xnor => "XNOR",
            Buf => "BUFF",
            Not => "NOT",
            Input => "INPUT",
            Fanout => "FANOUT",
        }
    }

    /// Returns whether the gate inverts the polarity of a path going through it
    pub fn is_inverting(&self) -> bool {
        matches!(
            self,
            GateType::Not | GateType::Nand | GateType::Nor | GateType::Xnor
        )
    }

    /// Returns whether the gate is an And/Or-like gate with a controlling value
    pub fn is_and_like(&self) -> bool {
        matches!(
            self,
            GateType::And | GateType::Or | GateType::Nand | GateType::Nor
        )
    }

    /// Returns whether the gate copies or inverts its single input
    pub fn is_buf_like(&self) -> bool {
        matches!(self, GateType::Buf | GateType::Not | GateType::Fanout)
    }

    /// Controlling value and output inversion for And/Or-like gates
    pub fn controlling_value(&self) -> Option<(bool, bool)> {
        use GateType::*;
        match self {
            And => Some((false, false)),
            Nand => Some((false, true)),
            Or => Some((true, false)),
            Nor => Some((true, true)),
            _ => None,
        }
    }

    /// Value to put on a side input so that a fault effect propagates through the gate
    ///
    /// X if the gate type has no such value.
    pub fn propagation_value(&self) -> LogicValue {
        use GateType::*;
        match self {
            And | Nand => LogicValue::One,
            Or | Nor | Xor | Xnor => LogicValue::Zero,
            _ => LogicValue::X,
        }
    }

    /// Returns whether the number of inputs is valid for this gate type
    pub fn accepts_arity(&self, nb_inputs: usize) -> bool {
        if *self == GateType::Input {
            nb_inputs == 0
        } else if self.is_buf_like() {
            nb_inputs == 1
        } else {
            nb_inputs >= 1
        }
    }
}

impl fmt::Display for GateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A node of the circuit: a gate with its connectivity, current value and fault annotation
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) id: usize,
    pub(crate) name: String,
    pub(crate) gate: GateType,
    pub(crate) inputs: Vec<usize>,
    pub(crate) outputs: Vec<usize>,
    pub(crate) value: LogicValue,
    pub(crate) fault: Option<bool>,
}

impl Node {
    pub(crate) fn new(id: usize, name: String, gate: GateType) -> Node {
        Node {
            id,
            name,
            gate,
            inputs: Vec::new(),
            outputs: Vec::new(),
            value: LogicValue::Unset,
            fault: None,
        }
    }

    /// Index of the node in its circuit
    pub fn id(&self) -> usize {
        self.id
    }

    /// Name of the signal driven by the node
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Function of the node
    pub fn gate(&self) -> GateType {
        self.gate
    }

    /// Nodes driving the inputs of this node, in order
    pub fn inputs(&self) -> &[usize] {
        &self.inputs
    }

    /// Nodes using the output of this node
    pub fn outputs(&self) -> &[usize] {
        &self.outputs
    }

    /// Current value of the node's output
    pub fn value(&self) -> LogicValue {
        self.value
    }

    /// Stuck-at value on the node's output, if a fault is injected here
    pub fn fault(&self) -> Option<bool> {
        self.fault
    }
}
