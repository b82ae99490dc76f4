//! Representation and handling of combinational circuits

mod circuit;
mod gates;
pub mod generators;
pub mod stats;
mod value;

pub use circuit::{Circuit, CircuitBuilder};
pub use gates::{GateType, Node};
pub use value::LogicValue;
