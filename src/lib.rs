//! Test pattern generation for combinational circuits
//!
//! This crate generates test patterns for single stuck-at faults, using the
//! [PODEM](https://en.wikipedia.org/wiki/PODEM) algorithm (Path-Oriented Decision Making).
//! A stuck-at fault forces a signal of the circuit to a constant 0 or 1. A test pattern
//! is a value for each primary input such that the faulty circuit gives a different
//! result than the good circuit on at least one primary output.
//!
//! # Usage
//!
//! ```bash
//! # Show available commands
//! # At the moment, only .bench files are supported
//! podem help
//! # Show statistics about the circuit
//! podem show mydesign.bench
//! # Generate test patterns for all stuck-at faults
//! podem atpg mydesign.bench -o atpg.test
//! # Generate test patterns for the faults listed in a file, checking them by simulation
//! podem atpg mydesign.bench -f faults.txt -o atpg.test --check
//! # Simulate input vectors
//! podem simulate mydesign.bench -i vectors.txt -o outputs.txt
//! ```
//!
//! # Development
//!
//! ## Datastructures
//!
//! `Circuit` is a graph of gates with named signals. Each node has a value in a five-valued
//! algebra: 0, 1, X (unknown), D (1 in the good circuit, 0 in the faulty circuit) and D' (the
//! opposite). Good and faulty circuits are thus simulated at once.
//!
//! Signals with multiple fanouts are split into fanout branches when the circuit is built,
//! so that every possible stuck-at fault is the output fault of exactly one node.
//!
//! For example, here is a full adder circuit:
//! ```
//! # use podem::circuit::{CircuitBuilder, GateType};
//! let mut builder = CircuitBuilder::new();
//! builder.add_input("a");
//! builder.add_input("b");
//! builder.add_input("cin");
//! builder.add_gate_with_inputs("p", GateType::Xor, &["a", "b"]);
//! builder.add_gate_with_inputs("s", GateType::Xor, &["p", "cin"]);
//! builder.add_gate_with_inputs("g", GateType::Nand, &["a", "b"]);
//! builder.add_gate_with_inputs("t", GateType::Nand, &["p", "cin"]);
//! builder.add_gate_with_inputs("cout", GateType::Nand, &["g", "t"]);
//! builder.add_output("s");
//! builder.add_output("cout");
//! let circuit = builder.build().unwrap();
//! ```
//!
//! ## Test pattern generation
//!
//! ```
//! # use podem::circuit::generators::c17;
//! use podem::atpg::{find_test_pattern, SimMode};
//! use podem::sim::{detects_fault, Fault};
//!
//! let mut circuit = c17();
//! let fault = Fault::from_name(&circuit, "16", false).unwrap();
//! let (pattern, _) = find_test_pattern(&mut circuit, fault, SimMode::EventDriven);
//! assert!(detects_fault(&mut circuit, &pattern.unwrap(), fault));
//! ```

#![warn(missing_docs)]

pub mod atpg;
pub mod circuit;
pub mod io;
pub mod sim;

pub use circuit::{Circuit, CircuitBuilder, GateType, LogicValue};
pub use sim::Fault;
