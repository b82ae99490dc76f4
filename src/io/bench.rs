//! IO for .bench (ISCAS) files

use std::io::{BufRead, BufReader, Read};

use crate::circuit::{Circuit, CircuitBuilder, GateType};

/// Split a line on the given separators, dropping empty parts
fn split_line(line: &str, separators: &[char]) -> Vec<String> {
    line.split(separators)
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Read a circuit in .bench format, as used by the ISCAS benchmarks
///
/// These files describe the design with simple statements like:
/// ```text
///     # This is a comment
///     INPUT(i0)
///     INPUT(i1)
///     OUTPUT(x4)
///     x0 = AND(i0, i1)
///     x1 = NAND(x0, i1)
///     x2 = OR(x0, i0)
///     x3 = NOR(i0, x1)
///     x4 = XOR(x3, x2)
///     x5 = BUFF(x4)
///     x6 = NOT(x5)
/// ```
/// Signals may be used before they are defined. Fanouts are split when the circuit is built.
pub fn read_bench<R: Read>(r: R) -> Result<Circuit, String> {
    let mut builder = CircuitBuilder::new();
    for (num, l) in BufReader::new(r).lines().enumerate() {
        let Ok(s) = l else {
            return Err("Error during file IO".to_string());
        };
        let t = match s.find('#') {
            Some(pos) => s[..pos].trim(),
            None => s.trim(),
        };
        if t.is_empty() {
            continue;
        }
        if !t.contains('=') {
            let parts = split_line(t, &['(', ')']);
            if parts.len() != 2 {
                return Err(format!("Invalid statement on line {}: {}", num + 1, t));
            }
            match parts[0].to_uppercase().as_str() {
                "INPUT" => {
                    builder.add_input(&parts[1]);
                }
                "OUTPUT" => builder.add_output(&parts[1]),
                _ => return Err(format!("Unknown keyword {}", parts[0])),
            }
        } else {
            let parts = split_line(t, &['=', '(', ',', ')']);
            if parts.len() < 3 {
                return Err(format!("Invalid statement on line {}: {}", num + 1, t));
            }
            let Some(gate) = GateType::from_keyword(&parts[1]) else {
                return Err(format!("Unknown gate type {}", parts[1]));
            };
            let node = builder.add_gate(&parts[0], gate);
            for dep in &parts[2..] {
                builder.add_input_name(node, dep);
            }
        }
    }
    builder.build()
}
