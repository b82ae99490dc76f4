//! IO for fault lists

use std::io::{BufRead, BufReader, Read};

use crate::circuit::Circuit;
use crate::sim::Fault;

/// Parse a fault type: 0 for stuck-at-0, 1 for stuck-at-1
fn parse_fault_value(s: &str) -> Result<bool, String> {
    match s.trim() {
        "0" => Ok(false),
        "1" => Ok(true),
        _ => Err(format!("Invalid fault type {}, expected 0 or 1", s.trim())),
    }
}

/// Read a list of stuck-at faults
///
/// Each fault is given by the name of the faulty signal on one line, followed by the fault
/// type on the next line:
/// ```text
///     x1
///     0
///     a_1
///     1
/// ```
/// Name and type may also be given on the same line, separated by whitespace.
pub fn read_faults<R: Read>(r: R, circuit: &Circuit) -> Result<Vec<Fault>, String> {
    let mut ret = Vec::new();
    let mut pending_name: Option<String> = None;
    for l in BufReader::new(r).lines() {
        let Ok(s) = l else {
            return Err("Error during file IO".to_string());
        };
        let t = s.trim();
        if t.is_empty() {
            continue;
        }
        match pending_name.take() {
            Some(name) => {
                let value = parse_fault_value(t)?;
                ret.push(Fault::from_name(circuit, &name, value)?);
            }
            None => {
                let parts: Vec<&str> = t.split_whitespace().collect();
                match parts.len() {
                    1 => pending_name = Some(parts[0].to_string()),
                    2 => {
                        let value = parse_fault_value(parts[1])?;
                        ret.push(Fault::from_name(circuit, parts[0], value)?);
                    }
                    _ => return Err(format!("Invalid fault description: {t}")),
                }
            }
        }
    }
    if let Some(name) = pending_name {
        return Err(format!("Missing fault type for {name}"));
    }
    Ok(ret)
}
