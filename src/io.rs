//! Read circuits, fault lists and patterns from files; write patterns to files

mod bench;
mod faults;
mod patterns;

use std::fs::File;
use std::path::Path;

pub use bench::read_bench;
pub use faults::read_faults;
pub use patterns::{read_input_patterns, write_patterns, write_test_patterns};

use crate::circuit::{Circuit, LogicValue};
use crate::sim::Fault;

fn open_file(path: &Path) -> Result<File, String> {
    File::open(path).map_err(|e| format!("Cannot read file {}: {}", path.display(), e))
}

fn create_file(path: &Path) -> Result<File, String> {
    File::create(path)
        .map_err(|e| format!("Cannot open file {} for output: {}", path.display(), e))
}

/// Read a circuit from a file
///
/// Following extensions are supported: .bench
pub fn read_circuit_file(path: &Path) -> Result<Circuit, String> {
    match path.extension() {
        None => Err(format!("No extension given for {}", path.display())),
        Some(s) => {
            if s == "bench" {
                read_bench(open_file(path)?)
            } else {
                Err(format!("Unknown extension {}", s.to_string_lossy()))
            }
        }
    }
}

/// Read a list of faults on a circuit from a file
pub fn read_fault_file(path: &Path, circuit: &Circuit) -> Result<Vec<Fault>, String> {
    read_faults(open_file(path)?, circuit)
}

/// Read input vectors from a file
pub fn read_input_pattern_file(path: &Path) -> Result<Vec<Vec<LogicValue>>, String> {
    read_input_patterns(open_file(path)?)
}

/// Write patterns to a file
pub fn write_pattern_file(path: &Path, patterns: &[Vec<LogicValue>]) -> Result<(), String> {
    let mut f = create_file(path)?;
    write_patterns(&mut f, patterns).map_err(|e| e.to_string())
}

/// Write the result of test pattern generation to a file
pub fn write_test_pattern_file(
    path: &Path,
    patterns: &[Option<Vec<LogicValue>>],
) -> Result<(), String> {
    let mut f = create_file(path)?;
    write_test_patterns(&mut f, patterns).map_err(|e| e.to_string())
}
