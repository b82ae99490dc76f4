//! IO for input vectors and test patterns
//!
//! Patterns are written one per line, with one character per primary input or output:
//! ```text
//!     01X1
//!     none found
//!     1100
//! ```

use std::io::{BufRead, BufReader, Read, Write};

use crate::circuit::LogicValue;

/// Read input vectors, one per line, made of 0, 1 and X characters
pub fn read_input_patterns<R: Read>(r: R) -> Result<Vec<Vec<LogicValue>>, String> {
    let mut ret = Vec::new();
    for (num, l) in BufReader::new(r).lines().enumerate() {
        let Ok(s) = l else {
            return Err("Error during file IO".to_string());
        };
        let t = s.trim();
        if t.is_empty() {
            continue;
        }
        let mut pattern = Vec::new();
        for c in t.chars() {
            match LogicValue::from_pattern_char(c) {
                Some(v) => pattern.push(v),
                None => {
                    return Err(format!(
                        "Do not recognize character {} in line {} of input vector file",
                        c,
                        num + 1
                    ))
                }
            }
        }
        ret.push(pattern);
    }
    Ok(ret)
}

fn pattern_to_string(pattern: &[LogicValue]) -> String {
    pattern.iter().map(|v| v.to_pattern_char()).collect()
}

/// Write patterns, one per line
pub fn write_patterns<W: Write>(w: &mut W, patterns: &[Vec<LogicValue>]) -> std::io::Result<()> {
    for p in patterns {
        writeln!(w, "{}", pattern_to_string(p))?;
    }
    Ok(())
}

/// Write the result of test pattern generation, one line per fault
///
/// Faults without a test are reported as `none found`.
pub fn write_test_patterns<W: Write>(
    w: &mut W,
    patterns: &[Option<Vec<LogicValue>>],
) -> std::io::Result<()> {
    for p in patterns {
        match p {
            Some(p) => writeln!(w, "{}", pattern_to_string(p))?,
            None => writeln!(w, "none found")?,
        }
    }
    Ok(())
}
