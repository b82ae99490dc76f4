//! Test pattern generation with PODEM
//!
//! For each fault, the search assigns primary inputs one at a time, starting from all
//! inputs unknown, until the fault effect reaches a primary output.

mod frontier;
mod podem;

use kdam::{tqdm, BarExt};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::circuit::{Circuit, LogicValue};
use crate::sim::{detects_fault, Fault};

pub use frontier::DFrontier;
pub use podem::{find_test_pattern, Objective, Podem, SearchStats};

/// Simulation used after each decision of the search
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SimMode {
    /// Recompute all values from the primary inputs
    Full,
    /// Only recompute the values that may have changed
    #[default]
    EventDriven,
}

/// Value given to the inputs that a test pattern leaves unknown
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FillPolicy {
    /// Keep them unknown
    #[default]
    X,
    /// Set them to 0
    Zero,
    /// Set them to 1
    One,
    /// Set them to random values
    Random,
}

/// Options for test pattern generation
#[derive(Clone, Debug, Default)]
pub struct PodemConfig {
    /// Simulation mode used during the search
    pub sim_mode: SimMode,
    /// Handling of unassigned inputs in the patterns found
    pub fill: FillPolicy,
    /// Seed for the random fill
    pub seed: u64,
    /// Check each pattern found by simulating it again
    pub check: bool,
    /// Print a line for each fault
    pub verbose: bool,
}

/// Replace the unknown values of a pattern according to the fill policy
pub fn fill_pattern(pattern: &mut [LogicValue], fill: FillPolicy, rng: &mut SmallRng) {
    for v in pattern.iter_mut() {
        if *v != LogicValue::X {
            continue;
        }
        *v = match fill {
            FillPolicy::X => LogicValue::X,
            FillPolicy::Zero => LogicValue::Zero,
            FillPolicy::One => LogicValue::One,
            FillPolicy::Random => LogicValue::from_bool(rng.gen()),
        };
    }
}

/// Generate a test pattern for each fault, in order
///
/// Returns None for the faults where no test exists.
pub fn generate_test_patterns(
    circuit: &mut Circuit,
    faults: &[Fault],
    config: &PodemConfig,
) -> std::io::Result<Vec<Option<Vec<LogicValue>>>> {
    let mut rng = SmallRng::seed_from_u64(config.seed);
    let mut total_stats = SearchStats::default();
    let mut nb_found = 0;
    let mut ret = Vec::new();

    let mut progress = tqdm!(total = faults.len());
    progress.set_description("Faults processed");
    progress.write(format!(
        "Analyzing circuit with {} inputs, {} outputs, {} nodes and {} faults",
        circuit.nb_inputs(),
        circuit.nb_outputs(),
        circuit.nb_nodes(),
        faults.len(),
    ))?;
    for &fault in faults {
        let (pattern, stats) = find_test_pattern(circuit, fault, config.sim_mode);
        total_stats.merge(&stats);
        let pattern = pattern.map(|mut p| {
            fill_pattern(&mut p, config.fill, &mut rng);
            p
        });
        if let Some(p) = &pattern {
            nb_found += 1;
            if config.check {
                assert!(
                    detects_fault(circuit, p, fault),
                    "Generated test does not detect fault {} on a primary output",
                    fault.describe(circuit)
                );
            }
        }
        if config.verbose {
            progress.write(format!(
                "Fault = {};{}",
                fault.describe(circuit),
                if pattern.is_some() {
                    " test found"
                } else {
                    " no test found"
                }
            ))?;
        }
        ret.push(pattern);
        progress.set_postfix(format!("found={}", nb_found));
        progress.update(1)?;
    }
    circuit.clear_faults();

    let nb_faults = faults.len().max(1);
    progress.write(format!(
        "Found tests for {}/{} faults ({:.2}% coverage), {} untestable",
        nb_found,
        faults.len(),
        100.0 * (nb_found as f64) / (nb_faults as f64),
        faults.len() - nb_found,
    ))?;
    progress.write(format!("Search required {}", total_stats))?;
    Ok(ret)
}
