//! Command line interface

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use podem::atpg::{generate_test_patterns, FillPolicy, PodemConfig, SimMode};
use podem::circuit::stats::stats;
use podem::circuit::Circuit;
use podem::io::{
    read_circuit_file, read_fault_file, read_input_pattern_file, write_pattern_file,
    write_test_pattern_file,
};
use podem::sim::{simulate, Fault};

/// Print an error and exit
fn fail(err: String) -> ! {
    println!("Error: {}", err);
    std::process::exit(1);
}

fn read_circuit(path: &PathBuf) -> Circuit {
    read_circuit_file(path).unwrap_or_else(|e| fail(e))
}

/// Command line arguments
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Command line arguments
#[derive(Subcommand)]
pub enum Commands {
    /// Show statistics about a circuit
    ///
    /// Will print statistics on the number of inputs, outputs, gates and faults in the circuit.
    #[clap()]
    Show(ShowArgs),

    /// Simulate a circuit without faults
    ///
    /// Input vectors have one character per primary input, 0, 1 or X:
    ///    0011X
    ///    1X100
    /// One line of primary output values is written for each vector.
    #[clap(alias = "sim")]
    Simulate(SimulateArgs),

    /// Test pattern generation for a circuit using PODEM
    ///
    /// Generate a pattern for each stuck-at fault in the fault list, or for every
    /// possible stuck-at fault if no list is given. Faults are listed as the name of
    /// the signal on a line, followed by the fault type (0 or 1) on the next line.
    /// Signals with multiple fanouts are split into branches named after the signal:
    /// a signal x with two fanouts has branches x_0 and x_1.
    #[clap()]
    Atpg(AtpgArgs),
}

/// Command arguments for circuit informations
#[derive(Args)]
pub struct ShowArgs {
    /// Circuit to show
    file: PathBuf,
}

impl ShowArgs {
    pub fn run(&self) {
        let circuit = read_circuit(&self.file);
        println!("Circuit stats:\n{}\n\n", stats(&circuit));
    }
}

/// Command arguments for simulation
#[derive(Args)]
pub struct SimulateArgs {
    /// Circuit to simulate
    circuit: PathBuf,

    /// Input patterns file
    #[arg(short = 'i', long)]
    input: PathBuf,

    /// Output file for output patterns
    #[arg(short = 'o', long)]
    output: PathBuf,
}

impl SimulateArgs {
    pub fn run(&self) {
        let mut circuit = read_circuit(&self.circuit);
        let input_values = read_input_pattern_file(&self.input).unwrap_or_else(|e| fail(e));
        let mut output_values = Vec::new();
        for (i, pattern) in input_values.iter().enumerate() {
            if pattern.len() != circuit.nb_inputs() {
                fail(format!(
                    "Input vector {} has {} values, but the circuit has {} inputs",
                    i + 1,
                    pattern.len(),
                    circuit.nb_inputs()
                ));
            }
            output_values.push(simulate(&mut circuit, pattern));
        }
        write_pattern_file(&self.output, &output_values).unwrap_or_else(|e| fail(e));
    }
}

/// Value for the inputs left unassigned by a test
#[derive(Clone, Copy, ValueEnum)]
pub enum FillArg {
    /// Keep them as X
    X,
    /// Set them to 0
    Zero,
    /// Set them to 1
    One,
    /// Set them randomly
    Random,
}

impl From<FillArg> for FillPolicy {
    fn from(f: FillArg) -> FillPolicy {
        match f {
            FillArg::X => FillPolicy::X,
            FillArg::Zero => FillPolicy::Zero,
            FillArg::One => FillPolicy::One,
            FillArg::Random => FillPolicy::Random,
        }
    }
}

/// Command arguments for test pattern generation
#[derive(Args)]
pub struct AtpgArgs {
    /// Circuit to write test patterns for
    circuit: PathBuf,

    /// Output file for test patterns
    #[arg(short = 'o', long)]
    output: PathBuf,

    /// Faults to generate tests for; all stuck-at faults by default
    #[arg(short = 'f', long)]
    faults: Option<PathBuf>,

    /// Value for the inputs left unassigned by a test
    #[arg(long, value_enum, default_value_t = FillArg::X)]
    fill: FillArg,

    /// Random seed for the random fill
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Simulate the whole circuit after each decision, instead of event-driven simulation
    #[arg(long)]
    full_sim: bool,

    /// Check each test found by simulating it again
    #[arg(long)]
    check: bool,

    /// Print the result for each fault
    #[arg(short = 'v', long)]
    verbose: bool,
}

impl AtpgArgs {
    pub fn run(&self) {
        let mut circuit = read_circuit(&self.circuit);
        let faults = match &self.faults {
            Some(path) => read_fault_file(path, &circuit).unwrap_or_else(|e| fail(e)),
            None => Fault::all(&circuit),
        };
        let config = PodemConfig {
            sim_mode: if self.full_sim {
                SimMode::Full
            } else {
                SimMode::EventDriven
            },
            fill: self.fill.into(),
            seed: self.seed,
            check: self.check,
            verbose: self.verbose,
        };
        let patterns = generate_test_patterns(&mut circuit, &faults, &config)
            .unwrap_or_else(|e| fail(e.to_string()));
        write_test_pattern_file(&self.output, &patterns).unwrap_or_else(|e| fail(e));
    }
}
