//! Randomized lockstep check of `RangeTree` against the brute-force reference.
//!
//! Usage: cargo run --features harness -- --seed 42 --rounds 10
//!
//! On a mismatch the failing trace is written to `--dump` and the process
//! exits with status 1. Replay it with the `replay` binary.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use lazytree::lockstep;
use lazytree::profiling;
use lazytree::scenario::{self, Config};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Seed of the first round; later rounds use seed + round
    #[arg(long)]
    seed: Option<u64>,

    /// Number of independent traces to check
    #[arg(long, default_value_t = 1)]
    rounds: u64,

    /// Number of elements in the array
    #[arg(long, default_value_t = 3)]
    len: usize,

    /// Number of ops per trace
    #[arg(long, default_value_t = 100)]
    steps: usize,

    /// Initial values are drawn from [0, max-value]
    #[arg(long, default_value_t = 10)]
    max_value: i32,

    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    min_delta: i32,

    #[arg(long, default_value_t = 10, allow_hyphen_values = true)]
    max_delta: i32,

    /// One op in N is an update
    #[arg(long, default_value_t = 6)]
    update_odds: u32,

    /// Where to write the trace of a failing round
    #[arg(long, default_value = "lockstep-failure.json")]
    dump: PathBuf,

    /// Only print the summary
    #[arg(long, short = 'q')]
    quiet: bool,
}

impl Cli {
    fn config(&self) -> Config {
        return Config {
            len: self.len,
            steps: self.steps,
            max_value: self.max_value,
            min_delta: self.min_delta,
            max_delta: self.max_delta,
            update_odds: self.update_odds,
        };
    }
}

fn print_data(data: &[i32]) {
    let line: Vec<String> = data.iter().map(|v| v.to_string()).collect();
    println!("{}", line.join(" "));
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config();
    let seed = cli.seed.unwrap_or_else(rand::random);
    println!("seed: {}", seed);

    profiling::reset();

    for round in 0..cli.rounds {
        let round_seed = seed.wrapping_add(round);
        let trace = scenario::generate(&config, round_seed);
        tracing::debug!(round, seed = round_seed, ops = trace.ops.len(), "generated trace");

        if !cli.quiet {
            print_data(&trace.values);
        }

        let outcome = lockstep::run(&trace, |step| {
            if cli.quiet {
                return;
            }
            println!("{}", step.op);
            match step.result {
                Some(result) => println!("{} {}", result, result),
                None => print_data(step.data),
            }
        });

        if let Err(divergence) = outcome {
            println!("{}", divergence.op);
            println!("{} {}", divergence.expected, divergence.actual);
            println!("FAILED.");
            eprintln!("round {} (seed {}): {}", round, round_seed, divergence);
            match trace.save(&cli.dump) {
                Ok(()) => eprintln!("trace written to {}", cli.dump.display()),
                Err(e) => eprintln!("could not write trace: {}", e),
            }
            return ExitCode::FAILURE;
        }
    }

    println!("TESTS OK.");
    println!("{}", profiling::report());
    return ExitCode::SUCCESS;
}
