//! Replay a dumped lockstep trace with per-step output.
//!
//! Usage: cargo run --features harness --bin replay -- <trace.json[.gz]>

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use lazytree::lockstep;
use lazytree::op::{Op, Trace};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Trace written by a failing `lazytree` run
    trace: PathBuf,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let trace: Trace<i32> = match Trace::load(&cli.trace) {
        Ok(trace) => trace,
        Err(e) => {
            eprintln!("{}: {}", cli.trace.display(), e);
            return ExitCode::FAILURE;
        }
    };

    eprintln!("Input: {} values, {} ops", trace.values.len(), trace.ops.len());
    eprintln!("Initial: {:?}", trace.values);

    let outcome = lockstep::run(&trace, |step| {
        eprintln!("Op {}: {}", step.index, step.op);
        match (step.op, step.result) {
            (Op::Query { .. }, Some(result)) => eprintln!("  Result: {}", result),
            _ => eprintln!("  After: {:?}", step.data),
        }
    });

    return match outcome {
        Ok(report) => {
            eprintln!("\nAll checks passed! ({} updates, {} queries)", report.updates, report.queries);
            ExitCode::SUCCESS
        }
        Err(divergence) => {
            eprintln!("\nDivergence at {}", divergence);
            ExitCode::FAILURE
        }
    };
}
