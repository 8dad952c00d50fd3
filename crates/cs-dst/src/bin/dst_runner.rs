//! Command-line runner for contracted stack simulations.
//!
//! ```bash
//! cs-dst-runner --seed 42 --iterations 100 --workload pop-heavy
//! cs-dst-runner --contracts
//! ```
//!
//! Exit code 0 when every contract held, 1 on a violation, 2 on bad input.

use std::process::ExitCode;

use clap::Parser;
use cs_dst::{
    env_u64, get_or_generate_seed, simulate, ConfigError, DstEnv, EnvError, SimulationConfig,
    WorkloadConfig, DST_ITERATIONS_VAR, DST_SEED_VAR,
};
use serde::Serialize;
use thiserror::Error;

const ITERATIONS_DEFAULT: u64 = 100;

#[derive(Parser, Debug)]
#[command(
    name = "cs-dst-runner",
    version,
    about = "Deterministic simulation of the contracted stack"
)]
struct Args {
    /// Base seed; iteration i uses seed + i. Defaults to DST_SEED or random.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    seed: Option<u64>,

    /// Number of simulations. Defaults to DST_ITERATIONS or 100.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    iterations: Option<u64>,

    /// Operations per simulation.
    #[arg(long, default_value_t = 1_000, value_parser = clap::value_parser!(u64).range(1..))]
    steps: u64,

    /// Replay the history through the property checker every N steps.
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u64).range(1..))]
    check_interval: u64,

    /// Workload preset: default, balanced, push-heavy, pop-heavy.
    #[arg(long, default_value = "default")]
    workload: String,

    /// Print the stack's contracts and exit.
    #[arg(long)]
    contracts: bool,

    /// Emit a JSON summary instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Error)]
enum RunnerError {
    #[error(transparent)]
    Env(#[from] EnvError),

    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),

    #[error("unknown workload {0:?} (expected default, balanced, push-heavy or pop-heavy)")]
    UnknownWorkload(String),

    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct RunSummary {
    base_seed: u64,
    iterations: u64,
    config: SimulationConfig,
    workload: WorkloadConfig,
    passed: bool,
    simulations_passed: u64,
    underflows_total: u64,
    depth_max: usize,
    failure: Option<String>,
    failing_seed: Option<u64>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if args.contracts {
        print!("{}", cs_stack::contracts::render_all());
        return ExitCode::SUCCESS;
    }

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(2)
        }
    }
}

fn run(args: &Args) -> Result<bool, RunnerError> {
    let workload = WorkloadConfig::from_name(&args.workload)
        .ok_or_else(|| RunnerError::UnknownWorkload(args.workload.clone()))?;

    let base_seed = match args.seed {
        Some(seed) => seed,
        None => match env_u64(DST_SEED_VAR)? {
            Some(seed) => seed,
            None => get_or_generate_seed(),
        },
    };
    let iterations = match args.iterations {
        Some(n) => n,
        None => env_u64(DST_ITERATIONS_VAR)?.unwrap_or(ITERATIONS_DEFAULT),
    };
    let config = SimulationConfig {
        steps: args.steps,
        check_interval: args.check_interval,
    };
    config.validate()?;

    let mut summary = RunSummary {
        base_seed,
        iterations,
        config: config.clone(),
        workload: workload.clone(),
        passed: true,
        simulations_passed: 0,
        underflows_total: 0,
        depth_max: 0,
        failure: None,
        failing_seed: None,
    };

    for i in 0..iterations {
        let seed = base_seed.wrapping_add(i).max(1);
        let mut env = DstEnv::with_workload(seed, workload.clone())?;
        match simulate(&mut env, &config) {
            Ok(report) => {
                summary.simulations_passed += 1;
                summary.underflows_total += report.underflows_count;
                summary.depth_max = summary.depth_max.max(report.depth_max);
            }
            Err(e) => {
                summary.passed = false;
                summary.failing_seed = Some(e.seed());
                summary.failure = Some(e.to_string());
                break;
            }
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_text(&summary);
    }

    Ok(summary.passed)
}

fn print_text(summary: &RunSummary) {
    println!(
        "DST_SEED={} iterations={} steps={}",
        summary.base_seed, summary.iterations, summary.config.steps
    );
    println!(
        "{}/{} simulations passed, {} underflows, max depth {}",
        summary.simulations_passed, summary.iterations, summary.underflows_total, summary.depth_max
    );

    match (&summary.failure, summary.failing_seed) {
        (Some(failure), Some(seed)) => {
            println!("[FAIL] {}", failure);
            println!("Reproduce with: DST_SEED={} DST_ITERATIONS=1", seed);
        }
        _ => println!("[PASS] all contracts held"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(flags: &[&str]) -> Args {
        let argv = std::iter::once("cs-dst-runner").chain(flags.iter().copied());
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_run_passes() {
        let args = args(&["--seed", "5", "--iterations", "2", "--steps", "20", "--json"]);
        assert!(run(&args).unwrap());
    }

    #[test]
    fn test_run_every_preset() {
        for name in ["default", "balanced", "push-heavy", "pop-heavy"] {
            let args = args(&[
                "--seed", "9", "--iterations", "1", "--steps", "50", "--workload", name,
            ]);
            assert!(run(&args).unwrap(), "{}", name);
        }
    }

    #[test]
    fn test_unknown_workload() {
        let args = args(&["--seed", "5", "--workload", "chaos"]);
        let err = run(&args).unwrap_err();
        assert!(matches!(err, RunnerError::UnknownWorkload(ref name) if name == "chaos"));
    }

    #[test]
    fn test_zero_values_rejected_by_parser() {
        for flag in ["--check-interval", "--steps", "--iterations", "--seed"] {
            let argv = ["cs-dst-runner", flag, "0"];
            assert!(Args::try_parse_from(argv).is_err(), "{} 0 accepted", flag);
        }
    }

    #[test]
    fn test_zero_check_interval_is_input_error() {
        let args = Args {
            check_interval: 0,
            ..args(&["--seed", "5", "--iterations", "1"])
        };
        let err = run(&args).unwrap_err();
        assert!(matches!(err, RunnerError::Config(ConfigError::ZeroCheckInterval)));
    }

    #[test]
    fn test_defaults() {
        let args = args(&[]);
        assert_eq!(args.steps, 1_000);
        assert_eq!(args.check_interval, 50);
        assert_eq!(args.workload, "default");
        assert!(args.seed.is_none());
        assert!(!args.contracts);
    }
}
