use std::io;
use std::process;

use sim_lib::config::CacheConfig;
use sim_lib::cpu::CPUPolicy;
use sim_lib::error::SimulatorResult;
use sim_lib::flags::SimArgs;
use sim_lib::run_wrapper;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = SimArgs::from_env_or_exit();
    init_tracing(args.verbose);

    if let Err(e) = run_sim(args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Diagnostics go to stderr; stdout carries only the cache log
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run_sim(args: SimArgs) -> SimulatorResult<()> {
    let policy = CPUPolicy { max_instructions: args.limit };
    let config = args.cache.unwrap_or_else(CacheConfig::default);

    let out = io::BufWriter::new(io::stdout().lock());
    run_wrapper::run(&args.program, &config, policy, out)?;

    Ok(())
}
