//! A simulator wrapper

use std::io::Write;
use std::path::Path;

use crate::config::CacheConfig;
use crate::cpu::CPUHistory;
use crate::cpu::CPUPolicy;
use crate::cpu::CPUState;
use crate::error::SimulatorResult;
use crate::loader;
use crate::memory::cache::CacheHistory;
use crate::memory::inclusive::InclusiveCache;
use crate::memory::ram::Ram;
use crate::memory::DiscardSink;
use crate::memory::LogSink;
use crate::memory::StorageInterface;
use crate::memory::WriterSink;
use crate::single_cycle;

/// What is left of a finished run
#[derive(Clone, Debug)]
pub struct RunStats {
    /// PC of the halting self-jump
    pub exit_pc: u16,
    pub cpu: CPUHistory,
    /// One entry per cache level, L1 first
    pub caches: Vec<CacheHistory>,
}

/// Build a fresh CPU and memory hierarchy holding the image
pub fn make_machine(
    image: &[u16],
    config: &CacheConfig,
    policy: CPUPolicy,
) -> SimulatorResult<(CPUState, InclusiveCache)> {
    let ram = Ram::from_image(image)?;
    let mem = InclusiveCache::from_config(config, ram);
    Ok((CPUState::make(policy), mem))
}

/// Run a prepared machine until it halts
pub fn simulate(
    cpu: &mut CPUState,
    mem: &mut InclusiveCache,
    sink: &mut impl LogSink,
) -> SimulatorResult<RunStats> {
    let exit_pc = single_cycle::run(cpu, mem, sink)?;

    mem.verify_capacity()?;

    let stats = RunStats {
        exit_pc,
        cpu: cpu.history,
        caches: mem.get_history(),
    };
    tracing::info!(
        pc = exit_pc,
        instructions = stats.cpu.inst_count,
        loads = stats.cpu.load_count,
        stores = stats.cpu.store_count,
        "halted"
    );
    for (k, history) in stats.caches.iter().enumerate() {
        tracing::info!(
            level = k + 1,
            hits = history.num_hit,
            misses = history.num_miss,
            miss_rate = format_args!("{:.3}", history.get_miss_rate()),
            "cache"
        );
    }
    Ok(stats)
}

/// Run simulation on the given machine code file,
/// writing the configuration report and the cache log to `out`
pub fn run<W: Write>(
    program: &Path,
    config: &CacheConfig,
    policy: CPUPolicy,
    out: W,
) -> SimulatorResult<RunStats> {
    let image = loader::load_file(program)?;
    run_image(&image, config, policy, out)
}

/// Same as `run`, for an image already in memory
pub fn run_image<W: Write>(
    image: &[u16],
    config: &CacheConfig,
    policy: CPUPolicy,
    out: W,
) -> SimulatorResult<RunStats> {
    let (mut cpu, mut mem) = make_machine(image, config, policy)?;

    let mut sink = WriterSink::new(out);
    for cache in &mem.caches {
        sink.line(cache)?;
    }

    let stats = simulate(&mut cpu, &mut mem, &mut sink)?;
    sink.flush()?;
    Ok(stats)
}

/// Run silently, keeping only the statistics
pub fn evaluate(
    image: &[u16],
    config: &CacheConfig,
    policy: CPUPolicy,
) -> SimulatorResult<RunStats> {
    let (mut cpu, mut mem) = make_machine(image, config, policy)?;
    simulate(&mut cpu, &mut mem, &mut DiscardSink)
}
