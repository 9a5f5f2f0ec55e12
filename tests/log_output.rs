use std::io::Write;

use pretty_assertions::assert_eq;
use sim_lib::config::CacheConfig;
use sim_lib::cpu::CPUPolicy;
use sim_lib::error::ConfigError;
use sim_lib::error::LoadError;
use sim_lib::error::SimulatorError;
use sim_lib::memory::cache::CachePolicy;
use sim_lib::memory::inclusive::InclusiveCache;
use sim_lib::memory::ram::Ram;
use sim_lib::memory::CacheEvent;
use sim_lib::memory::StorageInterface;
use sim_lib::run_wrapper;

/// Machine code text for a list of words
fn machine_code(words: &[u16]) -> String {
    words
        .iter()
        .enumerate()
        .map(|(address, word)| format!("ram[{}] = 16'b{:016b};\n", address, word))
        .collect()
}

fn imm(opcode: u16, a: u16, b: u16, imm: i16) -> u16 {
    (opcode << 13) | (a << 10) | (b << 7) | (imm as u16 & 0x7f)
}

fn jump(address: u16) -> u16 {
    (0b010 << 13) | address
}

fn run_to_string(words: &[u16], config: &str) -> String {
    let config: CacheConfig = config.parse().unwrap();
    let mut out = Vec::new();
    run_wrapper::run_image(words, &config, CPUPolicy::default(), &mut out)
        .unwrap();
    String::from_utf8(out).unwrap()
}

/// Loads four cells of an array twice, then stores to them
fn array_program() -> Vec<u16> {
    vec![
        imm(0b001, 0, 1, 20), // addi $1, $0, 20
        imm(0b100, 1, 2, 0),  // lw $2, 0($1)
        imm(0b100, 1, 2, 1),  // lw $2, 1($1)
        imm(0b100, 1, 2, 8),  // lw $2, 8($1)
        imm(0b100, 1, 2, 0),  // lw $2, 0($1)
        imm(0b101, 1, 2, 0),  // sw $2, 0($1)
        imm(0b101, 1, 2, 40), // sw $2, 40($1)
        jump(7),
    ]
}

#[test]
fn one_level_log() {
    let text = run_to_string(&array_program(), "8,1,2");
    let expected = "\
Cache L1 has size 8, associativity 1, blocksize 2, rows 4
L1 MISS  pc:    1\taddr:   20\trow:   2
L1 HIT   pc:    2\taddr:   21\trow:   2
L1 MISS  pc:    3\taddr:   28\trow:   2
L1 MISS  pc:    4\taddr:   20\trow:   2
L1 SW    pc:    5\taddr:   20\trow:   2
L1 SW    pc:    6\taddr:   60\trow:   2
";
    assert_eq!(text, expected);
}

#[test]
fn two_level_log() {
    let text = run_to_string(&array_program(), "8,1,2,32,2,4");
    let expected = "\
Cache L1 has size 8, associativity 1, blocksize 2, rows 4
Cache L2 has size 32, associativity 2, blocksize 4, rows 4
L1 MISS  pc:    1\taddr:   20\trow:   2
L2 MISS  pc:    1\taddr:   20\trow:   1
L1 HIT   pc:    2\taddr:   21\trow:   2
L1 MISS  pc:    3\taddr:   28\trow:   2
L2 MISS  pc:    3\taddr:   28\trow:   3
L1 MISS  pc:    4\taddr:   20\trow:   2
L2 HIT   pc:    4\taddr:   20\trow:   1
L1 SW    pc:    5\taddr:   20\trow:   2
L2 SW    pc:    5\taddr:   20\trow:   1
L1 SW    pc:    6\taddr:   60\trow:   2
L2 SW    pc:    6\taddr:   60\trow:   3
";
    assert_eq!(text, expected);
}

#[test]
fn no_cache_prints_nothing() {
    let config = CacheConfig::default();
    let mut out = Vec::new();
    let stats = run_wrapper::run_image(
        &array_program(),
        &config,
        CPUPolicy::default(),
        &mut out,
    )
    .unwrap();
    assert!(out.is_empty());
    assert_eq!(stats.exit_pc, 7);
    assert_eq!(stats.cpu.inst_count, 8);
    assert!(stats.caches.is_empty());
}

#[test]
fn runs_are_deterministic() {
    let first = run_to_string(&array_program(), "16,2,2,64,4,4");
    let second = run_to_string(&array_program(), "16,2,2,64,4,4");
    assert_eq!(first, second);
}

#[test]
fn runs_program_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(machine_code(&array_program()).as_bytes())
        .unwrap();

    let config: CacheConfig = "8,1,2".parse().unwrap();
    let mut out = Vec::new();
    let stats = run_wrapper::run(
        file.path(),
        &config,
        CPUPolicy::default(),
        &mut out,
    )
    .unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        run_to_string(&array_program(), "8,1,2")
    );
    assert_eq!(stats.caches[0].num_hit, 2);
    assert_eq!(stats.caches[0].num_miss, 4);
    assert_eq!(stats.cpu.load_count, 4);
    assert_eq!(stats.cpu.store_count, 2);
}

#[test]
fn halts_on_self_jump() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(machine_code(&[0, 0, jump(2)]).as_bytes())
        .unwrap();
    let stats = run_wrapper::run(
        file.path(),
        &CacheConfig::default(),
        CPUPolicy::default(),
        Vec::new(),
    )
    .unwrap();
    assert_eq!(stats.exit_pc, 2);
    assert_eq!(stats.cpu.inst_count, 3);
}

#[test]
fn missing_file_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = run_wrapper::run(
        &dir.path().join("missing.bin"),
        &CacheConfig::default(),
        CPUPolicy::default(),
        Vec::new(),
    );
    assert!(matches!(
        result,
        Err(SimulatorError::LoadError(LoadError::FileReadError(..)))
    ));
}

#[test]
fn config_errors_are_reported_before_running() {
    assert_eq!(
        "64,2,8,1".parse::<CacheConfig>().unwrap_err(),
        ConfigError::InvalidArity(4)
    );
    let err = "64,3,8".parse::<CacheConfig>().unwrap_err();
    assert_eq!(
        err.to_string(),
        "L1 size 64 is not divisible by associativity 3 * blocksize 8"
    );
}

#[test]
fn lru_keeps_recently_used_block() {
    // A, B, A, C on a single two-way row evicts B
    let mut mem =
        InclusiveCache::make(vec![CachePolicy::make(4, 2, 2)], Ram::make());
    let mut log: Vec<CacheEvent> = Vec::new();
    for (clock, address) in [0u16, 2, 0, 4].into_iter().enumerate() {
        mem.load(address, 0, clock as u64, &mut log).unwrap();
    }
    assert!(mem.caches[0].is_in_cache(0));
    assert!(!mem.caches[0].is_in_cache(2));
    assert!(mem.caches[0].is_in_cache(4));
    mem.verify_capacity().unwrap();
}
