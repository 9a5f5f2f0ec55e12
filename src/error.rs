use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the simulator
#[derive(Error, Debug)]
pub enum SimulatorError {
    #[error("Failed to load program: {0}")]
    LoadError(#[from] LoadError),

    #[error("Invalid cache config: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("CPU execution error: {0}")]
    ExecutionError(#[from] ExecutionError),

    #[error("Memory error: {0}")]
    MemoryError(#[from] MemoryError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors related to reading a machine code file
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Can't open file '{0}': {1}")]
    FileReadError(PathBuf, #[source] std::io::Error),

    #[error("Can't parse line {line}: {content}")]
    ParseError { line: usize, content: String },

    #[error("Memory addresses encountered out of sequence: {0}")]
    OutOfSequence(usize),

    #[error("Program too big for memory: address {0}")]
    ProgramTooBig(usize),
}

/// Errors related to the cache configuration
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("expected 3 or 6 comma-separated values, got {0}")]
    InvalidArity(usize),

    #[error("not a number: '{0}'")]
    InvalidNumber(String),

    #[error("L{level} {name} must be non-zero")]
    ZeroParameter { level: usize, name: &'static str },

    #[error(
        "L{level} size {size} is not divisible by \
         associativity {associativity} * blocksize {block_size}"
    )]
    Indivisible {
        level: usize,
        size: usize,
        associativity: usize,
        block_size: usize,
    },

    #[error("L{level} size {size} exceeds the maximum of {max}")]
    TooLarge { level: usize, size: usize, max: usize },
}

/// Errors related to CPU execution
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Execution limit reached: {0} instructions")]
    ExecutionLimitReached(u64),
}

/// Errors related to memory operations
#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("Cache inconsistency detected at level {0}: {1}")]
    CacheInconsistency(usize, String),
}

/// Type alias for Result with SimulatorError
pub type SimulatorResult<T> = Result<T, SimulatorError>;
