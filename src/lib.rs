pub mod alu;
pub mod config;
pub mod cpu;
pub mod flags;
pub mod instruction;
pub mod loader;
pub mod memory;
pub mod run_wrapper;

pub mod stages_simple;

pub mod single_cycle;

pub mod error;
