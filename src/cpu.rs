//! E20 CPU implementation

/// Number of general purpose registers
pub const NUM_REGS: usize = 8;

/// CPU state
#[derive(Clone, Copy)]
pub struct CPUState {
    /// Program counter.
    /// Kept at 16 bits; only memory indexing drops the top 3
    pub pc: Register,
    /// General purpose registers, $0 reads as zero
    pub gpr: [Register; NUM_REGS],

    /// CPU policy
    pub policy: CPUPolicy,

    /// History of execution
    pub history: CPUHistory,
}

impl CPUState {
    pub fn make(policy: CPUPolicy) -> Self {
        Self {
            pc: Register::new(0),
            gpr: [Register::new(0); NUM_REGS],
            policy,
            history: CPUHistory::default(),
        }
    }

    /// Reads a register by index
    pub fn read_reg(&self, index: u16) -> u16 {
        self.gpr[index as usize % NUM_REGS].read()
    }

    /// Writes a register by index
    pub fn write_reg(&mut self, index: u16, value: u16) {
        self.gpr[index as usize % NUM_REGS].write(value);
    }

    /// Discards whatever was written to $0
    pub fn clear_zero_register(&mut self) {
        self.gpr[0].write(0);
    }

    /// Advances the logical clock
    pub fn update_cycle_count(&mut self, value: u64) {
        self.history.cycle_count += value;
    }

    /// Increments history instruction count
    pub fn update_inst_count(&mut self, value: u64) {
        self.history.inst_count += value;
    }
}

/// Register file simulation
#[derive(Clone, Copy)]
pub struct Register {
    /// Current data in the register
    data: u16,
}

impl Register {
    pub fn new(data: u16) -> Self {
        Self { data }
    }

    /// Reads the register
    pub fn read(&self) -> u16 {
        self.data
    }

    /// Writes to register
    pub fn write(&mut self, value: u16) {
        self.data = value;
    }
}

/// Execution status after one instruction
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Status {
    Running,
    /// Reached by a jump to itself; terminal
    Halted,
}

/// CPU policy
#[derive(Clone, Copy, Default)]
pub struct CPUPolicy {
    /// Give up after this many instructions, if set
    pub max_instructions: Option<u64>,
}

/// History module
#[derive(Clone, Copy, Default, Debug)]
pub struct CPUHistory {
    /// Logical clock, one tick per instruction
    pub cycle_count: u64,
    pub inst_count: u64,
    pub load_count: u64,
    pub store_count: u64,
}
