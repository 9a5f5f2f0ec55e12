//! Primitive implementation of 5 stages

use crate::alu::{alu, ALUSrc};
use crate::cpu::CPUState;
use crate::error::SimulatorResult;
use crate::instruction::Function;
use crate::instruction::Instruction;
use crate::memory::LogSink;
use crate::memory::StorageInterface;

/// IF: Fetch the instruction from memory.
/// Fetches never go through the caches
pub fn instruction_fetch(pc: u16, mem: &mut impl StorageInterface) -> u16 {
    mem.ram().get(pc)
}

/// ID: Instruction decode
pub fn instruction_decode(raw_inst: u16) -> Instruction {
    Instruction::new(raw_inst)
}

/// ID: Register read.
/// Both operands are read before anything is written
pub fn register_read(inst: &Instruction, cpu: &CPUState) -> (u16, u16) {
    let op1 = cpu.read_reg(inst.attributes.rs1.unwrap_or(0));
    let op2 = cpu.read_reg(inst.attributes.rs2.unwrap_or(0));
    (op1, op2)
}

/// EX: Compute stuff
pub fn execute(
    cpu: &mut CPUState,
    inst: &Instruction,
    op1: u16,
    op2: u16,
) -> u16 {
    // Increment instruction count
    cpu.update_inst_count(1);

    let op2 = match inst.controls.alu_src {
        ALUSrc::REG => op2,
        ALUSrc::IMM => inst.attributes.imm.unwrap_or(0),
    };
    tracing::debug!(
        function = ?inst.function,
        op1 = format_args!("{:#06x}", op1),
        op2 = format_args!("{:#06x}", op2),
        "executing"
    );
    alu(inst, op1, op2)
}

/// MEM: Access memory.
/// `exec_result` is the effective address for LW/SW
pub fn memory_access(
    pc: u16,
    inst: &Instruction,
    cpu: &mut CPUState,
    mem: &mut impl StorageInterface,
    sink: &mut impl LogSink,
    exec_result: u16,
    op2: u16,
) -> SimulatorResult<u16> {
    let clock = cpu.history.cycle_count;

    if inst.controls.mem_read {
        cpu.history.load_count += 1;
        return mem.load(exec_result, pc, clock, sink);
    }
    if inst.controls.mem_write {
        cpu.history.store_count += 1;
        mem.store(exec_result, op2, pc, clock, sink)?;
    }

    // Special cases: JAL links the return address
    Ok(match inst.function {
        Function::JAL => pc.wrapping_add(1),
        _ => exec_result,
    })
}

/// WB: Write stuff back to the selected register
pub fn write_back(inst: &Instruction, cpu: &mut CPUState, wb_result: u16) {
    if inst.controls.reg_write {
        if let Some(rd) = inst.attributes.rd {
            cpu.write_reg(rd, wb_result);
        }
    }
}

/// Selects the pc of the next instruction
pub fn next_pc(pc: u16, inst: &Instruction, op1: u16, exec_result: u16) -> u16 {
    let imm = inst.attributes.imm.unwrap_or(0);
    if !inst.controls.branch {
        return pc.wrapping_add(1);
    }
    match inst.function {
        Function::J | Function::JAL => imm,
        Function::JR => op1,
        // Relative to the following instruction
        Function::JEQ if exec_result != 0 => {
            pc.wrapping_add(imm).wrapping_add(1)
        }
        _ => pc.wrapping_add(1),
    }
}
