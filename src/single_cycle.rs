//! Single cycle implementation

use crate::cpu::CPUState;
use crate::cpu::Status;
use crate::error::ExecutionError;
use crate::error::SimulatorResult;
use crate::instruction::Function;
use crate::memory::LogSink;
use crate::memory::StorageInterface;
use crate::stages_simple::*;

/// Runs until a jump to itself.
/// Returns the halting PC address
pub fn run(
    cpu: &mut CPUState,
    mem: &mut impl StorageInterface,
    sink: &mut impl LogSink,
) -> SimulatorResult<u16> {
    loop {
        if let Some(limit) = cpu.policy.max_instructions {
            if cpu.history.inst_count >= limit {
                return Err(ExecutionError::ExecutionLimitReached(limit).into());
            }
        }

        let status = step(cpu, mem, sink)?;

        // One logical clock tick per instruction
        cpu.update_cycle_count(1);

        if status == Status::Halted {
            return Ok(cpu.pc.read());
        }
    }
}

/// Executes exactly one instruction
pub fn step(
    cpu: &mut CPUState,
    mem: &mut impl StorageInterface,
    sink: &mut impl LogSink,
) -> SimulatorResult<Status> {
    let pc = cpu.pc.read();

    tracing::debug!(pc, clock = cpu.history.cycle_count, "fetching");

    // IF
    let raw_inst = instruction_fetch(pc, mem);
    // ID
    let inst = instruction_decode(raw_inst);
    let (op1, op2) = register_read(&inst, cpu);
    // EX
    let exec_result = execute(cpu, &inst, op1, op2);
    // MEM
    let wb_result =
        memory_access(pc, &inst, cpu, mem, sink, exec_result, op2)?;
    // WB
    write_back(&inst, cpu, wb_result);
    cpu.clear_zero_register();

    let new_pc = next_pc(pc, &inst, op1, exec_result);
    cpu.pc.write(new_pc);

    // A jump to itself is the halt idiom
    if inst.function == Function::J && new_pc == pc {
        tracing::debug!(pc, "halted");
        return Ok(Status::Halted);
    }

    if new_pc != pc.wrapping_add(1) {
        tracing::debug!(from = pc, to = new_pc, "branching");
    }
    Ok(Status::Running)
}
