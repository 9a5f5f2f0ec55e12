//! ALU implementation

use crate::instruction::Instruction;

/// Performs an atomic ALU operation.
/// Everything is unsigned 16-bit with wraparound
pub fn alu(inst: &Instruction, op1: u16, op2: u16) -> u16 {
    match inst.controls.alu_op {
        ALUOp::ADD => op1.wrapping_add(op2),
        ALUOp::SUB => op1.wrapping_sub(op2),
        ALUOp::AND => op1 & op2,
        ALUOp::OR => op1 | op2,
        ALUOp::SLT => (op1 < op2) as u16,
        ALUOp::EQ => (op1 == op2) as u16,
    }
}

/// Selector for ALU src2 input
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum ALUSrc {
    // From register
    #[default]
    REG,
    // From immediate
    IMM,
}

/// Set of ALU operations needed for E20
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum ALUOp {
    // Arithmetic
    #[default]
    ADD,
    SUB,
    // Logical
    AND,
    OR,
    // Set (unsigned)
    SLT,
    // Branch
    EQ,
}
