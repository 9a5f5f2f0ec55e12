//! Decoding helper functions.
//!
//! Bit layout of an E20 word:
//! ```text
//! | 15..13 | 12..10 | 9..7 | 6..4   | 3..0   |
//! | opcode | regA   | regB | regDst | funct4 |  R
//! | opcode | regA   | regB | imm7           |  I
//! | opcode | imm13                          |  J
//! ```

use super::Attributes;
use super::Controls;
use super::Format;
use super::Function;
use super::Instruction;
use super::Opcode;

/// The link register written by JAL
pub const LINK_REGISTER: u16 = 7;

/// Sign-extends a 7-bit immediate to 16 bits
pub fn sign_extend_imm7(imm: u16) -> u16 {
    (((imm << 9) as i16) >> 9) as u16
}

/// Determines an instruction's mnemonic, e.g., JAL, SLT, or LW
fn get_function(inst: &Instruction) -> Function {
    use Function::*;
    match inst.opcode {
        Opcode::Op => match inst.attributes.funct4 {
            Some(0b0000) => ADD,
            Some(0b0001) => SUB,
            Some(0b0010) => OR,
            Some(0b0011) => AND,
            Some(0b0100) => SLT,
            // regB and regDst must be zero for JR
            Some(0b1000) if inst.raw_inst & 0x03f0 == 0 => JR,
            _ => NOP,
        },
        Opcode::Addi => ADDI,
        Opcode::J => J,
        Opcode::Jal => JAL,
        Opcode::Load => LW,
        Opcode::Store => SW,
        Opcode::Jeq => JEQ,
        Opcode::Slti => SLTI,
    }
}

pub fn get_controls(inst: &Instruction) -> Controls {
    use Function::*;

    use crate::alu::ALUOp;
    use crate::alu::ALUSrc;

    Controls {
        branch: matches!(inst.function, J | JAL | JR | JEQ),
        mem_read: matches!(inst.function, LW),
        mem_write: matches!(inst.function, SW),
        reg_write: matches!(
            inst.function,
            ADD | SUB | OR | AND | SLT | ADDI | SLTI | LW | JAL
        ),
        alu_op: match inst.function {
            ADD | ADDI | LW | SW => ALUOp::ADD,
            SUB => ALUOp::SUB,
            OR => ALUOp::OR,
            AND => ALUOp::AND,
            SLT | SLTI => ALUOp::SLT,
            JEQ => ALUOp::EQ,
            JR | NOP | J | JAL => ALUOp::default(),
        },
        alu_src: match inst.function {
            ADDI | SLTI | LW | SW => ALUSrc::IMM,
            _ => ALUSrc::REG,
        },
    }
}

/// Returns the opcode from a raw instruction
pub fn raw_to_opcode(raw_inst: u16) -> Opcode {
    match get_opcode(raw_inst) {
        0b000 => Opcode::Op,
        0b001 => Opcode::Addi,
        0b010 => Opcode::J,
        0b011 => Opcode::Jal,
        0b100 => Opcode::Load,
        0b101 => Opcode::Store,
        0b110 => Opcode::Jeq,
        _ => Opcode::Slti,
    }
}

/// Returns the instruction format from an opcode
pub fn opcode_to_format(opcode: Opcode) -> Format {
    match opcode {
        Opcode::Op => Format::R,
        Opcode::J | Opcode::Jal => Format::J,
        Opcode::Addi
        | Opcode::Load
        | Opcode::Store
        | Opcode::Jeq
        | Opcode::Slti => Format::I,
    }
}

/// Parses other stuff
pub fn parse(inst: &mut Instruction) {
    inst.attributes = match inst.format {
        Format::R => parse_format_r(inst.raw_inst),
        Format::I => parse_format_i(inst.raw_inst),
        Format::J => parse_format_j(inst.raw_inst),
    };
    inst.function = get_function(inst);
    inst.attributes.rd = get_destination(inst);
    inst.controls = get_controls(inst);
}

/// The register written back, if any
fn get_destination(inst: &Instruction) -> Option<u16> {
    use Function::*;
    match inst.function {
        ADD | SUB | OR | AND | SLT => Some(get_reg_dst(inst.raw_inst)),
        ADDI | SLTI | LW => Some(get_reg_b(inst.raw_inst)),
        JAL => Some(LINK_REGISTER),
        _ => None,
    }
}

/// Parses attributes for an R-type instruction
fn parse_format_r(raw_inst: u16) -> Attributes {
    Attributes {
        rs1: Some(get_reg_a(raw_inst)),
        rs2: Some(get_reg_b(raw_inst)),
        rd: None, // TBD
        funct4: Some(get_funct4(raw_inst)),
        imm: None,
    }
}

/// Parses attributes for an I-type instruction
fn parse_format_i(raw_inst: u16) -> Attributes {
    Attributes {
        rs1: Some(get_reg_a(raw_inst)),
        rs2: Some(get_reg_b(raw_inst)),
        rd: None, // TBD
        funct4: None,
        imm: Some(sign_extend_imm7(raw_inst & 0x7f)),
    }
}

/// Parses attributes for a J-type instruction
fn parse_format_j(raw_inst: u16) -> Attributes {
    Attributes {
        rs1: None,
        rs2: None,
        rd: None,
        funct4: None,
        imm: Some(raw_inst & 0x1fff),
    }
}

/// Extracts opcode from a raw instruction
fn get_opcode(raw_inst: u16) -> u16 {
    raw_inst >> 13
}

/// Extracts the regA field from a raw instruction
fn get_reg_a(raw_inst: u16) -> u16 {
    (raw_inst >> 10) & 0x7
}

/// Extracts the regB field from a raw instruction
fn get_reg_b(raw_inst: u16) -> u16 {
    (raw_inst >> 7) & 0x7
}

/// Extracts the regDst field from a raw instruction
fn get_reg_dst(raw_inst: u16) -> u16 {
    (raw_inst >> 4) & 0x7
}

/// Extracts the low 4 bits selecting a three-register instruction
fn get_funct4(raw_inst: u16) -> u16 {
    raw_inst & 0xf
}
