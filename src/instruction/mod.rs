//! Instruction representation

use crate::alu::ALUOp;
use crate::alu::ALUSrc;

pub mod decode_helper;

/// NOP: ADD $0, $0, $0
pub(crate) const NOP: u16 = 0x0000;

/// Wrapped instruction
#[derive(Clone, Copy, Debug)]
pub struct Instruction {
    /// Raw representation
    pub raw_inst: u16,
    /// Opcode
    pub opcode: Opcode,
    /// Format
    pub format: Format,
    /// Function
    pub function: Function,
    /// Subfields
    pub attributes: Attributes,
    /// Control signals
    pub controls: Controls,
}

impl Instruction {
    /// Every 16-bit word decodes to something
    pub fn new(raw_inst: u16) -> Self {
        let opcode = decode_helper::raw_to_opcode(raw_inst);
        let format = decode_helper::opcode_to_format(opcode);
        let attributes = Attributes::default();
        let function = Function::default();
        let controls = Controls::default();

        let mut inst =
            Self { raw_inst, opcode, format, function, attributes, controls };

        decode_helper::parse(&mut inst);
        inst
    }
}

impl Default for Instruction {
    fn default() -> Self {
        Self::new(NOP)
    }
}

/// E20 opcode: the top 3 bits
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Opcode {
    /// 000, three register operands
    Op,
    Addi,
    J,
    Jal,
    Load,
    Store,
    Jeq,
    Slti,
}

/// E20 instruction format
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Format {
    /// regA, regB, regDst, 4-bit function
    R,
    /// regA, regB, 7-bit signed immediate
    I,
    /// 13-bit address
    J,
}

/// E20 function (instruction?)
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum Function {
    #[default]
    ADD,
    SUB,
    OR,
    AND,
    SLT,
    JR,
    /// Any other pattern under opcode 000
    NOP,
    J,
    JAL,
    ADDI,
    SLTI,
    LW,
    SW,
    JEQ,
}

/// Instruction attributes
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Attributes {
    // Take all you need
    pub rs1: Option<u16>,
    pub rs2: Option<u16>,
    pub rd: Option<u16>,
    /// Selects the operation under opcode 000
    pub funct4: Option<u16>,
    pub imm: Option<u16>,
}

/// Control signals
#[derive(Clone, Copy, Debug, Default)]
pub struct Controls {
    /// Any instruction that may redirect the pc
    pub branch: bool,
    pub mem_read: bool,
    pub mem_write: bool,
    pub reg_write: bool,
    pub alu_op: ALUOp,
    pub alu_src: ALUSrc,
}
