use crate::error::IntcodeError;
use crate::memory::Memory;
use log::debug;
use std::fmt::{self, Display, Formatter};

/// Parameter addressing modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterMode {
    /// Operand is an absolute address
    Position,
    /// Operand is the value itself
    Immediate,
    /// Operand is an offset from the relative base
    Relative,
}

impl ParameterMode {
    pub const ALL: [ParameterMode; 3] = [
        ParameterMode::Position,
        ParameterMode::Immediate,
        ParameterMode::Relative,
    ];

    /// Parse a mode from its decimal digit
    pub fn from_digit(digit: i64) -> Option<Self> {
        match digit {
            0 => Some(ParameterMode::Position),
            1 => Some(ParameterMode::Immediate),
            2 => Some(ParameterMode::Relative),
            _ => None,
        }
    }

    pub fn digit(&self) -> i64 {
        match self {
            ParameterMode::Position => 0,
            ParameterMode::Immediate => 1,
            ParameterMode::Relative => 2,
        }
    }
}

/// A raw operand tagged with its addressing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameter {
    pub mode: ParameterMode,
    pub raw: i64,
}

impl Parameter {
    pub fn new(mode: ParameterMode, raw: i64) -> Self {
        Parameter { mode, raw }
    }

    /// Resolve the parameter for reading
    pub fn value(&self, memory: &Memory, relative_base: i64) -> Result<i64, IntcodeError> {
        match self.mode {
            ParameterMode::Position => memory.read(self.raw),
            ParameterMode::Immediate => Ok(self.raw),
            ParameterMode::Relative => memory.read(relative_base.wrapping_add(self.raw)),
        }
    }

    /// Resolve the parameter as a write target. Immediate parameters have no address.
    pub fn address(&self, relative_base: i64) -> Option<i64> {
        match self.mode {
            ParameterMode::Position => Some(self.raw),
            ParameterMode::Immediate => None,
            ParameterMode::Relative => Some(relative_base.wrapping_add(self.raw)),
        }
    }
}

impl Display for Parameter {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self.mode {
            ParameterMode::Position => write!(f, "[{}]", self.raw),
            ParameterMode::Immediate => write!(f, "#{}", self.raw),
            ParameterMode::Relative if self.raw < 0 => write!(f, "[rb{}]", self.raw),
            ParameterMode::Relative => write!(f, "[rb+{}]", self.raw),
        }
    }
}

/// Operations understood by the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Add,
    Multiply,
    Input,
    Output,
    JumpIfTrue,
    JumpIfFalse,
    LessThan,
    Equals,
    AdjustRelativeBase,
    Halt,
}

impl Opcode {
    pub const ALL: [Opcode; 10] = [
        Opcode::Add,
        Opcode::Multiply,
        Opcode::Input,
        Opcode::Output,
        Opcode::JumpIfTrue,
        Opcode::JumpIfFalse,
        Opcode::LessThan,
        Opcode::Equals,
        Opcode::AdjustRelativeBase,
        Opcode::Halt,
    ];

    /// Look up an opcode from the low two digits of an instruction word
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Opcode::Add),
            2 => Some(Opcode::Multiply),
            3 => Some(Opcode::Input),
            4 => Some(Opcode::Output),
            5 => Some(Opcode::JumpIfTrue),
            6 => Some(Opcode::JumpIfFalse),
            7 => Some(Opcode::LessThan),
            8 => Some(Opcode::Equals),
            9 => Some(Opcode::AdjustRelativeBase),
            99 => Some(Opcode::Halt),
            _ => None,
        }
    }

    pub const fn code(self) -> i64 {
        match self {
            Opcode::Add => 1,
            Opcode::Multiply => 2,
            Opcode::Input => 3,
            Opcode::Output => 4,
            Opcode::JumpIfTrue => 5,
            Opcode::JumpIfFalse => 6,
            Opcode::LessThan => 7,
            Opcode::Equals => 8,
            Opcode::AdjustRelativeBase => 9,
            Opcode::Halt => 99,
        }
    }

    /// Number of parameters following the instruction word
    pub const fn arity(self) -> usize {
        match self {
            Opcode::Add | Opcode::Multiply | Opcode::LessThan | Opcode::Equals => 3,
            Opcode::JumpIfTrue | Opcode::JumpIfFalse => 2,
            Opcode::Input | Opcode::Output | Opcode::AdjustRelativeBase => 1,
            Opcode::Halt => 0,
        }
    }

    pub const fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Add => "add",
            Opcode::Multiply => "mul",
            Opcode::Input => "in",
            Opcode::Output => "out",
            Opcode::JumpIfTrue => "jnz",
            Opcode::JumpIfFalse => "jz",
            Opcode::LessThan => "lt",
            Opcode::Equals => "eq",
            Opcode::AdjustRelativeBase => "arb",
            Opcode::Halt => "halt",
        }
    }

    /// True if the last parameter is a write target
    pub const fn writes_result(self) -> bool {
        matches!(
            self,
            Opcode::Add | Opcode::Multiply | Opcode::Input | Opcode::LessThan | Opcode::Equals
        )
    }
}

/// A decoded Intcode instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: Opcode,
    /// Exactly `opcode.arity()` parameters
    pub parameters: Vec<Parameter>,
}

impl Instruction {
    /// Decode the instruction at `pc`
    ///
    /// The word splits into the opcode (low two digits) and one mode digit per
    /// parameter, lowest first. Missing mode digits are Position and operand
    /// words past the end of memory read as 0.
    pub fn decode(memory: &Memory, pc: usize) -> Result<Self, IntcodeError> {
        let word = memory.fetch(pc);
        if word < 0 {
            return Err(IntcodeError::UnknownOpcode { opcode: word, pc });
        }

        let opcode = Opcode::from_code(word % 100).ok_or(IntcodeError::UnknownOpcode {
            opcode: word % 100,
            pc,
        })?;

        let mut modes = word / 100;
        let mut parameters = Vec::with_capacity(opcode.arity());
        for i in 0..opcode.arity() {
            let digit = modes % 10;
            modes /= 10;
            let mode = ParameterMode::from_digit(digit)
                .ok_or(IntcodeError::UnknownParameterMode { mode: digit, pc })?;
            parameters.push(Parameter::new(mode, memory.fetch(pc + 1 + i)));
        }

        if modes != 0 {
            debug!(
                "ignoring surplus mode digits in word {} at pc {}",
                word, pc
            );
        }

        Ok(Instruction { opcode, parameters })
    }

    /// Re-encode the opcode and parameter modes as an instruction word
    pub fn encode(&self) -> i64 {
        let mut scale = 100;
        let mut word = self.opcode.code();
        for parameter in &self.parameters {
            word += parameter.mode.digit() * scale;
            scale *= 10;
        }
        word
    }

    /// Size in words, including the instruction word itself
    pub fn size(&self) -> usize {
        self.parameters.len() + 1
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.opcode.mnemonic())?;
        for (i, parameter) in self.parameters.iter().enumerate() {
            let separator = if i == 0 { " " } else { ", " };
            write!(f, "{}{}", separator, parameter)?;
        }
        Ok(())
    }
}
