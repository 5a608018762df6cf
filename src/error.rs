// Intcode Error Handling

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum IntcodeError {
    // Decode errors
    UnknownOpcode { opcode: i64, pc: usize },
    UnknownParameterMode { mode: i64, pc: usize },

    // Execution errors
    InvalidAddress(i64),
    MemoryExhausted(i64),
    ImmediateWriteTarget { mnemonic: &'static str, pc: usize },
    StepLimitExceeded(u64),

    // Network errors
    EmptyNetwork,
    AmplifierStalled(usize),
    AmplifierSilent(usize),
    NetworkDeadlock,

    // Program text and configuration errors
    InvalidProgram(String, usize), // token, index
    ConfigError(String),

    // IO errors
    IOError(String),
}

impl fmt::Display for IntcodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IntcodeError::UnknownOpcode { opcode, pc } => {
                write!(f, "Unknown opcode {} at pc {}", opcode, pc)
            }
            IntcodeError::UnknownParameterMode { mode, pc } => {
                write!(f, "Unknown parameter mode {} at pc {}", mode, pc)
            }
            IntcodeError::InvalidAddress(address) => {
                write!(f, "Invalid memory address {}", address)
            }
            IntcodeError::MemoryExhausted(address) => {
                write!(f, "Cannot grow memory to reach address {}", address)
            }
            IntcodeError::ImmediateWriteTarget { mnemonic, pc } => {
                write!(
                    f,
                    "{} at pc {} uses an immediate parameter as its write target",
                    mnemonic, pc
                )
            }
            IntcodeError::StepLimitExceeded(limit) => {
                write!(f, "Step limit of {} instructions exceeded", limit)
            }
            IntcodeError::EmptyNetwork => {
                write!(f, "Amplifier network needs at least one phase setting")
            }
            IntcodeError::AmplifierStalled(index) => {
                write!(f, "Amplifier {} is waiting for input that never arrives", index)
            }
            IntcodeError::AmplifierSilent(index) => {
                write!(f, "Amplifier {} halted without producing output", index)
            }
            IntcodeError::NetworkDeadlock => {
                write!(f, "Amplifier ring deadlocked: every machine is starved for input")
            }
            IntcodeError::InvalidProgram(token, index) => {
                write!(f, "Invalid program value '{}' at index {}", token, index)
            }
            IntcodeError::ConfigError(msg) => {
                write!(f, "Configuration error: {}", msg)
            }
            IntcodeError::IOError(msg) => {
                write!(f, "IO error: {}", msg)
            }
        }
    }
}

impl std::error::Error for IntcodeError {}

impl From<std::io::Error> for IntcodeError {
    fn from(e: std::io::Error) -> Self {
        IntcodeError::IOError(e.to_string())
    }
}

impl From<toml::de::Error> for IntcodeError {
    fn from(e: toml::de::Error) -> Self {
        IntcodeError::ConfigError(e.to_string())
    }
}
