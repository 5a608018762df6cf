//! Intcode virtual machine
//!
//! A small register machine executing integer programs against a growable
//! memory tape, plus amplifier networks that wire several machines together
//! as a chain or a feedback ring and schedule them cooperatively.

pub mod amplifier;
pub mod config;
pub mod disassembler;
pub mod error;
pub mod instruction;
pub mod machine;
pub mod memory;
pub mod program;

pub use amplifier::{find_max_signal, run_network, Amplifier, AmplifierNetwork, Topology};
pub use error::IntcodeError;
pub use machine::{ExecutionResult, Machine, MachineState};
pub use program::Program;

#[cfg(test)]
mod instruction_tests;
