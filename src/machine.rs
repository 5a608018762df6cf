//! Intcode execution engine
//!
//! A `Machine` owns its memory tape, program counter, relative base register,
//! input queue and output log. It decodes and executes instructions until it
//! halts or runs out of input. Input starvation is not an error: the machine
//! parks in `MachineState::Paused` with the program counter still pointing at
//! the input instruction, and the same instruction is retried from scratch
//! the next time it runs.

use crate::error::IntcodeError;
use crate::instruction::{Instruction, Opcode, Parameter};
use crate::memory::Memory;
use log::debug;
use std::collections::VecDeque;

/// Run state of a machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MachineState {
    Running,
    /// Waiting for input, resumable
    Paused,
    /// Terminal
    Halted,
}

/// Result of executing an instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionResult {
    /// Continue execution at the next instruction
    Continue,
    /// Jump taken, PC already updated
    Jumped,
    /// Input queue empty, PC unchanged
    Paused,
    /// Halt executed
    Halted,
}

#[derive(Debug, Clone)]
pub struct Machine {
    memory: Memory,
    pc: usize,
    relative_base: i64,
    input: VecDeque<i64>,
    output: Vec<i64>,
    state: MachineState,
    /// Instructions executed so far (pause attempts excluded)
    instruction_count: u64,
    step_limit: Option<u64>,
}

impl Machine {
    /// Create a machine running a private copy of `program`
    pub fn new(program: &[i64]) -> Self {
        Machine {
            memory: Memory::new(program),
            pc: 0,
            relative_base: 0,
            input: VecDeque::new(),
            output: Vec::new(),
            state: MachineState::Running,
            instruction_count: 0,
            step_limit: None,
        }
    }

    /// Create a machine with its input queue pre-loaded
    pub fn with_input<I>(program: &[i64], input: I) -> Self
    where
        I: IntoIterator<Item = i64>,
    {
        let mut machine = Machine::new(program);
        machine.input.extend(input);
        machine
    }

    /// Limit the total number of instructions this machine may execute
    pub fn set_step_limit(&mut self, limit: Option<u64>) {
        self.step_limit = limit;
    }

    pub fn enqueue_input(&mut self, value: i64) {
        self.input.push_back(value);
    }

    /// Most recently produced output value
    pub fn latest_output(&self) -> Option<i64> {
        self.output.last().copied()
    }

    /// Full output log, oldest first
    pub fn output(&self) -> &[i64] {
        &self.output
    }

    pub fn state(&self) -> MachineState {
        self.state
    }

    pub fn is_halted(&self) -> bool {
        self.state == MachineState::Halted
    }

    pub fn is_paused(&self) -> bool {
        self.state == MachineState::Paused
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn relative_base(&self) -> i64 {
        self.relative_base
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn instruction_count(&self) -> u64 {
        self.instruction_count
    }

    /// Run until the machine pauses for input or halts
    ///
    /// A paused machine first retries its pending input instruction. Running a
    /// halted machine does nothing.
    pub fn run(&mut self) -> Result<&mut Self, IntcodeError> {
        match self.state {
            MachineState::Halted => {
                debug!("run on halted machine at pc {} ignored", self.pc);
                return Ok(self);
            }
            MachineState::Paused => {
                debug!(
                    "resuming at pc {} with {} queued input(s)",
                    self.pc,
                    self.input.len()
                );
            }
            MachineState::Running => {}
        }

        loop {
            match self.step()? {
                ExecutionResult::Continue | ExecutionResult::Jumped => {}
                ExecutionResult::Paused | ExecutionResult::Halted => return Ok(self),
            }
        }
    }

    /// Run with an instruction limit to avoid spinning forever
    pub fn run_with_limit(&mut self, max_instructions: Option<u64>) -> Result<&mut Self, IntcodeError> {
        self.step_limit = max_instructions;
        self.run()
    }

    /// Decode and execute a single instruction
    pub fn step(&mut self) -> Result<ExecutionResult, IntcodeError> {
        if self.state == MachineState::Halted {
            return Ok(ExecutionResult::Halted);
        }

        let inst = Instruction::decode(&self.memory, self.pc)?;

        let starved = inst.opcode == Opcode::Input && self.input.is_empty();
        if let Some(limit) = self.step_limit {
            if !starved && self.instruction_count >= limit {
                return Err(IntcodeError::StepLimitExceeded(limit));
            }
        }

        self.state = MachineState::Running;
        let result = self.execute(&inst)?;
        match result {
            ExecutionResult::Continue => {
                self.pc += inst.size();
                self.instruction_count += 1;
            }
            ExecutionResult::Jumped => {
                self.instruction_count += 1;
            }
            ExecutionResult::Paused => {
                debug!("in at pc {}: input queue empty, pausing", self.pc);
                self.state = MachineState::Paused;
            }
            ExecutionResult::Halted => {
                debug!(
                    "halt at pc {} after {} instructions",
                    self.pc,
                    self.instruction_count + 1
                );
                self.pc += inst.size();
                self.instruction_count += 1;
                self.state = MachineState::Halted;
            }
        }
        Ok(result)
    }

    fn execute(&mut self, inst: &Instruction) -> Result<ExecutionResult, IntcodeError> {
        let params = &inst.parameters;
        match inst.opcode {
            Opcode::Add => {
                let (left, right) = (self.read(params[0])?, self.read(params[1])?);
                debug!("add {} {}", left, right);
                self.store(inst, left.wrapping_add(right))?;
            }
            Opcode::Multiply => {
                let (left, right) = (self.read(params[0])?, self.read(params[1])?);
                debug!("mul {} {}", left, right);
                self.store(inst, left.wrapping_mul(right))?;
            }
            Opcode::Input => {
                // Input is only dequeued once the write has succeeded
                let address = self.write_address(inst)?;
                if address < 0 {
                    return Err(IntcodeError::InvalidAddress(address));
                }
                match self.input.front().copied() {
                    Some(value) => {
                        debug!("in {} -> [{}]", value, address);
                        self.memory.write(address, value)?;
                        self.input.pop_front();
                    }
                    None => return Ok(ExecutionResult::Paused),
                }
            }
            Opcode::Output => {
                let value = self.read(params[0])?;
                debug!("out {}", value);
                self.output.push(value);
            }
            Opcode::JumpIfTrue => {
                let (condition, target) = (self.read(params[0])?, self.read(params[1])?);
                debug!("jnz {} {}", condition, target);
                if condition != 0 {
                    return self.jump(target);
                }
            }
            Opcode::JumpIfFalse => {
                let (condition, target) = (self.read(params[0])?, self.read(params[1])?);
                debug!("jz {} {}", condition, target);
                if condition == 0 {
                    return self.jump(target);
                }
            }
            Opcode::LessThan => {
                let (left, right) = (self.read(params[0])?, self.read(params[1])?);
                debug!("lt {} {}", left, right);
                self.store(inst, i64::from(left < right))?;
            }
            Opcode::Equals => {
                let (left, right) = (self.read(params[0])?, self.read(params[1])?);
                debug!("eq {} {}", left, right);
                self.store(inst, i64::from(left == right))?;
            }
            Opcode::AdjustRelativeBase => {
                let offset = self.read(params[0])?;
                self.relative_base = self.relative_base.wrapping_add(offset);
                debug!("arb {} -> relative base {}", offset, self.relative_base);
            }
            Opcode::Halt => return Ok(ExecutionResult::Halted),
        }
        Ok(ExecutionResult::Continue)
    }

    fn read(&self, parameter: Parameter) -> Result<i64, IntcodeError> {
        parameter.value(&self.memory, self.relative_base)
    }

    /// Address named by the instruction's last parameter
    fn write_address(&self, inst: &Instruction) -> Result<i64, IntcodeError> {
        inst.parameters
            .last()
            .and_then(|target| target.address(self.relative_base))
            .ok_or(IntcodeError::ImmediateWriteTarget {
                mnemonic: inst.opcode.mnemonic(),
                pc: self.pc,
            })
    }

    fn store(&mut self, inst: &Instruction, value: i64) -> Result<(), IntcodeError> {
        let address = self.write_address(inst)?;
        self.memory.write(address, value)
    }

    fn jump(&mut self, target: i64) -> Result<ExecutionResult, IntcodeError> {
        self.pc = usize::try_from(target).map_err(|_| IntcodeError::InvalidAddress(target))?;
        Ok(ExecutionResult::Jumped)
    }
}
