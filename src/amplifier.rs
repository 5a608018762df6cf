//! Amplifier networks
//!
//! Several machines running copies of one program, wired output-to-input
//! either as a single pass chain or as a feedback ring. The ring is driven
//! cooperatively from one thread: each amplifier runs until it pauses for
//! input or halts, its fresh output is forwarded to the next amplifier, and
//! the scheduler moves on round-robin until the last amplifier halts.

use crate::error::IntcodeError;
use crate::machine::Machine;
use log::{debug, info, warn};
use serde::Deserialize;
use std::fmt;

/// How the amplifiers of a network are connected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    /// Each amplifier runs once, feeding the next
    Chain,
    /// The last amplifier feeds back into the first until it halts
    #[serde(alias = "loop", alias = "feedback")]
    Ring,
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Topology::Chain => write!(f, "chain"),
            Topology::Ring => write!(f, "ring"),
        }
    }
}

impl std::str::FromStr for Topology {
    type Err = IntcodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chain" => Ok(Topology::Chain),
            "ring" | "loop" | "feedback" => Ok(Topology::Ring),
            other => Err(IntcodeError::ConfigError(format!(
                "unknown topology '{}' (expected chain or ring)",
                other
            ))),
        }
    }
}

/// One machine configured with a phase setting
#[derive(Debug, Clone)]
pub struct Amplifier {
    phase: i64,
    machine: Machine,
    /// Output values already forwarded downstream
    forwarded: usize,
}

impl Amplifier {
    /// Build an amplifier on a private copy of `program`, phase queued first
    pub fn new(program: &[i64], phase: i64) -> Self {
        Amplifier {
            phase,
            machine: Machine::with_input(program, [phase]),
            forwarded: 0,
        }
    }

    pub fn phase(&self) -> i64 {
        self.phase
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    pub fn send_signal(&mut self, signal: i64) {
        self.machine.enqueue_input(signal);
    }

    /// Output produced since the last call, in production order
    fn take_new_output(&mut self) -> Vec<i64> {
        let fresh = self.machine.output()[self.forwarded..].to_vec();
        self.forwarded = self.machine.output().len();
        fresh
    }
}

/// Ordered set of amplifiers sharing one program
#[derive(Debug, Clone)]
pub struct AmplifierNetwork {
    amplifiers: Vec<Amplifier>,
    topology: Topology,
}

impl AmplifierNetwork {
    /// One amplifier per phase, each with its own copy of the program
    pub fn new(program: &[i64], phases: &[i64], topology: Topology) -> Result<Self, IntcodeError> {
        if phases.is_empty() {
            return Err(IntcodeError::EmptyNetwork);
        }

        let amplifiers = phases
            .iter()
            .map(|&phase| Amplifier::new(program, phase))
            .collect();

        Ok(AmplifierNetwork {
            amplifiers,
            topology,
        })
    }

    /// Apply an instruction limit to every amplifier's machine
    pub fn with_step_limit(mut self, limit: Option<u64>) -> Self {
        for amplifier in &mut self.amplifiers {
            amplifier.machine.set_step_limit(limit);
        }
        self
    }

    pub fn amplifiers(&self) -> &[Amplifier] {
        &self.amplifiers
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Feed `seed` into the first amplifier and run the network to completion
    pub fn run(&mut self, seed: i64) -> Result<i64, IntcodeError> {
        let signal = match self.topology {
            Topology::Chain => self.run_chain(seed)?,
            Topology::Ring => self.run_ring(seed)?,
        };
        debug!(
            "{} of {} amplifiers produced signal {}",
            self.topology,
            self.amplifiers.len(),
            signal
        );
        Ok(signal)
    }

    fn run_chain(&mut self, seed: i64) -> Result<i64, IntcodeError> {
        let mut signal = seed;
        for (index, amplifier) in self.amplifiers.iter_mut().enumerate() {
            amplifier.send_signal(signal);
            amplifier.machine.run()?;

            if !amplifier.machine.is_halted() {
                warn!(
                    "amplifier {} (phase {}) paused in a chain",
                    index, amplifier.phase
                );
                return Err(IntcodeError::AmplifierStalled(index));
            }

            signal = amplifier
                .machine
                .latest_output()
                .ok_or(IntcodeError::AmplifierSilent(index))?;
            debug!("amplifier {} (phase {}) -> {}", index, amplifier.phase, signal);
        }
        Ok(signal)
    }

    fn run_ring(&mut self, seed: i64) -> Result<i64, IntcodeError> {
        let count = self.amplifiers.len();
        let last = count - 1;
        self.amplifiers[0].send_signal(seed);

        let mut current = 0;
        let mut idle_slices = 0;
        while !self.amplifiers[last].machine.is_halted() {
            let amplifier = &mut self.amplifiers[current];
            let executed_before = amplifier.machine.instruction_count();
            amplifier.machine.run()?;
            let progressed = amplifier.machine.instruction_count() != executed_before;

            let fresh = amplifier.take_new_output();
            debug!(
                "amplifier {} {:?} at pc {}, forwarding {:?}",
                current,
                amplifier.machine.state(),
                amplifier.machine.pc(),
                fresh
            );

            let next = (current + 1) % count;
            for value in fresh {
                self.amplifiers[next].send_signal(value);
            }

            // A full round without a single instruction executed can never end
            idle_slices = if progressed { 0 } else { idle_slices + 1 };
            if idle_slices >= count {
                warn!("amplifier ring made no progress for a full round");
                return Err(IntcodeError::NetworkDeadlock);
            }

            current = next;
        }

        self.amplifiers[last]
            .machine
            .latest_output()
            .ok_or(IntcodeError::AmplifierSilent(last))
    }
}

/// Build a network for `phases` and run it with a seed signal of 0
pub fn run_network(program: &[i64], phases: &[i64], topology: Topology) -> Result<i64, IntcodeError> {
    AmplifierNetwork::new(program, phases, topology)?.run(0)
}

/// Try every ordering of `phases` and return the strongest signal with its ordering
pub fn find_max_signal(
    program: &[i64],
    phases: &[i64],
    topology: Topology,
) -> Result<(i64, Vec<i64>), IntcodeError> {
    search_phases(program, phases, topology, 0, None)
}

/// `find_max_signal` with an explicit seed signal and per-machine step limit
pub fn search_phases(
    program: &[i64],
    phases: &[i64],
    topology: Topology,
    seed: i64,
    step_limit: Option<u64>,
) -> Result<(i64, Vec<i64>), IntcodeError> {
    if phases.is_empty() {
        return Err(IntcodeError::EmptyNetwork);
    }
    if let Some((i, phase)) = phases
        .iter()
        .enumerate()
        .find(|(i, phase)| phases[..*i].contains(phase))
    {
        return Err(IntcodeError::ConfigError(format!(
            "phase {} repeated at position {}; search phases must be distinct",
            phase, i
        )));
    }

    let mut best: Option<(i64, Vec<i64>)> = None;
    for ordering in permutations(phases) {
        let signal = AmplifierNetwork::new(program, &ordering, topology)?
            .with_step_limit(step_limit)
            .run(seed)?;
        debug!("phases {:?} -> {}", ordering, signal);
        if best.as_ref().map_or(true, |(strongest, _)| signal > *strongest) {
            best = Some((signal, ordering));
        }
    }

    let best = best.ok_or(IntcodeError::EmptyNetwork)?;
    info!("strongest {} signal {} from phases {:?}", topology, best.0, best.1);
    Ok(best)
}

/// All orderings of `items`, in lexicographic order of their positions
fn permutations(items: &[i64]) -> Vec<Vec<i64>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }

    let mut result = Vec::new();
    for i in 0..items.len() {
        let mut rest = items.to_vec();
        let head = rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, head);
            result.push(tail);
        }
    }
    result
}
