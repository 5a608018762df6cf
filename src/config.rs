//! Run configuration
//!
//! A run is described by a small TOML file:
//!
//! ```toml
//! program = "amplifier.intcode"
//! topology = "ring"
//! phases = [9, 8, 7, 6, 5]
//! search = true
//! max_steps = 10000000
//! ```
//!
//! Without `phases` the program runs on a single machine fed `inputs`.

use crate::amplifier::{search_phases, AmplifierNetwork, Topology};
use crate::error::IntcodeError;
use crate::machine::{Machine, MachineState};
use crate::program::Program;
use log::{debug, info};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

fn default_topology() -> Topology {
    Topology::Chain
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Program file, relative paths resolve against the config file's directory
    pub program: PathBuf,
    /// Input queue of a single-machine run
    #[serde(default)]
    pub inputs: Vec<i64>,
    /// One phase setting per amplifier
    #[serde(default)]
    pub phases: Vec<i64>,
    #[serde(default = "default_topology")]
    pub topology: Topology,
    /// Signal fed into the first amplifier
    #[serde(default)]
    pub seed: i64,
    /// Instruction limit per machine
    #[serde(default)]
    pub max_steps: Option<u64>,
    /// Search every ordering of `phases` for the strongest signal
    #[serde(default)]
    pub search: bool,
}

/// What a run produced
#[derive(Debug, Clone, PartialEq)]
pub enum RunReport {
    /// Single machine: its whole output log and the state it stopped in
    Machine { output: Vec<i64>, state: MachineState },
    /// Amplifier network: final signal and the phases that produced it
    Network { signal: i64, phases: Vec<i64> },
}

impl RunConfig {
    /// Configuration for running `program` with no inputs
    pub fn for_program<P: Into<PathBuf>>(program: P) -> Self {
        RunConfig {
            program: program.into(),
            inputs: Vec::new(),
            phases: Vec::new(),
            topology: default_topology(),
            seed: 0,
            max_steps: None,
            search: false,
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, IntcodeError> {
        let config: RunConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, IntcodeError> {
        let path = path.as_ref();
        debug!("Loading run configuration: {}", path.display());
        let text = fs::read_to_string(path)?;
        let mut config = RunConfig::from_toml_str(&text)?;

        if config.program.is_relative() {
            if let Some(dir) = path.parent() {
                config.program = dir.join(&config.program);
            }
        }
        Ok(config)
    }

    fn validate(&self) -> Result<(), IntcodeError> {
        if self.search && self.phases.is_empty() {
            return Err(IntcodeError::ConfigError(
                "search requires at least one phase".to_string(),
            ));
        }
        if !self.phases.is_empty() && !self.inputs.is_empty() {
            return Err(IntcodeError::ConfigError(
                "inputs only apply to single-machine runs; amplifiers take phases".to_string(),
            ));
        }
        Ok(())
    }

    pub fn load_program(&self) -> Result<Program, IntcodeError> {
        Program::from_file(&self.program)
    }

    /// Load the program and run it as configured
    pub fn execute(&self) -> Result<RunReport, IntcodeError> {
        let program = self.load_program()?;
        self.execute_program(&program)
    }

    /// Run an already loaded program as configured
    pub fn execute_program(&self, program: &Program) -> Result<RunReport, IntcodeError> {
        self.validate()?;

        if self.phases.is_empty() {
            let mut machine = Machine::with_input(program.words(), self.inputs.iter().copied());
            machine.run_with_limit(self.max_steps)?;
            info!(
                "machine {:?} after {} instructions with {} output value(s)",
                machine.state(),
                machine.instruction_count(),
                machine.output().len()
            );
            return Ok(RunReport::Machine {
                output: machine.output().to_vec(),
                state: machine.state(),
            });
        }

        if self.search {
            let (signal, phases) = search_phases(
                program.words(),
                &self.phases,
                self.topology,
                self.seed,
                self.max_steps,
            )?;
            return Ok(RunReport::Network { signal, phases });
        }

        let signal = AmplifierNetwork::new(program.words(), &self.phases, self.topology)?
            .with_step_limit(self.max_steps)
            .run(self.seed)?;
        info!("{} signal {} from phases {:?}", self.topology, signal, self.phases);
        Ok(RunReport::Network {
            signal,
            phases: self.phases.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    const CHAIN: [i64; 17] = [3, 15, 3, 16, 1002, 16, 10, 16, 1, 16, 15, 15, 4, 15, 99, 0, 0];

    #[test]
    fn test_minimal_config_defaults() {
        let config = RunConfig::from_toml_str(r#"program = "day09.txt""#).unwrap();
        assert_eq!(config, RunConfig::for_program("day09.txt"));
        assert_eq!(config.topology, Topology::Chain);
        assert_eq!(config.max_steps, None);
    }

    #[test]
    fn test_full_config() {
        let text = r#"
            program = "amp.txt"
            topology = "ring"
            phases = [9, 8, 7, 6, 5]
            seed = 3
            max_steps = 500
            search = true
        "#;
        let config = RunConfig::from_toml_str(text).unwrap();
        assert_eq!(config.topology, Topology::Ring);
        assert_eq!(config.phases, vec![9, 8, 7, 6, 5]);
        assert_eq!(config.seed, 3);
        assert_eq!(config.max_steps, Some(500));
        assert!(config.search);
    }

    #[test]
    fn test_topology_aliases_match_command_line() {
        for alias in ["loop", "feedback"] {
            let text = format!("program = \"a\"\ntopology = \"{}\"", alias);
            let config = RunConfig::from_toml_str(&text).unwrap();
            assert_eq!(config.topology, alias.parse::<Topology>().unwrap());
            assert_eq!(config.topology, Topology::Ring);
        }
    }

    #[test]
    fn test_rejects_bad_config() {
        assert!(matches!(
            RunConfig::from_toml_str(r#"topology = "ring""#),
            Err(IntcodeError::ConfigError(_))
        ));
        assert!(RunConfig::from_toml_str("program = \"a\"\ntopology = \"star\"").is_err());
        assert!(RunConfig::from_toml_str("program = \"a\"\nphases = [1]\ninputs = [2]").is_err());
        assert!(RunConfig::from_toml_str("program = \"a\"\nsearch = true").is_err());
        assert!(RunConfig::from_toml_str("program = \"a\"\nunknown = 1").is_err());
    }

    #[test]
    fn test_execute_single_machine() {
        let mut config = RunConfig::for_program("unused");
        config.inputs = vec![5];
        let program = Program::new(vec![3, 0, 4, 0, 104, 6, 99]);

        let report = config.execute_program(&program).unwrap();
        assert_eq!(
            report,
            RunReport::Machine {
                output: vec![5, 6],
                state: MachineState::Halted
            }
        );
    }

    #[test]
    fn test_execute_network_and_search() {
        let program = Program::new(CHAIN.to_vec());
        let mut config = RunConfig::for_program("unused");
        config.phases = vec![4, 3, 2, 1, 0];

        let report = config.execute_program(&program).unwrap();
        assert_eq!(
            report,
            RunReport::Network {
                signal: 43210,
                phases: vec![4, 3, 2, 1, 0]
            }
        );

        config.phases = vec![0, 1, 2, 3, 4];
        config.search = true;
        let report = config.execute_program(&program).unwrap();
        assert_eq!(
            report,
            RunReport::Network {
                signal: 43210,
                phases: vec![4, 3, 2, 1, 0]
            }
        );
    }

    #[test]
    fn test_step_limit_applies() {
        let mut config = RunConfig::for_program("unused");
        config.max_steps = Some(10);
        let program = Program::new(vec![1105, 1, 0]);
        assert_eq!(
            config.execute_program(&program),
            Err(IntcodeError::StepLimitExceeded(10))
        );
    }

    #[test]
    fn test_from_file_resolves_program_path() {
        let mut dir = std::env::temp_dir();
        dir.push(format!("intcode-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("echo.intcode"), "3,0,4,0,99\n").unwrap();
        fs::write(
            dir.join("run.toml"),
            "program = \"echo.intcode\"\ninputs = [42]\n",
        )
        .unwrap();

        let config = RunConfig::from_file(dir.join("run.toml")).unwrap();
        assert_eq!(config.program, dir.join("echo.intcode"));
        let report = config.execute().unwrap();
        assert_eq!(
            report,
            RunReport::Machine {
                output: vec![42],
                state: MachineState::Halted
            }
        );

        fs::remove_dir_all(&dir).unwrap();
    }
}
