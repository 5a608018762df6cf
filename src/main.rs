use intcode::config::{RunConfig, RunReport};
use intcode::machine::MachineState;
use intcode::program::parse_values;
use intcode::Topology;
use log::{debug, info};
use std::env;
use std::path::Path;

fn print_usage(program_name: &str) {
    println!("intcode - Intcode virtual machine and amplifier network runner");
    println!();
    println!("Usage: {} <program_file> [options]", program_name);
    println!("       {} --config <run.toml> [options]", program_name);
    println!();
    println!("Options:");
    println!("  --input a,b,...       Inputs for a single machine run");
    println!("  --phases a,b,...      Run an amplifier network, one phase per amplifier");
    println!("  --topology chain|ring How the amplifiers are wired (default chain)");
    println!("  --seed n              Signal fed into the first amplifier (default 0)");
    println!("  --search              Try every ordering of --phases, report the strongest");
    println!("  --max-steps n         Abort a machine after n instructions");
    println!();
    println!("Examples:");
    println!("  {} diagnostic.intcode --input 5", program_name);
    println!(
        "  {} amplifier.intcode --phases 5,6,7,8,9 --topology ring --search",
        program_name
    );
}

fn option_value(args: &[String], i: usize) -> Result<&str, String> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| format!("Option {} needs a value", args[i]))
}

/// Name to show in usage text; argv may be empty
fn program_name(args: &[String]) -> &str {
    args.first().map_or("intcode", String::as_str)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let program_name = program_name(&args);

    // Help is a request, not an error
    if args.len() < 2 || args.iter().any(|a| a == "-h" || a == "--help") {
        print_usage(program_name);
        return Ok(());
    }

    let mut config_path = None;
    let mut program_path = None;
    let mut inputs = None;
    let mut phases = None;
    let mut topology = None;
    let mut seed = None;
    let mut max_steps = None;
    let mut search = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                config_path = Some(option_value(&args, i)?.to_string());
                i += 1;
            }
            "--input" => {
                inputs = Some(parse_values(option_value(&args, i)?)?);
                i += 1;
            }
            "--phases" => {
                phases = Some(parse_values(option_value(&args, i)?)?);
                i += 1;
            }
            "--topology" => {
                topology = Some(option_value(&args, i)?.parse::<Topology>()?);
                i += 1;
            }
            "--seed" => {
                let value = option_value(&args, i)?;
                seed = Some(
                    value
                        .parse::<i64>()
                        .map_err(|_| format!("Invalid seed: {}", value))?,
                );
                i += 1;
            }
            "--max-steps" => {
                let value = option_value(&args, i)?;
                max_steps = Some(
                    value
                        .parse::<u64>()
                        .map_err(|_| format!("Invalid step limit: {}", value))?,
                );
                i += 1;
            }
            "--search" => search = true,
            arg if !arg.starts_with('-') && program_path.is_none() => {
                program_path = Some(arg.to_string());
            }
            other => {
                eprintln!("Unknown option: {}", other);
                eprintln!();
                print_usage(program_name);
                std::process::exit(2);
            }
        }
        i += 1;
    }

    let mut config = match (&config_path, &program_path) {
        (Some(path), _) => RunConfig::from_file(path)?,
        (None, Some(path)) => RunConfig::for_program(path),
        (None, None) => {
            eprintln!("Error: no program file or --config given");
            std::process::exit(2);
        }
    };

    // Command line flags override the configuration file
    if config_path.is_some() {
        if let Some(path) = program_path {
            config.program = path.into();
        }
    }
    if let Some(inputs) = inputs {
        config.inputs = inputs;
    }
    if let Some(phases) = phases {
        config.phases = phases;
    }
    if let Some(topology) = topology {
        config.topology = topology;
    }
    if let Some(seed) = seed {
        config.seed = seed;
    }
    if max_steps.is_some() {
        config.max_steps = max_steps;
    }
    config.search |= search;

    if !Path::new(&config.program).exists() {
        eprintln!("Error: Program file not found: {}", config.program.display());
        eprintln!();
        eprintln!("Please check:");
        eprintln!("• File path is correct");
        eprintln!("• You're running from the right directory");
        std::process::exit(1);
    }

    debug!("Running with {:?}", config);

    let report = match config.execute() {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error during execution: {e}");
            return Err(Box::new(e));
        }
    };

    match report {
        RunReport::Machine { output, state } => {
            for value in &output {
                println!("{}", value);
            }
            if state == MachineState::Paused {
                eprintln!("Program is waiting for more input; supply it with --input");
            }
        }
        RunReport::Network { signal, phases } => {
            info!("Phases {:?}", phases);
            println!("{}", signal);
        }
    }

    Ok(())
}
