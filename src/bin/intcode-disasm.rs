use intcode::disassembler::Disassembler;
use intcode::program::Program;
use log::debug;
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();

    let mut dump_hex = false;
    let mut filename = None;

    for arg in &args[1..] {
        match arg.as_str() {
            "-d" => dump_hex = true,
            "-h" | "--help" => {
                eprintln!("Usage: {} [options] <program-file>", args[0]);
                eprintln!("\nOptions:");
                eprintln!("  -d                   Dump the raw words of each instruction");
                eprintln!("  -h                   Show this help message");
                std::process::exit(0);
            }
            arg if !arg.starts_with('-') => {
                filename = Some(arg.to_string());
                break;
            }
            _ => {
                eprintln!("Unknown option: {}", arg);
                std::process::exit(1);
            }
        }
    }

    let filename = match filename {
        Some(f) => f,
        None => {
            eprintln!("Usage: {} [options] <program-file>", args[0]);
            std::process::exit(1);
        }
    };

    let program = Program::from_file(&filename)?;
    debug!("Loaded {} words from {}", program.len(), filename);

    print!("{}", Disassembler::new(program.words()).disassemble(dump_hex));
    Ok(())
}
