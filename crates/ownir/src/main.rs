#![forbid(unsafe_code)]

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use ownir::FmtAnalysis;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ownir", version, about = "Evaluate and inspect ownir programs")]
struct Args {
    /// Log filter in `RUST_LOG` syntax, taking precedence over the environment
    #[arg(long, global = true)]
    log: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Verify, analyze and evaluate a program, then print its result
    Run { path: PathBuf },

    /// Print a program's disassembly
    Print { path: PathBuf },

    /// Print a program's control-flow graph and reachability
    Analyze { path: PathBuf },
}

fn init_logging(directive: Option<&str>) {
    let filter = match directive {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn execute(command: Command) -> Result<(), ownir::Error> {
    match command {
        Command::Run { path } => {
            let program = ownir::load(&path)?;
            let value = ownir::evaluate(&program)?;
            println!("{value}");
        }

        Command::Print { path } => {
            let program = ownir::load(&path)?;
            print!("{}", program.display());
        }

        Command::Analyze { path } => {
            let program = ownir::load(&path)?;
            let analysis = ownir::analyze(ownir::verify(&program)?)?;
            print!("{}", FmtAnalysis::new(&analysis));
        }
    }

    Ok(())
}

fn main() {
    let args = Args::parse();

    init_logging(args.log.as_deref());

    if let Err(err) = execute(args.command) {
        tracing::error!("{err}");
        process::exit(1);
    }
}
