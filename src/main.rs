use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use intcode::fuel::{parse_masses, total_fuel};
use intcode::intcode::{apply_overrides, disassemble, execute};
use intcode::program;
use intcode::search::{SearchConfig, solve};
use tracing::{debug, error};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "intcode", about = "Intcode interpreter and puzzle drivers")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a program once and print the value left at position 0.
    Run {
        /// File holding one line of comma-separated integers.
        file: PathBuf,

        /// Value written at position 1 before running.
        #[arg(long, requires = "verb")]
        noun: Option<i64>,

        /// Value written at position 2 before running.
        #[arg(long, requires = "noun")]
        verb: Option<i64>,

        /// Print the whole final program instead of position 0.
        #[arg(long)]
        dump: bool,
    },

    /// Find the noun/verb pair producing a target output and print 100*noun + verb.
    Search {
        file: PathBuf,

        /// Output value to search for.
        #[arg(long, default_value_t = 19_690_720)]
        target: i64,

        /// Nouns are tried from 0 up to, but excluding, this limit.
        #[arg(long, default_value_t = 100)]
        noun_limit: i64,

        /// Verbs are tried from 0 up to, but excluding, this limit.
        #[arg(long, default_value_t = 100)]
        verb_limit: i64,

        /// Run trials one after another instead of on the thread pool.
        #[arg(long)]
        sequential: bool,
    },

    /// Print the total fuel for a file of module masses, one per line.
    Fuel {
        file: PathBuf,

        /// Include the fuel needed to carry the fuel itself.
        #[arg(long)]
        recursive: bool,
    },

    /// Print a disassembly of a program.
    Disasm { file: PathBuf },
}

/// Initialize logging on stderr so stdout only carries the answer.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "intcode=debug",
        _ => "intcode=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn read(path: &Path) -> intcode::Result<String> {
    debug!(path = %path.display(), "reading input");
    Ok(std::fs::read_to_string(path)?)
}

fn dispatch(command: Command) -> intcode::Result<()> {
    match command {
        Command::Run {
            file,
            noun,
            verb,
            dump,
        } => {
            let mut memory = program::parse(&read(&file)?)?;
            if let (Some(noun), Some(verb)) = (noun, verb) {
                apply_overrides(&mut memory, noun, verb)?;
            }
            let steps = execute(&mut memory)?;
            debug!(steps, "run complete");
            if dump {
                println!("{}", program::format(&memory));
            } else {
                println!("{}", memory[0]);
            }
        }
        Command::Search {
            file,
            target,
            noun_limit,
            verb_limit,
            sequential,
        } => {
            let config = SearchConfig {
                target,
                noun_limit,
                verb_limit,
                parallel: !sequential,
            };
            let solution = solve(&read(&file)?, &config)?;
            println!("{}", solution.answer());
        }
        Command::Fuel { file, recursive } => {
            let masses = parse_masses(&read(&file)?)?;
            println!("{}", total_fuel(&masses, recursive));
        }
        Command::Disasm { file } => {
            let memory = program::parse(&read(&file)?)?;
            print!("{}", disassemble(&memory));
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = dispatch(cli.command) {
        error!("{e}");
        std::process::exit(1);
    }
}
