use colored::*;
use std::{fs, path::PathBuf, process};
use clap::Parser as ClapParser;
use thiserror::Error;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

extern crate frontend;
extern crate runtime;

mod console;

use console::ConsoleCanvas;
use frontend::parser::Parser;
use runtime::program::{Program, DEFAULT_EXECUTION_LIMIT};


// --------
//   CLI
// --------

#[derive(ClapParser)]
#[command(version)]
#[command(about="Interpreter for Quill scripts")]
struct CLI {
    #[arg(short, long)]
    /// Path to the file to run
    file: Option<String>,

    /// Prints the parsed commands before running
    #[arg(short, long)]
    list: bool,

    /// Test mode. If argument is 'all', it will run all files in scripts directory
    #[arg(short, long)]
    test: Option<String>,

    /// Maximum number of executed commands before a run is stopped
    #[arg(short, long, default_value_t = DEFAULT_EXECUTION_LIMIT)]
    max_steps: usize,

    /// Prints the variables after the run
    #[arg(short, long)]
    dump: bool,

    /// Log verbosity, repeat for more (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

const SCRIPTS_DIR: &str = "scripts";

#[derive(Error, Debug)]
enum CliError {
    #[error("{} opening script file {0}: {1}", "Error".red().bold())]
    OpenFile(String, std::io::Error),

    #[error("{} reading scripts directory: {0}", "Error".red().bold())]
    ScriptsDir(std::io::Error),

    #[error("{} no file given, use {} or {}", "Error".red().bold(), "--file".cyan(), "--test".cyan())]
    NothingToRun,
}


fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    // RUST_LOG wins over the command line
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn open_file(file_path: &str) -> Result<String, CliError> {
    fs::read_to_string(file_path).map_err(|e| CliError::OpenFile(file_path.to_string(), e))
}

// Returns false if the script failed to parse or to run
fn run_file(file_name: &str, cli: &CLI) -> Result<bool, CliError> {
    println!("\nReading source file {}...", file_name.green());
    let source_code = open_file(file_name)?;
    info!(file = file_name, max_steps = cli.max_steps, "running script");

    let succeeded = interpretation_sequence(&source_code, cli);
    if !succeeded {
        warn!(file = file_name, "script failed");
    }

    Ok(succeeded)
}

fn interpretation_sequence(code: &str, cli: &CLI) -> bool {
    let mut parser = Parser::new();
    let mut program = Program::new().with_execution_limit(cli.max_steps);

    if let Err(e) = parser.parse_program(code, &mut program) {
        println!("{e}");
        return false;
    }

    if cli.list {
        println!("\nParsed commands:");
        for (idx, node) in program.commands().iter().enumerate() {
            println!("  {:>4} | line {:>4} | {}", idx, node.line + 1, node);
        }
    }

    println!("\nProgram output:");
    let mut canvas = ConsoleCanvas::default();
    let succeeded = match program.run(&mut canvas) {
        Ok(stats) => {
            println!(
                "\n{} in {} steps, {} drawing operations",
                "Done".green().bold(),
                stats.steps,
                canvas.operations
            );
            true
        }
        Err(e) => {
            println!("{}", e.report());
            false
        }
    };

    if cli.dump {
        println!("\nVariables:");
        for (name, value) in program.env().variables() {
            println!("  {} = {}", name.cyan(), value);
        }
    }

    succeeded
}

fn scripts(dir: &str) -> Result<Vec<PathBuf>, CliError> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(CliError::ScriptsDir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    Ok(paths)
}

fn execute(cli: &CLI) -> Result<bool, CliError> {
    if let Some(file_name) = &cli.file {
        return run_file(file_name, cli);
    }

    match cli.test.as_deref() {
        Some("all") => {
            let mut failures = 0;

            // Each script gets its own program. No shared data
            for path in scripts(SCRIPTS_DIR)? {
                if !run_file(&path.display().to_string(), cli)? {
                    failures += 1;
                }
            }

            println!("\n{} failing script(s)", failures);
            Ok(failures == 0)
        }
        Some(path) => run_file(path, cli),
        None => Err(CliError::NothingToRun),
    }
}

fn main() {
    // Manage command line args
    let cli = CLI::parse();
    init_logging(cli.verbose);

    println!("\n       --- {} v0.1 ---", "Quill".cyan().bold());

    match execute(&cli) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            println!("{e}");
            process::exit(2);
        }
    }
}
