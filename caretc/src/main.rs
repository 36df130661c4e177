mod cli;
mod repl;
mod report;
mod rlpl;
mod rppl;

use std::{path::PathBuf, process::ExitCode, time::Instant};

use caret_core::session::{execute_from_stream, execute_source, parse_source, read_source};
use clap::Parser;
use cli::{print_finished, print_interrupted, print_parsed, print_parsing, print_running};
use report::{print_error, print_report};

const DEMO_PATH: &str = "demo.caret";
const DEMO: &str = include_str!("../../demos/demo.caret");

#[derive(Parser)]
#[command(name = "caretc", version, about = "Interpreter for the caret scripting language")]
enum Command {
    /// Runs a source file and reports routine usage
    Run {
        /// Path of source file
        path: PathBuf,
        /// Print the profiler log after the report
        #[arg(short, long, default_value_t = false)]
        logs: bool,
        /// Do not print progress lines
        #[arg(short, long, default_value_t = false)]
        quiet: bool,
    },
    /// Performs lexical and syntactical analysis only
    Check {
        /// Path of source file
        path: PathBuf,
        /// Print ast instead of parsed source code
        #[arg(long, default_value_t = false)]
        print_ast: bool,
    },
    /// Runs the built-in sample program
    Demo {
        /// Print the profiler log after the report
        #[arg(short, long, default_value_t = false)]
        logs: bool,
    },
    /// Runs Read Lex Print Loop
    Rlpl,
    /// Runs Read Parse Print Loop
    Rppl,
    /// Runs Read Eval Loop over one session
    Repl,
}

fn main() -> ExitCode {
    init_tracing();

    if let Err(err) = ctrlc::set_handler(|| {
        print_interrupted();
        std::process::exit(130);
    }) {
        tracing::warn!(%err, "could not install the Ctrl-C handler");
    }

    match Command::parse() {
        Command::Run { path, logs, quiet } => {
            if !quiet {
                print_running(&path.to_string_lossy());
            }

            let start = Instant::now();

            match execute_from_stream(path) {
                Ok(interpreter) => {
                    if !quiet {
                        print_finished(start.elapsed());
                    }

                    print_report(&interpreter, logs);

                    ExitCode::SUCCESS
                },
                Err(err) => {
                    print_error(&err);

                    ExitCode::FAILURE
                }
            }
        },
        Command::Check { path, print_ast } => {
            print_parsing(&path.to_string_lossy());
            let start = Instant::now();

            let parsed = read_source(path.clone())
                .and_then(|src| parse_source(path, &src));

            match parsed {
                Ok(program) => {
                    if print_ast {
                        println!("{program:#?}");
                    } else {
                        println!("{program}");
                    }

                    print_parsed(start.elapsed());

                    ExitCode::SUCCESS
                },
                Err(err) => {
                    print_error(&err);

                    ExitCode::FAILURE
                }
            }
        },
        Command::Demo { logs } => {
            print_running(DEMO_PATH);
            let start = Instant::now();

            match execute_source(PathBuf::from(DEMO_PATH), DEMO) {
                Ok(interpreter) => {
                    print_finished(start.elapsed());
                    print_report(&interpreter, logs);

                    ExitCode::SUCCESS
                },
                Err(err) => {
                    print_error(&err);

                    ExitCode::FAILURE
                }
            }
        },
        Command::Rlpl => exit_code(rlpl::start()),
        Command::Rppl => exit_code(rppl::start()),
        Command::Repl => exit_code(repl::start()),
    }
}

fn exit_code(result: std::io::Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");

            ExitCode::FAILURE
        }
    }
}

/// Installs a subscriber only when `RUST_LOG` is set.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
            .with(EnvFilter::from_default_env())
            .init();
    }
}
