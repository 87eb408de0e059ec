//! review-ledger: command-line host for the review event contract.
//!
//! Three modes:
//! - **Shell mode**: `review-ledger [flags] call QueryEvent Event0`: single command, exit
//! - **REPL mode**: `review-ledger [flags]`: interactive prompt (if stdin is TTY)
//! - **Pipe mode**: `echo "call InitLedger" | review-ledger`: line-by-line from stdin
//!
//! Each process opens a fresh in-process ledger.

mod commands;
mod format;
mod parse;
mod repl;
mod state;

use std::io::IsTerminal;
use std::path::Path;
use std::process;

use ledger_executor::LedgerConfig;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use commands::build_cli;
use format::{format_error, format_output, OutputMode};
use parse::matches_to_action;
use state::SessionState;

fn main() {
    let matches = build_cli().get_matches();

    init_tracing(&matches);

    // Determine output mode
    let output_mode = if matches.get_flag("json") {
        OutputMode::Json
    } else if matches.get_flag("raw") {
        OutputMode::Raw
    } else {
        OutputMode::Human
    };

    let config = match load_config(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };
    debug!(target: "ledger::cli", ?config, "Configuration loaded");

    let state = match SessionState::open(config) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("{}", format_error(&e, output_mode));
            process::exit(1);
        }
    };

    // Dispatch mode
    if matches.subcommand().is_some() {
        let exit_code = run_shell_mode(&matches, &state, output_mode);
        process::exit(exit_code);
    } else if std::io::stdin().is_terminal() {
        repl::run_repl(&state, output_mode);
    } else {
        let exit_code = repl::run_pipe(&state, output_mode);
        process::exit(exit_code);
    }
}

/// Install the fmt subscriber; `--log-level` wins over `-v`.
fn init_tracing(matches: &clap::ArgMatches) {
    let filter = match matches.get_one::<String>("log-level") {
        Some(directives) => EnvFilter::new(directives),
        None => {
            let level = match matches.get_count("verbose") {
                0 => "warn",
                1 => "ledger=debug",
                _ => "ledger=trace",
            };
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
        }
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(matches: &clap::ArgMatches) -> Result<LedgerConfig, String> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => {
            let path = Path::new(path);
            LedgerConfig::write_default_if_missing(path)
                .and_then(|_| LedgerConfig::from_file(path))
                .map_err(|e| format!("Failed to load configuration: {}", e))?
        }
        None => LedgerConfig::default(),
    };
    if matches.get_flag("seed") {
        config.bootstrap = true;
    }
    Ok(config)
}

fn run_shell_mode(matches: &clap::ArgMatches, state: &SessionState, mode: OutputMode) -> i32 {
    let action = match matches_to_action(matches) {
        Ok(action) => action,
        Err(e) => {
            eprintln!("(error) {}", e);
            return 1;
        }
    };
    match state.run(action) {
        Ok(output) => {
            let formatted = format_output(&output, mode);
            if !formatted.is_empty() {
                println!("{}", formatted);
            }
            0
        }
        Err(e) => {
            eprintln!("{}", format_error(&e, mode));
            1
        }
    }
}
