//! REPL loop with rustyline.
//!
//! Interactive mode: prompt, meta-commands, history, TAB completion.
//! Pipe mode: read lines from stdin, execute each.

use std::io::{self, BufRead};

use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{CompletionType, Config, Context, Editor, Helper};

use ledger_executor::{TransactionKind, FUNCTIONS};

use crate::commands::build_repl_cmd;
use crate::format::{format_error, format_output, OutputMode};
use crate::parse::{check_meta_command, matches_to_action, MetaCommand};
use crate::state::SessionState;

const TOP_LEVEL_COMMANDS: &[&str] = &["call", "join", "review", "help", "functions", "quit"];

/// Run the interactive REPL.
pub fn run_repl(state: &SessionState, mode: OutputMode) {
    let config = Config::builder()
        .history_ignore_space(true)
        .completion_type(CompletionType::List)
        .build();

    let mut rl: Editor<LedgerHelper, _> = match Editor::with_config(config) {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("(error) {}", e);
            return;
        }
    };
    rl.set_helper(Some(LedgerHelper));

    let history_path = history_file();
    if let Some(ref path) = history_path {
        let _ = rl.load_history(path);
    }

    loop {
        match rl.readline("review-ledger> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(trimmed);

                if let Some(meta) = check_meta_command(trimmed) {
                    match meta {
                        MetaCommand::Quit => break,
                        MetaCommand::Help => print_help(),
                        MetaCommand::Functions => print_functions(),
                    }
                    continue;
                }

                let _ = execute_line(trimmed, state, mode);
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("(error) {:?}", err);
                break;
            }
        }
    }

    if let Some(ref path) = history_path {
        let _ = rl.save_history(path);
    }
}

/// Run in pipe mode: read lines from stdin, execute each.
///
/// Returns 1 if any line failed.
pub fn run_pipe(state: &SessionState, mode: OutputMode) -> i32 {
    let stdin = io::stdin();
    let mut exit_code = 0;

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if !execute_line(trimmed, state, mode) {
            exit_code = 1;
        }
    }

    exit_code
}

/// Tokenize, parse and run one line. Returns true on success.
fn execute_line(line: &str, state: &SessionState, mode: OutputMode) -> bool {
    // Tokenize with shlex (respects quotes)
    let tokens = match shlex::split(line) {
        Some(t) if !t.is_empty() => t,
        Some(_) => return true,
        None => {
            eprintln!("(error) Invalid quoting: {}", line);
            return false;
        }
    };

    let matches = match build_repl_cmd().try_get_matches_from(tokens) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("{}", e);
            return false;
        }
    };

    let action = match matches_to_action(&matches) {
        Ok(action) => action,
        Err(e) => {
            eprintln!("(error) {}", e);
            return false;
        }
    };

    match state.run(action) {
        Ok(output) => {
            let formatted = format_output(&output, mode);
            if !formatted.is_empty() {
                println!("{}", formatted);
            }
            true
        }
        Err(e) => {
            eprintln!("{}", format_error(&e, mode));
            false
        }
    }
}

fn history_file() -> Option<String> {
    std::env::var("HOME")
        .ok()
        .map(|h| format!("{}/.review_ledger_history", h))
}

fn print_help() {
    println!("Commands:");
    println!("  call <Function> [args..]    invoke a contract transaction");
    println!("  join <key> <user>           assign a participant, mark in-progress");
    println!("  review <key> <user> <bool>  mark done (true) or incomplete (false)");
    println!("  functions                   list contract transactions");
    println!("  quit                        leave the shell");
}

fn print_functions() {
    for spec in FUNCTIONS {
        let kind = match spec.kind {
            TransactionKind::Submit => "submit",
            TransactionKind::Evaluate => "evaluate",
        };
        println!("  {:<70} {:<8} {}", spec.signature(), kind, spec.summary);
    }
}

// =========================================================================
// Completion
// =========================================================================

struct LedgerHelper;

impl Helper for LedgerHelper {}
impl Validator for LedgerHelper {}
impl Highlighter for LedgerHelper {}
impl Hinter for LedgerHelper {
    type Hint = String;

    fn hint(&self, _line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<String> {
        None
    }
}

impl Completer for LedgerHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line_to_pos = &line[..pos];
        let parts: Vec<&str> = line_to_pos.split_whitespace().collect();
        let trailing_space = line_to_pos.ends_with(' ');

        let (prefix, candidates): (&str, Vec<&str>) =
            if parts.is_empty() || (parts.len() == 1 && !trailing_space) {
                let prefix = parts.first().copied().unwrap_or("");
                (prefix, TOP_LEVEL_COMMANDS.to_vec())
            } else if parts[0] == "call"
                && ((parts.len() == 1 && trailing_space) || (parts.len() == 2 && !trailing_space))
            {
                let prefix = if trailing_space { "" } else { parts[1] };
                (prefix, FUNCTIONS.iter().map(|f| f.name).collect())
            } else {
                return Ok((pos, Vec::new()));
            };

        let start = pos - prefix.len();
        let pairs = candidates
            .into_iter()
            .filter(|c| c.starts_with(prefix))
            .map(|c| Pair {
                display: c.to_string(),
                replacement: c.to_string(),
            })
            .collect();
        Ok((start, pairs))
    }
}
