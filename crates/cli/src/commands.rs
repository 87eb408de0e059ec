//! Clap command tree definition.
//!
//! Builds the `clap::Command` tree used by both shell mode (directly)
//! and REPL/pipe mode (via `try_get_matches_from`).

use clap::{Arg, ArgAction, Command};

/// Build the complete CLI command tree.
pub fn build_cli() -> Command {
    Command::new("review-ledger")
        .about("Run review event transactions against an in-process ledger")
        .subcommand_required(false)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .help("Ledger configuration file (written with defaults if missing)")
                .global(true),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .help("Seed Event0..Event3 when the ledger opens")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("JSON output mode")
                .action(ArgAction::SetTrue)
                .conflicts_with("raw")
                .global(true),
        )
        .arg(
            Arg::new("raw")
                .long("raw")
                .help("Raw output mode (payload bytes as the contract returns them)")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("More log output (-v debug, -vv trace)")
                .action(ArgAction::Count)
                .global(true),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("FILTER")
                .help("Log filter, e.g. `ledger=debug` (overrides -v)")
                .global(true),
        )
        .subcommand(build_call())
        .subcommand(build_join())
        .subcommand(build_review())
}

/// Build a command tree for REPL and pipe mode (no global flags).
pub fn build_repl_cmd() -> Command {
    Command::new("repl")
        .multicall(true)
        .subcommand_required(true)
        .subcommand(build_call())
        .subcommand(build_join())
        .subcommand(build_review())
}

fn build_call() -> Command {
    Command::new("call")
        .about("Invoke a contract transaction by name")
        .arg(
            Arg::new("function")
                .required(true)
                .help("Transaction name, e.g. QueryEvent"),
        )
        .arg(
            Arg::new("args")
                .num_args(0..)
                .allow_hyphen_values(true)
                .trailing_var_arg(true)
                .help("Transaction arguments, as text"),
        )
}

fn build_join() -> Command {
    Command::new("join")
        .about("Assign a participant and mark the event in progress")
        .arg(Arg::new("key").required(true))
        .arg(Arg::new("user").required(true))
}

fn build_review() -> Command {
    Command::new("review")
        .about("Record a participant's review as done or incomplete")
        .arg(Arg::new("key").required(true))
        .arg(Arg::new("user").required(true))
        .arg(
            Arg::new("written")
                .required(true)
                .value_parser(clap::value_parser!(bool))
                .help("true if the review was written"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        build_cli().debug_assert();
        build_repl_cmd().debug_assert();
    }

    #[test]
    fn test_call_accepts_negative_numbers() {
        let matches = build_cli()
            .try_get_matches_from([
                "review-ledger", "call", "RegisterEvent", "E", "t", "h", "g", "s", "-5", "1", "d",
            ])
            .unwrap();
        let (_, call) = matches.subcommand().unwrap();
        let args: Vec<&String> = call.get_many::<String>("args").unwrap().collect();
        assert_eq!(args[5], "-5");
    }

    #[test]
    fn test_review_parses_bool() {
        let matches = build_repl_cmd()
            .try_get_matches_from(["review", "Event0", "alice", "false"])
            .unwrap();
        let (_, review) = matches.subcommand().unwrap();
        assert_eq!(review.get_one::<bool>("written"), Some(&false));
    }
}
