//! ArgMatches → CliAction conversion.
//!
//! Translates clap's parsed arguments into the action to run:
//! - `call` → `CliAction::Invoke`
//! - `join`/`review` → gateway workflows
//!
//! REPL meta-commands are recognised before clap sees the line.

use clap::ArgMatches;

/// The result of parsing user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliAction {
    /// Named transaction with text arguments.
    Invoke { function: String, args: Vec<String> },
    /// Gateway join workflow.
    Join { key: String, user: String },
    /// Gateway review workflow.
    Review {
        key: String,
        user: String,
        written: bool,
    },
}

/// REPL meta-commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaCommand {
    Help,
    Functions,
    Quit,
}

/// Check for REPL meta-commands before delegating to clap.
pub fn check_meta_command(line: &str) -> Option<MetaCommand> {
    match line.trim() {
        "quit" | "exit" => Some(MetaCommand::Quit),
        "help" => Some(MetaCommand::Help),
        "functions" => Some(MetaCommand::Functions),
        _ => None,
    }
}

/// Convert clap ArgMatches into a CliAction.
pub fn matches_to_action(matches: &ArgMatches) -> Result<CliAction, String> {
    let (sub_name, sub) = matches
        .subcommand()
        .ok_or_else(|| "No command provided".to_string())?;

    match sub_name {
        "call" => Ok(CliAction::Invoke {
            function: required(sub, "function")?,
            args: sub
                .get_many::<String>("args")
                .map(|values| values.cloned().collect())
                .unwrap_or_default(),
        }),
        "join" => Ok(CliAction::Join {
            key: required(sub, "key")?,
            user: required(sub, "user")?,
        }),
        "review" => Ok(CliAction::Review {
            key: required(sub, "key")?,
            user: required(sub, "user")?,
            written: sub
                .get_one::<bool>("written")
                .copied()
                .ok_or_else(|| "Missing argument: written".to_string())?,
        }),
        other => Err(format!("Unknown command: {}", other)),
    }
}

fn required(matches: &ArgMatches, name: &str) -> Result<String, String> {
    matches
        .get_one::<String>(name)
        .cloned()
        .ok_or_else(|| format!("Missing argument: {}", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::build_repl_cmd;

    fn parse(line: &str) -> Result<CliAction, String> {
        let tokens = shlex::split(line).unwrap();
        let matches = build_repl_cmd()
            .try_get_matches_from(tokens)
            .map_err(|e| e.to_string())?;
        matches_to_action(&matches)
    }

    #[test]
    fn test_quoted_arguments_stay_whole() {
        let action = parse(r#"call ChangeEventUser Event0 "kim min""#).unwrap();
        assert_eq!(
            action,
            CliAction::Invoke {
                function: "ChangeEventUser".into(),
                args: vec!["Event0".into(), "kim min".into()],
            }
        );
    }

    #[test]
    fn test_call_without_arguments() {
        let action = parse("call QueryAllEvents").unwrap();
        assert_eq!(
            action,
            CliAction::Invoke {
                function: "QueryAllEvents".into(),
                args: vec![],
            }
        );
    }

    #[test]
    fn test_empty_string_argument() {
        let action = parse(r#"call QueryEvent """#).unwrap();
        assert_eq!(
            action,
            CliAction::Invoke {
                function: "QueryEvent".into(),
                args: vec![String::new()],
            }
        );
    }

    #[test]
    fn test_join_and_review() {
        assert_eq!(
            parse("join Event1 alice").unwrap(),
            CliAction::Join {
                key: "Event1".into(),
                user: "alice".into()
            }
        );
        assert_eq!(
            parse("review Event1 alice true").unwrap(),
            CliAction::Review {
                key: "Event1".into(),
                user: "alice".into(),
                written: true
            }
        );
    }

    #[test]
    fn test_meta_commands() {
        assert_eq!(check_meta_command(" quit "), Some(MetaCommand::Quit));
        assert_eq!(check_meta_command("exit"), Some(MetaCommand::Quit));
        assert_eq!(check_meta_command("functions"), Some(MetaCommand::Functions));
        assert_eq!(check_meta_command("call QueryAllEvents"), None);
    }
}
