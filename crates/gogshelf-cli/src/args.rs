//! Command-line parsing for the `gogshelf` binary.
//!
//! Hand-rolled, no parser dependency.
//!
//! ```text
//! gogshelf [GLOBAL] scan
//! gogshelf [GLOBAL] list
//! gogshelf [GLOBAL] show <key>
//! gogshelf [GLOBAL] override <key> [--search-name <name>] [--product-id <id>]
//! gogshelf [GLOBAL] refresh <key>
//! gogshelf [GLOBAL] daemon
//!
//! GLOBAL: --config <file> --installer-path <dir> --metadata-path <dir>
//! ```
//!
//! Flags take their value either as the next argument or after `=`.

use std::ffi::OsString;
use std::path::PathBuf;

use gogshelf_core::config::CliOverrides;

pub const USAGE: &str = "\
usage: gogshelf [--help] [--version] [--config <file>] [--installer-path <dir>] [--metadata-path <dir>] <command>

commands:
  scan                     run one full scan and print the summary
  list                     discover installers and print the merged catalog
  show <key>               print one catalog record
  override <key> [--search-name <name>] [--product-id <id>]
                           set metadata lookup overrides for one game
  refresh <key>            fetch metadata again using the stored overrides
  daemon                   run scans on GOG_SCAN_SCHEDULE until interrupted
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Scan,
    List,
    Show {
        key: String,
    },
    Override {
        key: String,
        search_name: Option<String>,
        product_id: Option<u64>,
    },
    Refresh {
        key: String,
    },
    Daemon,
}

#[derive(Debug, Clone)]
pub struct CliArgs {
    pub command: Command,
    pub overrides: CliOverrides,
}

/// What the command line asked for.
#[derive(Debug, Clone)]
pub enum Parsed {
    Run(CliArgs),
    Help,
    Version,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct UsageError(pub String);

fn usage_err(message: impl Into<String>) -> UsageError {
    UsageError(message.into())
}

/// Parse arguments, not including the program name.
pub fn parse_args<I>(args: I) -> Result<Parsed, UsageError>
where
    I: IntoIterator<Item = OsString>,
{
    let mut args = args.into_iter().map(|a| a.to_string_lossy().into_owned());
    let mut overrides = CliOverrides::default();
    let mut command: Option<String> = None;
    let mut positional: Vec<String> = Vec::new();
    let mut search_name: Option<String> = None;
    let mut product_id: Option<u64> = None;

    while let Some(arg) = args.next() {
        if arg == "--help" || arg == "-h" {
            return Ok(Parsed::Help);
        }
        if arg == "--version" || arg == "-V" {
            return Ok(Parsed::Version);
        }
        if !arg.starts_with("--") {
            if command.is_none() {
                command = Some(arg);
            } else {
                positional.push(arg);
            }
            continue;
        }

        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) => (flag.to_string(), Some(value.to_string())),
            None => (arg.clone(), None),
        };
        let mut value = || {
            inline
                .clone()
                .or_else(|| args.next())
                .ok_or_else(|| usage_err(format!("{flag} requires a value")))
        };

        match flag.as_str() {
            "--config" => overrides.config_file = Some(PathBuf::from(value()?)),
            "--installer-path" => overrides.installer_root = Some(PathBuf::from(value()?)),
            "--metadata-path" => overrides.metadata_root = Some(PathBuf::from(value()?)),
            "--search-name" => search_name = Some(value()?),
            "--product-id" => {
                let raw = value()?;
                let id = raw
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| usage_err(format!("invalid --product-id '{raw}'")))?;
                product_id = Some(id);
            }
            _ => return Err(usage_err(format!("unknown flag: {flag}"))),
        }
    }

    let Some(name) = command else {
        return Err(usage_err("missing command"));
    };

    let is_override = name == "override";
    if !is_override && (search_name.is_some() || product_id.is_some()) {
        return Err(usage_err(
            "--search-name and --product-id only apply to 'override'",
        ));
    }

    let command = match name.as_str() {
        "scan" => no_operands(&name, &positional, Command::Scan)?,
        "list" => no_operands(&name, &positional, Command::List)?,
        "daemon" => no_operands(&name, &positional, Command::Daemon)?,
        "show" => Command::Show {
            key: single_key(&name, positional)?,
        },
        "refresh" => Command::Refresh {
            key: single_key(&name, positional)?,
        },
        "override" => {
            let key = single_key(&name, positional)?;
            if search_name.is_none() && product_id.is_none() {
                return Err(usage_err(
                    "'override' needs --search-name and/or --product-id",
                ));
            }
            Command::Override {
                key,
                search_name,
                product_id,
            }
        }
        other => return Err(usage_err(format!("unknown command '{other}'"))),
    };

    Ok(Parsed::Run(CliArgs { command, overrides }))
}

fn no_operands(name: &str, positional: &[String], command: Command) -> Result<Command, UsageError> {
    if let Some(extra) = positional.first() {
        return Err(usage_err(format!("'{name}' takes no arguments, got '{extra}'")));
    }
    Ok(command)
}

fn single_key(name: &str, positional: Vec<String>) -> Result<String, UsageError> {
    let mut positional = positional.into_iter();
    match (positional.next(), positional.next()) {
        (Some(key), None) if !key.trim().is_empty() => Ok(key),
        (None, _) => Err(usage_err(format!("'{name}' requires a <key>"))),
        _ => Err(usage_err(format!("'{name}' takes exactly one <key>"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Parsed, UsageError> {
        parse_args(args.iter().map(OsString::from))
    }

    fn run(args: &[&str]) -> CliArgs {
        match parse(args) {
            Ok(Parsed::Run(cli)) => cli,
            other => panic!("expected a command, got {other:?}"),
        }
    }

    #[test]
    fn simple_commands() {
        assert_eq!(run(&["scan"]).command, Command::Scan);
        assert_eq!(run(&["list"]).command, Command::List);
        assert_eq!(run(&["daemon"]).command, Command::Daemon);
        assert_eq!(
            run(&["show", "Game_setup_x.exe"]).command,
            Command::Show {
                key: "Game_setup_x.exe".to_string()
            }
        );
        assert_eq!(
            run(&["refresh", "k"]).command,
            Command::Refresh { key: "k".to_string() }
        );
    }

    #[test]
    fn global_flags_in_both_forms() {
        let cli = run(&[
            "--installer-path",
            "/games",
            "scan",
            "--metadata-path=/meta",
            "--config",
            "shelf.toml",
        ]);
        assert_eq!(cli.overrides.installer_root, Some(PathBuf::from("/games")));
        assert_eq!(cli.overrides.metadata_root, Some(PathBuf::from("/meta")));
        assert_eq!(cli.overrides.config_file, Some(PathBuf::from("shelf.toml")));
    }

    #[test]
    fn override_flags() {
        let cli = run(&["override", "k", "--search-name", "Witcher 3", "--product-id=1207664643"]);
        assert_eq!(
            cli.command,
            Command::Override {
                key: "k".to_string(),
                search_name: Some("Witcher 3".to_string()),
                product_id: Some(1207664643),
            }
        );
    }

    #[test]
    fn help() {
        assert!(matches!(parse(&["--help"]), Ok(Parsed::Help)));
        assert!(matches!(parse(&["scan", "-h"]), Ok(Parsed::Help)));
        assert!(matches!(parse(&["--version"]), Ok(Parsed::Version)));
    }

    #[test]
    fn usage_errors() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["frobnicate"]).is_err());
        assert!(parse(&["show"]).is_err());
        assert!(parse(&["show", "a", "b"]).is_err());
        assert!(parse(&["scan", "extra"]).is_err());
        assert!(parse(&["override", "k"]).is_err());
        assert!(parse(&["override", "k", "--product-id", "abc"]).is_err());
        assert!(parse(&["scan", "--search-name", "x"]).is_err());
        assert!(parse(&["scan", "--installer-path"]).is_err());
        assert!(parse(&["scan", "--verbose"]).is_err());
    }
}
