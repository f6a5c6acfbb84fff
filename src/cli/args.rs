//! Command-line argument parsing.

use std::path::PathBuf;

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// Run the TUI (default)
    Run {
        /// Initial path, as if typed into the address bar
        path: Option<String>,
        /// Configuration file overriding `~/.cloudinv/config.json`
        config: Option<PathBuf>,
    },
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Clear the stored session and exit
    SignOut,
    /// Arguments could not be parsed
    Usage(String),
}

impl Default for CliCommand {
    fn default() -> Self {
        CliCommand::Run {
            path: None,
            config: None,
        }
    }
}

/// Parse command-line arguments (program name first).
///
/// `--version`, `--help` and `--sign-out` win over everything else. Unknown
/// flags are reported rather than ignored.
///
/// # Examples
///
/// ```
/// use cloudinv::cli::{parse_args, CliCommand};
///
/// let args = vec!["cloudinv".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    let mut path = None;
    let mut config = None;
    let mut args = args.skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" => return CliCommand::Version,
            "--help" | "-h" => return CliCommand::Help,
            "--sign-out" => return CliCommand::SignOut,
            "--path" | "-p" => match args.next() {
                Some(value) => path = Some(value),
                None => return CliCommand::Usage("--path needs a value".to_string()),
            },
            "--config" | "-c" => match args.next() {
                Some(value) => config = Some(PathBuf::from(value)),
                None => return CliCommand::Usage("--config needs a value".to_string()),
            },
            other => {
                if let Some(value) = other.strip_prefix("--path=") {
                    path = Some(value.to_string());
                } else if let Some(value) = other.strip_prefix("--config=") {
                    config = Some(PathBuf::from(value));
                } else {
                    return CliCommand::Usage(format!("unknown argument '{}'", other));
                }
            }
        }
    }
    CliCommand::Run { path, config }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliCommand {
        let mut all = vec!["cloudinv".to_string()];
        all.extend(args.iter().map(|a| a.to_string()));
        parse_args(all.into_iter())
    }

    #[test]
    fn test_parse_no_args() {
        assert_eq!(parse(&[]), CliCommand::default());
    }

    #[test]
    fn test_parse_version_and_help() {
        assert_eq!(parse(&["--version"]), CliCommand::Version);
        assert_eq!(parse(&["-V"]), CliCommand::Version);
        assert_eq!(parse(&["--path", "/allec2", "--help"]), CliCommand::Help);
    }

    #[test]
    fn test_parse_sign_out() {
        assert_eq!(parse(&["--sign-out"]), CliCommand::SignOut);
    }

    #[test]
    fn test_parse_path_and_config() {
        assert_eq!(
            parse(&["--path", "/allrds", "--config=/tmp/c.json"]),
            CliCommand::Run {
                path: Some("/allrds".to_string()),
                config: Some(PathBuf::from("/tmp/c.json")),
            }
        );
        assert_eq!(
            parse(&["--path=/alls3"]),
            CliCommand::Run {
                path: Some("/alls3".to_string()),
                config: None,
            }
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse(&["--path"]), CliCommand::Usage(_)));
        assert!(matches!(parse(&["--config"]), CliCommand::Usage(_)));
        assert_eq!(
            parse(&["--bogus"]),
            CliCommand::Usage("unknown argument '--bogus'".to_string())
        );
    }
}
