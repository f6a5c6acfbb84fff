//! Command-line interface: argument parsing and the commands that run
//! without the TUI.
//!
//! ```ignore
//! use cloudinv::cli::{parse_args, run_cli_command};
//!
//! let command = parse_args(std::env::args());
//! if let Some(result) = runtime.block_on(run_cli_command(&command)) {
//!     return result;
//! }
//! // No CLI command, continue to TUI
//! ```

pub mod args;

pub use args::{parse_args, CliCommand};

use color_eyre::eyre::{eyre, Result};
use tracing::info;

use crate::adapters::FileSessionStore;
use crate::traits::SessionStore;

/// The current version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const USAGE: &str = "\
Usage: cloudinv [OPTIONS]

Options:
  -p, --path <PATH>     Open PATH after signing in (e.g. /allec2)
  -c, --config <FILE>   Read configuration from FILE
      --sign-out        Forget the stored session and exit
  -V, --version         Print version
  -h, --help            Print this help

Environment:
  CLOUDINV_REGION, CLOUDINV_USER_POOL_ID, CLOUDINV_CLIENT_ID,
  CLOUDINV_API_NAME, CLOUDINV_API_URL   override configuration
  CLOUDINV_LOG                          log filter (default: info)";

/// Run a command that does not need the TUI.
///
/// Returns `None` for [`CliCommand::Run`].
pub async fn run_cli_command(command: &CliCommand) -> Option<Result<()>> {
    match command {
        CliCommand::Run { .. } => None,
        CliCommand::Version => {
            println!("cloudinv {}", VERSION);
            Some(Ok(()))
        }
        CliCommand::Help => {
            println!("{}", USAGE);
            Some(Ok(()))
        }
        CliCommand::SignOut => Some(handle_sign_out_command().await),
        CliCommand::Usage(message) => Some(Err(eyre!("{}\n\n{}", message, USAGE))),
    }
}

/// Remove the stored session file.
pub async fn handle_sign_out_command() -> Result<()> {
    let store = FileSessionStore::new().ok_or_else(|| eyre!("cannot locate home directory"))?;
    sign_out_store(&store).await?;
    println!("Signed out.");
    Ok(())
}

async fn sign_out_store(store: &dyn SessionStore) -> Result<()> {
    store.clear().await.map_err(|e| eyre!("{}", e))?;
    info!("Stored session cleared from the command line");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::InMemorySessionStore;
    use crate::adapters::mock::MockIdentityProvider;

    #[tokio::test]
    async fn test_run_returns_none() {
        assert!(run_cli_command(&CliCommand::default()).await.is_none());
    }

    #[tokio::test]
    async fn test_usage_is_an_error() {
        let result = run_cli_command(&CliCommand::Usage("bad".to_string())).await;
        assert!(matches!(result, Some(Err(_))));
    }

    #[tokio::test]
    async fn test_sign_out_clears_store() {
        let store = InMemorySessionStore::with_session(MockIdentityProvider::fresh_session());
        sign_out_store(&store).await.unwrap();
        assert!(store.get_session().is_none());
    }

    #[test]
    fn test_version_format() {
        let parts: Vec<&str> = VERSION.split('.').collect();
        assert!(parts.len() >= 2, "Version should have at least major.minor");
    }
}
