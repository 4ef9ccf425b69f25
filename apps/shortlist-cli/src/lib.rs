//! Shared plumbing for the command-line binaries.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Args;
use tracing_subscriber::EnvFilter;

use shortlist_core::config::{Config, Settings};
use shortlist_core::Error;

/// Logs go to stderr so stdout stays machine-readable. `RUST_LOG` overrides
/// the default `info` filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).with_target(false).init();
}

/// `--config` flag shared by both binaries.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Base configuration file; `<stem>.<env>.toml` is layered on top.
    #[arg(long, env = "SHORTLIST_CONFIG", default_value = "shortlist.toml")]
    pub config: PathBuf,
}

impl ConfigArgs {
    pub fn settings(&self) -> anyhow::Result<Settings> {
        load_settings(&self.config)
    }
}

pub fn load_settings(config_path: &Path) -> anyhow::Result<Settings> {
    let config = Config::load_from(config_path)?;
    tracing::debug!(env = config.env_name(), path = %config_path.display(), "loading configuration");
    config.settings().with_context(|| format!("invalid configuration ({})", config_path.display()))
}

/// 2 for caller input errors, 1 for everything else.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    let client = err.chain().filter_map(|e| e.downcast_ref::<Error>()).any(Error::is_client_error);
    if client {
        2
    } else {
        1
    }
}

/// Prints `err` with a message that tells caller mistakes from service
/// failures, and picks the matching exit code.
pub fn report_failure(err: &anyhow::Error) -> ExitCode {
    let code = exit_code(err);
    if code == 2 {
        eprintln!("❌ Invalid request: {err:#}");
    } else {
        eprintln!("💥 Recommendation service failure: {err:#}");
    }
    ExitCode::from(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{Command, FromArgMatches};

    fn config_command() -> Command {
        ConfigArgs::augment_args(Command::new("shortlist"))
    }

    #[test]
    fn config_flag_reads_env_and_defaults() {
        let cmd = config_command();
        let arg = cmd.get_arguments().find(|a| a.get_id() == "config").unwrap();
        assert_eq!(arg.get_env().and_then(|v| v.to_str()), Some("SHORTLIST_CONFIG"));

        let defaults: Vec<_> = arg.get_default_values().iter().map(|v| v.to_str()).collect();
        assert_eq!(defaults, [Some("shortlist.toml")]);

        let matches = config_command().try_get_matches_from(["shortlist", "--config", "/etc/shortlist.toml"]).unwrap();
        assert_eq!(ConfigArgs::from_arg_matches(&matches).unwrap().config, PathBuf::from("/etc/shortlist.toml"));
    }

    #[test]
    fn exit_codes_follow_error_kind() {
        let client = anyhow::Error::new(Error::InvalidRequest("top_k must be between 1 and 10".into()));
        assert_eq!(exit_code(&client), 2);
        let wrapped = anyhow::Error::new(Error::EmbeddingUnavailable("timeout".into())).context("recommend failed");
        assert_eq!(exit_code(&wrapped), 1);
        assert_eq!(exit_code(&anyhow::anyhow!("disk full")), 1);
    }
}
