use std::path::{Path, PathBuf};
use std::time::Duration;
use tagmend_audit::{RunAction, RunLog};
use tagmend_core::{DEFAULT_CONFIG_PATH, FALLBACK_CONFIG_PATH, MAX_SETTLE_SECONDS, RunConfig};
use tagmend_inventory::AzCliClient;

/// Resolve and load the run configuration.
///
/// An explicitly-passed path must exist. The default path falls back to
/// the dotdir location, then to built-in defaults, so a bare checkout
/// works without any file.
pub fn load_config_or_exit(config_arg: &str) -> RunConfig {
    let requested = PathBuf::from(config_arg);
    if requested.exists() {
        return config_or_exit(&requested);
    }
    if config_arg == DEFAULT_CONFIG_PATH {
        let fallback = PathBuf::from(FALLBACK_CONFIG_PATH);
        if fallback.exists() {
            return config_or_exit(&fallback);
        }
        return RunConfig::default();
    }
    eprintln!("error: configuration file not found: {}", requested.display());
    std::process::exit(1);
}

fn config_or_exit(path: &Path) -> RunConfig {
    RunConfig::load(path).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    })
}

pub fn client_or_exit() -> AzCliClient {
    if !AzCliClient::is_available() {
        eprintln!("error: az CLI not found in PATH; install the Azure CLI and run `az login`");
        std::process::exit(1);
    }
    AzCliClient::new()
}

pub fn open_log_or_exit(path: &Path) -> RunLog {
    RunLog::open(path).unwrap_or_else(|e| {
        eprintln!("error: failed to open run log: {e}");
        std::process::exit(1);
    })
}

/// Append to the run log, surfacing failures without ending the run.
pub fn log_or_warn(log: &mut RunLog, action: RunAction) {
    if let Err(err) = log.append(action) {
        eprintln!("warning: run log append failed: {err}");
    }
}

pub fn apply_settle_override_or_exit(config: &mut RunConfig, settle_secs: Option<u64>) {
    if let Some(secs) = settle_secs {
        if secs > MAX_SETTLE_SECONDS {
            eprintln!("error: --settle-secs must be at most {MAX_SETTLE_SECONDS} (got {secs})");
            std::process::exit(1);
        }
        config.settle_delay = Duration::from_secs(secs);
    }
}

pub fn yes_no(ok: bool) -> &'static str {
    if ok { "yes" } else { "no" }
}
