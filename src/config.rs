//! Runtime configuration read from the environment.
//!
//! A `.env` file in the working directory is loaded first (via `dotenvy`),
//! so every variable below can also be set there.
//!
//! | Variable | Default |
//! |---|---|
//! | `TASKDECK_API_URL` | `http://localhost:8080` |
//! | `TASKDECK_TIMEOUT_SECS` | `30` |
//! | `TASKDECK_HOME` | `.taskdeck` |
//! | `TASKDECK_RECORD` | unset: path of a cassette to record into |
//! | `TASKDECK_REPLAY` | unset: path of a cassette to replay from |

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default origin of the task service.
pub const DEFAULT_API_URL: &str = "http://localhost:8080";
/// Default per-request timeout. AI calls can be slow.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Resolved configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Origin of the task service, without a trailing slash.
    pub api_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Directory holding persisted client state (the token file).
    pub home: PathBuf,
    /// When set, store interactions are recorded to this cassette.
    pub record: Option<PathBuf>,
    /// When set, store interactions are served from this cassette.
    pub replay: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            home: PathBuf::from(".taskdeck"),
            record: None,
            replay: None,
        }
    }
}

impl Config {
    /// Loads `.env` (if present) and reads the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error string if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, String> {
        // A missing .env file is the normal case.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error string if `TASKDECK_TIMEOUT_SECS` is not a positive
    /// integer, or if both record and replay are requested.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let api_url = get("TASKDECK_API_URL")
            .map_or(defaults.api_url, |url| url.trim_end_matches('/').to_string());

        let timeout = match get("TASKDECK_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(format!(
                        "TASKDECK_TIMEOUT_SECS must be a positive integer, got {raw:?}"
                    ))
                }
            },
            None => defaults.timeout,
        };

        let record = get("TASKDECK_RECORD").map(PathBuf::from);
        let replay = get("TASKDECK_REPLAY").map(PathBuf::from);
        if record.is_some() && replay.is_some() {
            return Err("TASKDECK_RECORD and TASKDECK_REPLAY cannot both be set".to_string());
        }

        Ok(Self {
            api_url,
            timeout,
            home: get("TASKDECK_HOME").map_or(defaults.home, PathBuf::from),
            record,
            replay,
        })
    }

    /// Path of the persisted bearer token.
    #[must_use]
    pub fn token_path(&self) -> PathBuf {
        self.home.join("token")
    }
}
