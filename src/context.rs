//! Application context bundling all port trait objects.

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{info, warn};

use crate::adapters::live::{FileCredentialStore, HttpTaskStore, LiveClock};
use crate::adapters::recording::RecordingTaskStore;
use crate::adapters::replaying::ReplayingTaskStore;
use crate::auth::AuthContext;
use crate::cassette::format::Cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::config::Config;
use crate::ports::{AuthGateway, Clock, CredentialStore, TaskStore};

/// Bundles the ports one CLI run needs.
///
/// Constructors wire up different adapter implementations (live,
/// recording, replaying). The store and the auth gateway are always the
/// same underlying object, so a recorded session captures both.
pub struct AppContext {
    /// Task service.
    pub store: Arc<dyn TaskStore>,
    /// Login and registration.
    pub auth_api: Arc<dyn AuthGateway>,
    /// Persisted bearer token.
    pub credentials: Box<dyn CredentialStore>,
    /// Token the store attaches to requests.
    pub auth: AuthContext,
    /// Source of "today" for due-date urgency.
    pub clock: Box<dyn Clock>,
    /// Optional cassette recorder; written to disk on drop.
    recorder: Option<Arc<Mutex<CassetteRecorder>>>,
}

impl AppContext {
    /// Picks live, recording or replaying adapters from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the token file or cassette cannot be read, or if
    /// the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, String> {
        match (&config.record, &config.replay) {
            (Some(path), _) => Self::recording(config, path),
            (None, Some(path)) => Self::replaying(config, path),
            (None, None) => Self::live(config),
        }
    }

    /// Creates a context that talks to the service over HTTP.
    ///
    /// # Errors
    ///
    /// Returns an error if the token file cannot be read or the HTTP client
    /// cannot be built.
    pub fn live(config: &Config) -> Result<Self, String> {
        let (credentials, auth) = load_credentials(config)?;
        let http = Arc::new(HttpTaskStore::new(config, auth.clone()).map_err(|e| e.to_string())?);
        Ok(Self {
            store: Arc::clone(&http) as Arc<dyn TaskStore>,
            auth_api: http,
            credentials,
            auth,
            clock: Box::new(LiveClock),
            recorder: None,
        })
    }

    /// Creates a live context that also records every store call. The
    /// cassette is written to `path` when this context is dropped.
    ///
    /// # Errors
    ///
    /// Same as [`AppContext::live`].
    pub fn recording(config: &Config, path: &Path) -> Result<Self, String> {
        let (credentials, auth) = load_credentials(config)?;
        let http = HttpTaskStore::new(config, auth.clone()).map_err(|e| e.to_string())?;
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(
            path,
            "taskdeck-session",
            config.api_url.clone(),
        )));
        let store = Arc::new(RecordingTaskStore::new(http, Arc::clone(&recorder)));
        info!(path = %path.display(), "recording store calls");
        Ok(Self {
            store: Arc::clone(&store) as Arc<dyn TaskStore>,
            auth_api: store,
            credentials,
            auth,
            clock: Box::new(LiveClock),
            recorder: Some(recorder),
        })
    }

    /// Creates a context whose store is served from the cassette at `path`.
    /// No network access happens.
    ///
    /// # Errors
    ///
    /// Returns an error if the token file or the cassette cannot be read.
    pub fn replaying(config: &Config, path: &Path) -> Result<Self, String> {
        let cassette = Cassette::load(path)?;
        let (credentials, auth) = load_credentials(config)?;
        let store = Arc::new(ReplayingTaskStore::new(&cassette));
        info!(path = %path.display(), calls = cassette.interactions.len(), "replaying store calls");
        Ok(Self {
            store: Arc::clone(&store) as Arc<dyn TaskStore>,
            auth_api: store,
            credentials,
            auth,
            clock: Box::new(LiveClock),
            recorder: None,
        })
    }
}

fn load_credentials(config: &Config) -> Result<(Box<dyn CredentialStore>, AuthContext), String> {
    let credentials = FileCredentialStore::new(config.token_path());
    let token = credentials.load().map_err(|e| e.to_string())?;
    Ok((Box::new(credentials), AuthContext::new(token)))
}

impl Drop for AppContext {
    fn drop(&mut self) {
        if let Some(recorder) = self.recorder.take() {
            let recorder = recorder.lock().unwrap_or_else(PoisonError::into_inner);
            match recorder.save() {
                Ok(path) => eprintln!("Recording saved to: {}", path.display()),
                Err(e) => warn!(error = %e, "failed to write cassette"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use super::*;
    use crate::cassette::format::Interaction;

    fn config_in(dir: &Path) -> Config {
        Config { home: dir.join("home"), ..Config::default() }
    }

    #[tokio::test]
    async fn replaying_context_serves_cassette() {
        let dir = std::env::temp_dir().join("taskdeck_ctx_replay");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("list.cassette.yaml");
        let cassette = Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            api_url: "http://localhost:8080".into(),
            interactions: vec![Interaction {
                seq: 0,
                operation: "list_tasks".into(),
                input: json!({}),
                output: json!({"Ok": [{"id": 1, "title": "replayed", "state": "PENDING"}]}),
            }],
        };
        std::fs::write(&path, serde_yaml::to_string(&cassette).unwrap()).unwrap();

        let mut config = config_in(&dir);
        config.replay = Some(path);
        let ctx = AppContext::from_config(&config).unwrap();
        let tasks = ctx.store.list_tasks().await.unwrap();

        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "replayed");
        assert!(!ctx.auth.is_authenticated());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn live_context_picks_up_saved_token() {
        let dir = std::env::temp_dir().join("taskdeck_ctx_token");
        let config = config_in(&dir);
        std::fs::create_dir_all(&config.home).unwrap();
        std::fs::write(config.token_path(), "abc123\n").unwrap();

        let ctx = AppContext::live(&config).unwrap();
        assert_eq!(ctx.auth.token().as_deref(), Some("abc123"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn recording_context_writes_cassette_on_drop() {
        let dir = std::env::temp_dir().join("taskdeck_ctx_record");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("out").join("session.cassette.yaml");
        let mut config = config_in(&dir);
        config.record = Some(path.clone());

        drop(AppContext::from_config(&config).unwrap());

        let cassette = Cassette::load(&path).unwrap();
        assert_eq!(cassette.name, "taskdeck-session");
        assert!(cassette.interactions.is_empty());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_cassette_is_an_error() {
        let dir = std::env::temp_dir().join("taskdeck_ctx_missing");
        let config = config_in(&dir);
        let result = AppContext::replaying(&config, &dir.join("nope.yaml"));
        assert!(result.is_err());
    }
}
