//! Collects interactions and writes them as a cassette file.

use std::path::PathBuf;

use chrono::Utc;

use super::format::{Cassette, Interaction};

/// Records store interactions and writes them as a YAML cassette.
#[derive(Debug)]
pub struct CassetteRecorder {
    path: PathBuf,
    name: String,
    api_url: String,
    interactions: Vec<Interaction>,
    next_seq: u64,
}

impl CassetteRecorder {
    /// Creates a recorder that will write to `path`.
    pub fn new(
        path: impl Into<PathBuf>,
        name: impl Into<String>,
        api_url: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            api_url: api_url.into(),
            interactions: Vec::new(),
            next_seq: 0,
        }
    }

    /// Appends an interaction. `seq` is assigned automatically.
    pub fn record(
        &mut self,
        operation: impl Into<String>,
        input: serde_json::Value,
        output: serde_json::Value,
    ) {
        self.interactions.push(Interaction {
            seq: self.next_seq,
            operation: operation.into(),
            input,
            output,
        });
        self.next_seq += 1;
    }

    /// Number of interactions recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.interactions.len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.interactions.is_empty()
    }

    /// Writes everything recorded so far, creating parent directories as
    /// needed. Can be called again later to rewrite the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self) -> Result<PathBuf, std::io::Error> {
        let cassette = Cassette {
            name: self.name.clone(),
            recorded_at: Utc::now(),
            api_url: self.api_url.clone(),
            interactions: self.interactions.clone(),
        };
        let yaml = serde_yaml::to_string(&cassette).map_err(std::io::Error::other)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, yaml)?;
        Ok(self.path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_and_save() {
        let dir = std::env::temp_dir().join("taskdeck_recorder_test");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("sub").join("session.cassette.yaml");

        let mut recorder = CassetteRecorder::new(&path, "session", "http://localhost:8080");
        assert!(recorder.is_empty());
        recorder.record("list_tasks", json!({}), json!({ "Ok": [] }));
        recorder.record("delete_task", json!({ "id": 4 }), json!({ "Err": "NotFound" }));
        assert_eq!(recorder.len(), 2);

        let written = recorder.save().expect("save should succeed");
        assert_eq!(written, path);

        let cassette = Cassette::load(&path).unwrap();
        assert_eq!(cassette.name, "session");
        assert_eq!(cassette.api_url, "http://localhost:8080");
        assert_eq!(cassette.interactions[0].seq, 0);
        assert_eq!(cassette.interactions[1].seq, 1);
        assert_eq!(cassette.interactions[1].operation, "delete_task");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
