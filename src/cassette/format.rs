//! Cassette data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded store call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    /// Position in the session (assigned by the recorder).
    pub seq: u64,
    /// Store operation, e.g. `list_tasks` or `update_state`.
    pub operation: String,
    /// Arguments of the call.
    #[serde(default)]
    pub input: serde_json::Value,
    /// Result of the call, as `{"Ok": value}` or `{"Err": error}`.
    pub output: serde_json::Value,
}

/// A recorded session against one task service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cassette {
    /// Human-readable name.
    pub name: String,
    /// When the session was recorded.
    pub recorded_at: DateTime<Utc>,
    /// Origin of the service that was recorded.
    pub api_url: String,
    /// Calls in the order they completed.
    pub interactions: Vec<Interaction>,
}

impl Cassette {
    /// Reads a cassette from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &std::path::Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
        serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn loads_hand_written_yaml() {
        let dir = std::env::temp_dir().join("taskdeck_cassette_format");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("hand.cassette.yaml");
        std::fs::write(
            &path,
            "name: hand\n\
             recorded_at: 2024-06-15T10:30:00Z\n\
             api_url: http://localhost:8080\n\
             interactions:\n\
             - seq: 0\n\
             \x20 operation: delete_task\n\
             \x20 input: {id: 3}\n\
             \x20 output: {Ok: null}\n",
        )
        .unwrap();

        let cassette = Cassette::load(&path).unwrap();
        assert_eq!(cassette.interactions.len(), 1);
        assert_eq!(cassette.interactions[0].operation, "delete_task");
        assert_eq!(cassette.interactions[0].input, json!({ "id": 3 }));
        assert_eq!(cassette.interactions[0].output, json!({ "Ok": null }));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_is_reported_with_path() {
        let err = Cassette::load(std::path::Path::new("/nonexistent/x.cassette.yaml")).unwrap_err();
        assert!(err.contains("/nonexistent/x.cassette.yaml"));
    }
}
