//! Recording adapters that capture interactions to cassettes.

pub mod task_store;

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use serde_json::json;

use crate::cassette::recorder::CassetteRecorder;

pub use task_store::RecordingTaskStore;

/// Serializes a call argument for the cassette.
pub(crate) fn input_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Value {
    serde_json::to_value(value)
        .unwrap_or_else(|e| json!({ "unserializable": e.to_string() }))
}

/// Records a `Result` interaction using serde's `{"Ok": v}` / `{"Err": e}`
/// encoding, so the replaying adapter can decode it back into the same type.
pub(crate) fn record_result<T, E>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    operation: &str,
    input: serde_json::Value,
    result: &Result<T, E>,
) where
    T: Serialize,
    E: Serialize,
{
    let output = input_json(result);
    recorder.lock().unwrap_or_else(PoisonError::into_inner).record(operation, input, output);
}
