//! Live adapter for the `TaskStore` and `AuthGateway` ports over HTTP.

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::auth::AuthContext;
use crate::cancel::CancelToken;
use crate::config::Config;
use crate::endpoints;
use crate::error::StoreError;
use crate::model::{
    AiDecision, AiDecisionLog, AuthToken, Credentials, GenerateSubtasksRequest, Subtask,
    SubtaskId, Task, TaskDraft, TaskId, TaskPatch, TaskState,
};
use crate::ports::{AuthGateway, StoreFuture, TaskStore};

/// Task store client that talks to the REST service with `reqwest`.
pub struct HttpTaskStore {
    client: Client,
    api_url: String,
    auth: AuthContext,
}

impl HttpTaskStore {
    /// Creates a client for `config.api_url` that authenticates with `auth`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &Config, auth: AuthContext) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StoreError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, api_url: config.api_url.clone(), auth })
    }


    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        debug!(method = method.as_str(), path, authenticated = token.is_some(), "sending request");
        let builder = self.client.request(method, format!("{}{path}", self.api_url));
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<String, StoreError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(status = status.as_u16(), bytes = body.len(), "received response");

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(ErrorBody::into_message)
                .unwrap_or(body);
            return Err(StoreError::from_status(status.as_u16(), message));
        }
        Ok(body)
    }

    async fn call<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, StoreError> {
        let body = self.execute(builder).await?;
        serde_json::from_str(&body).map_err(|e| StoreError::Decode(e.to_string()))
    }

    async fn call_sequence<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        what: &str,
    ) -> Result<Vec<T>, StoreError> {
        let body = self.execute(builder).await?;
        decode_sequence(&body, what)
    }

    async fn call_empty(&self, builder: RequestBuilder) -> Result<(), StoreError> {
        self.execute(builder).await.map(drop)
    }
}

/// Error payloads the service is known to send.
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        self.message.or(self.error)
    }
}

/// Decodes a response that should be a JSON array.
///
/// Anything that is not an array (empty body, object, HTML error page)
/// becomes an empty sequence. An array whose elements do not decode is an
/// error: callers downstream rely on getting well-typed elements.
///
/// # Errors
///
/// Returns [`StoreError::Decode`] if an array element has the wrong shape.
pub fn decode_sequence<T: DeserializeOwned>(body: &str, what: &str) -> Result<Vec<T>, StoreError> {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value @ serde_json::Value::Array(_)) => serde_json::from_value(value)
            .map_err(|e| StoreError::Decode(format!("malformed {what}: {e}"))),
        Ok(other) => {
            warn!(what, kind = json_kind(&other), "expected an array, using an empty list");
            Ok(Vec::new())
        }
        Err(e) => {
            warn!(what, error = %e, "response is not JSON, using an empty list");
            Ok(Vec::new())
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[derive(serde::Serialize)]
struct StateBody {
    state: TaskState,
}

impl TaskStore for HttpTaskStore {
    fn list_tasks(&self) -> StoreFuture<'_, Vec<Task>> {
        let (ns, token) = self.auth.session();
        let builder = self.request(Method::GET, &endpoints::tasks(ns), token.as_deref());
        Box::pin(async move { self.call_sequence(builder, "tasks").await })
    }

    fn create_task(&self, draft: &TaskDraft) -> StoreFuture<'_, Task> {
        let (ns, token) = self.auth.session();
        let builder =
            self.request(Method::POST, &endpoints::tasks(ns), token.as_deref()).json(draft);
        Box::pin(async move { self.call(builder).await })
    }

    fn update_task(&self, id: TaskId, patch: &TaskPatch) -> StoreFuture<'_, Task> {
        let (ns, token) = self.auth.session();
        let builder =
            self.request(Method::PUT, &endpoints::task(ns, id), token.as_deref()).json(patch);
        Box::pin(async move { self.call(builder).await })
    }

    fn update_state(&self, id: TaskId, state: TaskState) -> StoreFuture<'_, Task> {
        let (ns, token) = self.auth.session();
        let builder = self
            .request(Method::PUT, &endpoints::task_state(ns, id), token.as_deref())
            .json(&StateBody { state });
        Box::pin(async move { self.call(builder).await })
    }

    fn delete_task(&self, id: TaskId) -> StoreFuture<'_, ()> {
        let (ns, token) = self.auth.session();
        let builder = self.request(Method::DELETE, &endpoints::task(ns, id), token.as_deref());
        Box::pin(async move { self.call_empty(builder).await })
    }

    fn request_ai_decision(&self, id: TaskId) -> StoreFuture<'_, AiDecision> {
        let (_, token) = self.auth.session();
        let builder = self.request(Method::POST, &endpoints::ai_decision(id), token.as_deref());
        Box::pin(async move { self.call(builder).await })
    }

    fn list_ai_logs(&self, id: TaskId) -> StoreFuture<'_, Vec<AiDecisionLog>> {
        let (ns, token) = self.auth.session();
        let builder = self.request(Method::GET, &endpoints::ai_logs(ns, id), token.as_deref());
        Box::pin(async move { self.call_sequence(builder, "AI decision logs").await })
    }

    fn list_subtasks(&self, task_id: TaskId, cancel: &CancelToken) -> StoreFuture<'_, Vec<Subtask>> {
        let (_, token) = self.auth.session();
        let builder = self.request(Method::GET, &endpoints::subtasks(task_id), token.as_deref());
        let cancel = cancel.clone();
        Box::pin(async move {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    debug!(task_id, "subtask request canceled");
                    Err(StoreError::Canceled)
                }
                result = self.call_sequence(builder, "subtasks") => result,
            }
        })
    }

    fn generate_subtasks(
        &self,
        task_id: TaskId,
        request: &GenerateSubtasksRequest,
    ) -> StoreFuture<'_, Vec<Subtask>> {
        let (_, token) = self.auth.session();
        let builder = self
            .request(Method::POST, &endpoints::generate_subtasks(task_id), token.as_deref())
            .json(request);
        Box::pin(async move { self.call_sequence(builder, "generated subtasks").await })
    }

    fn update_subtask(&self, task_id: TaskId, subtask: &Subtask) -> StoreFuture<'_, Subtask> {
        let (_, token) = self.auth.session();
        let builder = self
            .request(Method::PUT, &endpoints::subtask(task_id, subtask.id), token.as_deref())
            .json(subtask);
        Box::pin(async move { self.call(builder).await })
    }

    fn delete_subtask(&self, task_id: TaskId, subtask_id: SubtaskId) -> StoreFuture<'_, ()> {
        let (_, token) = self.auth.session();
        let builder =
            self.request(Method::DELETE, &endpoints::subtask(task_id, subtask_id), token.as_deref());
        Box::pin(async move { self.call_empty(builder).await })
    }
}

impl AuthGateway for HttpTaskStore {
    fn login(&self, credentials: &Credentials) -> StoreFuture<'_, AuthToken> {
        let builder = self.request(Method::POST, endpoints::LOGIN, None).json(credentials);
        Box::pin(async move { self.call(builder).await })
    }

    fn register(&self, credentials: &Credentials) -> StoreFuture<'_, AuthToken> {
        let builder = self.request(Method::POST, endpoints::REGISTER, None).json(credentials);
        Box::pin(async move { self.call(builder).await })
    }
}
