use thiserror::Error;

/// Every way a call to the PDF backend can fail, as seen by the client.
/// All variants carry a human-readable message for alerts and logging.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    // ── Client or server side validation ─────────────────────────────────────
    #[error("{0}")]
    Validation(String),

    // ── Transport ────────────────────────────────────────────────────────────
    #[error("Network error: {0}")]
    Network(String),

    // ── Non-success HTTP status ──────────────────────────────────────────────
    #[error("Not found: {}", .detail.as_deref().unwrap_or("resource does not exist"))]
    NotFound { detail: Option<String> },

    #[error("Server error ({status}){}", .detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default())]
    Server { status: u16, detail: Option<String> },

    // ── Response body ────────────────────────────────────────────────────────
    #[error("Parse error: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        ClientError::Validation(message.into())
    }

    pub fn network(message: impl Into<String>) -> Self {
        ClientError::Network(message.into())
    }

    /// Maps a non-2xx response to an error, reading the FastAPI-style
    /// `{"detail": ...}` body when there is one. Any other body is ignored.
    pub fn from_response(status: u16, body: &str) -> Self {
        let detail = extract_detail(body);
        match status {
            404 => ClientError::NotFound { detail },
            400 | 413 | 415 | 422 => ClientError::Validation(
                detail.unwrap_or_else(|| format!("Request rejected with status {status}")),
            ),
            _ => ClientError::Server { status, detail },
        }
    }

    /// The message the backend attached to the failure, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ClientError::Validation(msg) => Some(msg),
            ClientError::NotFound { detail } | ClientError::Server { detail, .. } => {
                detail.as_deref()
            }
            ClientError::Network(_) | ClientError::Decode(_) => None,
        }
    }

    /// Text for an alert: the server detail when present, otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.detail().map(str::to_string).unwrap_or_else(|| fallback.to_string())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }
}

fn extract_detail(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(map)) => match map.get("detail") {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(serde_json::Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        },
        // Error pages from proxies and hosts are not a message for the user.
        Ok(_) | Err(_) => None,
    }
}
