use reqwest::StatusCode;

/// Errors surfaced by the CAIC client.
///
/// Bulk (paginated) queries never return `Request` or `Validation` errors;
/// those are absorbed by the retry budget. Single-object queries surface
/// `Request` and turn `Validation` into `None`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Connection failure, HTTP status >= 400, or an undecodable body.
    #[error("CAIC request failed: {0}")]
    Request(String),
    /// Decoded JSON did not fit the expected record shape.
    #[error("unable to validate CAIC response: {0}")]
    Validation(String),
    /// Invalid caller-supplied argument or configuration value.
    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn is_request(&self) -> bool {
        matches!(self, Error::Request(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(err.to_string())
    }
}

#[derive(Debug, serde::Deserialize)]
pub(crate) struct CaicErrorResponse {
    #[serde(default)]
    pub(crate) error: Option<String>,
    #[serde(default)]
    pub(crate) message: Option<String>,
    #[serde(default)]
    pub(crate) detail: Option<String>,
}

pub(crate) fn format_status_error(status: StatusCode, url: &str, body: &str) -> Error {
    // Some endpoints respond with {"error": ...} or {"message": ...}.
    let server_message = serde_json::from_str::<CaicErrorResponse>(body)
        .ok()
        .and_then(|e| e.error.or(e.message).or(e.detail));

    let body = server_message.as_deref().unwrap_or(body).trim();

    if status == StatusCode::NOT_FOUND {
        return Error::Request(format!(
            "HTTP 404 for url ({}): {} (no such object or endpoint)",
            url, body
        ));
    }

    Error::Request(format!("HTTP {} for url ({}): {}", status.as_u16(), url, body))
}
