//! Error and result types shared across the crate.
//!
//! [`ApiError`] covers everything that can go wrong while talking to the
//! portal API or preparing an upload. Binary-level glue (terminal setup,
//! config IO) uses `anyhow` through [`Result`].

pub type Result<T> = anyhow::Result<T>;

/// Failure of a portal API call.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (DNS, refused, timeout...).
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("{}", status_text(*.status, .message.as_deref()))]
    Status { status: u16, message: Option<String> },

    /// A 2xx response whose body could not be read as expected.
    #[error("invalid response: {0}")]
    Decode(String),

    /// A local image could not be used for upload.
    #[error("{0}")]
    Image(String),
}

fn status_text(status: u16, message: Option<&str>) -> String {
    match message {
        Some(m) => format!("server returned {status}: {m}"),
        None => format!("server returned {status}"),
    }
}

impl ApiError {
    /// Message for a notification: the server's own message when it sent one,
    /// otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Status {
                message: Some(m), ..
            } if !m.trim().is_empty() => m.clone(),
            _ => fallback.to_string(),
        }
    }

    /// Short reason suitable for "An error occurred: <reason>" style messages.
    pub fn reason(&self) -> String {
        match self {
            ApiError::Status {
                message: Some(m), ..
            } => m.clone(),
            ApiError::Status { status, .. } => format!("HTTP {status}"),
            other => other.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
