pub mod client;
pub mod models;

use thiserror::Error;

pub use client::ApiClient;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// Non-2xx reply. `message` comes from the body when the backend sent one.
    #[error("HTTP {status}: {}", .message.as_deref().unwrap_or("no details"))]
    Status { status: u16, message: Option<String> },
    #[error("token not found in response")]
    MissingToken,
}

impl ApiError {
    /// Text for a toast or inline banner. A message sent by the backend wins
    /// over `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Status { message: Some(m), .. } => m.clone(),
            ApiError::Transport(e) if e.is_connect() || e.is_timeout() => {
                "Could not reach the server. Please try again.".to_string()
            }
            _ => fallback.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_message_wins() {
        let err = ApiError::Status { status: 401, message: Some("Wrong password".into()) };
        assert_eq!(err.user_message("Invalid credentials"), "Wrong password");
        assert_eq!(err.to_string(), "HTTP 401: Wrong password");
    }

    #[test]
    fn bare_status_uses_fallback() {
        let err = ApiError::Status { status: 500, message: None };
        assert_eq!(err.user_message("Sign up failed"), "Sign up failed");
        assert_eq!(ApiError::MissingToken.user_message("Invalid credentials"), "Invalid credentials");
    }
}
