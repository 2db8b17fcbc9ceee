use thiserror::Error;

/// Errors surfaced by the request gateway.
///
/// `Http` means the server answered with a non-2xx status; `Network` means
/// we never got an answer (DNS, refused connection, timeout). Handlers turn
/// `Http` into user-facing text and let everything else propagate.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{message}")]
    Http {
        status: u16,
        status_text: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid API response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Build the structured HTTP error for a non-2xx response.
    pub fn http(status: u16, status_text: &str, body: &str) -> Self {
        ApiError::Http {
            status,
            status_text: status_text.to_string(),
            message: format!(
                "API request failed with status {} {}: {}",
                status, status_text, body
            ),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_message_embeds_status_and_body() {
        let err = ApiError::http(500, "Internal Server Error", "{\"detail\":\"boom\"}");
        assert_eq!(err.status(), Some(500));
        assert_eq!(
            err.to_string(),
            "API request failed with status 500 Internal Server Error: {\"detail\":\"boom\"}"
        );
    }

    #[test]
    fn test_non_http_errors_have_no_status() {
        let err = ApiError::Config("missing token".to_string());
        assert_eq!(err.status(), None);
    }
}
