use crate::api::ApiError;

/// Connection settings for the Botpanel backend.
///
/// Read once at startup from `BOTPANEL_API_URL` and `BOTPANEL_API_TOKEN`;
/// both are required and there is no default. The struct is immutable for
/// the process lifetime.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub api_token: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ApiError> {
        let base_url = required_env("BOTPANEL_API_URL")?;
        let api_token = required_env("BOTPANEL_API_TOKEN")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token,
        })
    }

    pub fn new(base_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token: api_token.into(),
        }
    }
}

fn required_env(name: &str) -> Result<String, ApiError> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::Config(format!(
            "required environment variable {} is not set",
            name
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_stripped() {
        let config = Config::new("https://panel.example.com/api/", "token123");
        assert_eq!(config.base_url, "https://panel.example.com/api");
    }

    #[test]
    fn test_bare_url_unchanged() {
        let config = Config::new("https://panel.example.com", "token123");
        assert_eq!(config.base_url, "https://panel.example.com");
    }
}
