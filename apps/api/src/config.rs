use anyhow::{Context, Result};

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_RESEND_BASE_URL: &str = "https://api.resend.com";
const DEFAULT_EMAIL_FROM: &str = "Creator Studio <noreply@creatorstudio.app>";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    /// Unset means verification emails are only logged.
    pub resend_api_key: Option<String>,
    pub resend_base_url: String,
    pub email_from: String,
    /// Unset means verification codes live in process memory.
    pub redis_url: Option<String>,
    pub app_env: String,
    /// Echo verification codes back in the response body for local development.
    pub expose_dev_codes: bool,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let app_env = optional_env("APP_ENV").unwrap_or_else(|| "development".to_string());
        let expose_dev_codes = match optional_env("EXPOSE_DEV_CODES") {
            Some(v) => parse_flag(&v)
                .with_context(|| format!("EXPOSE_DEV_CODES must be a boolean, got '{v}'"))?,
            None => app_env != "production",
        };

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_base_url: optional_env("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            resend_api_key: optional_env("RESEND_API_KEY"),
            resend_base_url: optional_env("RESEND_BASE_URL")
                .unwrap_or_else(|| DEFAULT_RESEND_BASE_URL.to_string()),
            email_from: optional_env("EMAIL_FROM").unwrap_or_else(|| DEFAULT_EMAIL_FROM.to_string()),
            redis_url: optional_env("REDIS_URL"),
            app_env,
            expose_dev_codes,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Empty values count as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag_accepts_common_spellings() {
        assert_eq!(parse_flag("true"), Some(true));
        assert_eq!(parse_flag(" ON "), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("No"), Some(false));
    }

    #[test]
    fn test_parse_flag_rejects_garbage() {
        assert_eq!(parse_flag("maybe"), None);
        assert_eq!(parse_flag(""), None);
    }
}
