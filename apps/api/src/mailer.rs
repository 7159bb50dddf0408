//! Email delivery for verification codes.
//!
//! `ResendMailer` talks to the Resend HTTP API. `LogMailer` only writes the
//! message to the log and is used when no API key is configured.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::auth::codes::CODE_TTL_MINUTES;

const VERIFICATION_SUBJECT: &str = "Your verification code";

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Email API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_verification_code(&self, to: &str, code: &str) -> Result<(), MailerError>;
}

#[derive(Debug, Serialize)]
struct ResendEmail<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: String,
    text: String,
}

#[derive(Clone)]
pub struct ResendMailer {
    client: Client,
    api_key: String,
    from: String,
    base_url: String,
}

impl ResendMailer {
    pub fn new(api_key: String, from: String, base_url: String) -> anyhow::Result<Self> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()?,
            api_key,
            from,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send_verification_code(&self, to: &str, code: &str) -> Result<(), MailerError> {
        let email = ResendEmail {
            from: &self.from,
            to: [to],
            subject: VERIFICATION_SUBJECT,
            html: verification_html(code),
            text: verification_text(code),
        };

        let response = self
            .client
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&email)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MailerError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        info!(to = %to, "Verification email sent");
        Ok(())
    }
}

/// Development mailer: the code only reaches the log.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_verification_code(&self, to: &str, code: &str) -> Result<(), MailerError> {
        info!(to = %to, code = %code, "Email delivery disabled; verification code logged only");
        Ok(())
    }
}

fn verification_text(code: &str) -> String {
    format!("Your verification code is {code}. It expires in {CODE_TTL_MINUTES} minutes.")
}

fn verification_html(code: &str) -> String {
    format!(
        "<p>Your verification code is:</p>\
         <p style=\"font-size:24px;font-weight:bold;letter-spacing:4px\">{code}</p>\
         <p>It expires in {CODE_TTL_MINUTES} minutes.</p>"
    )
}
