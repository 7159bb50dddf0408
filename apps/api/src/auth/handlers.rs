//! Axum route handlers for the Auth API.

use anyhow::Context;
use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::auth::codes::{check_code, VerificationEntry};
use crate::errors::AppError;
use crate::extract::{field, JsonBody};
use crate::models::random_id;
use crate::models::user::{AuthResponse, User, MOCK_USER_ID, MOCK_USER_NAME};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: Option<Value>,
    pub password: Option<Value>,
    pub name: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<Value>,
    pub password: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct SendVerificationRequest {
    pub email: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendVerificationResponse {
    pub success: bool,
    pub message: &'static str,
    /// Only filled in when dev codes are exposed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyEmailRequest {
    pub email: Option<Value>,
    pub code: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: &'static str,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/auth/signup
///
/// Issues a new mock user with a random id. Nothing is persisted.
pub async fn handle_signup(
    JsonBody(req): JsonBody<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let (Some(email), Some(_), Some(name)) =
        (field(&req.email), field(&req.password), field(&req.name))
    else {
        return Err(AppError::missing_fields());
    };

    let user = User {
        id: random_id(),
        email,
        name,
        created_at: Utc::now(),
    };
    info!(user_id = %user.id, email = %user.email, "User signed up");

    Ok((StatusCode::CREATED, Json(AuthResponse::new(user))))
}

/// POST /api/auth/login
///
/// Accepts any credentials and answers with the fixed mock user.
pub async fn handle_login(
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let (Some(email), Some(_)) = (field(&req.email), field(&req.password)) else {
        return Err(AppError::missing_fields());
    };

    let user = User {
        id: MOCK_USER_ID.to_string(),
        email,
        name: MOCK_USER_NAME.to_string(),
        created_at: Utc::now(),
    };
    info!(email = %user.email, "User logged in");

    Ok(Json(AuthResponse::new(user)))
}

/// POST /api/auth/send-verification
///
/// Issues a fresh 6-digit code for the email, replacing any earlier one, and mails it.
pub async fn handle_send_verification(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<SendVerificationRequest>,
) -> Result<Json<SendVerificationResponse>, AppError> {
    let email = field(&req.email)
        .ok_or_else(|| AppError::Validation("Email is required".to_string()))?;

    let entry = VerificationEntry::issue(Utc::now());
    let code = entry.code.clone();

    state
        .codes
        .put(&email, entry)
        .await
        .context("Failed to store verification code")?;
    info!(email = %email, "Verification code issued");
    debug!(email = %email, code = %code, "Verification code value");

    state
        .mailer
        .send_verification_code(&email, &code)
        .await
        .context("Failed to deliver verification code")?;

    Ok(Json(SendVerificationResponse {
        success: true,
        message: "Verification code sent",
        dev_code: state.config.expose_dev_codes.then_some(code),
    }))
}

/// POST /api/auth/verify-email
///
/// Consumes the stored code on success. Expired entries stay until overwritten.
pub async fn handle_verify_email(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<VerifyEmailRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let (Some(email), Some(code)) = (field(&req.email), field(&req.code)) else {
        return Err(AppError::Validation(
            "Email and code are required".to_string(),
        ));
    };

    let stored = state
        .codes
        .get(&email)
        .await
        .map_err(|e| AppError::upstream("Failed to verify email", e))?;

    check_code(stored.as_ref(), &code, Utc::now())
        .map_err(|failure| AppError::Validation(failure.to_string()))?;

    state
        .codes
        .remove(&email)
        .await
        .map_err(|e| AppError::upstream("Failed to verify email", e))?;
    info!(email = %email, "Email verified");

    Ok(Json(MessageResponse {
        success: true,
        message: "Email verified successfully",
    }))
}
