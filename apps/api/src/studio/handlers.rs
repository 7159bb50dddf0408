//! Axum route handlers for the generation tools.

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::errors::AppError;
use crate::extract::{field, truthy, JsonBody};
use crate::media_client::prompts::enhance_video_prompt;
use crate::media_client::{VideoRequest, DEFAULT_DURATION_SECS, DEFAULT_RESOLUTION};
use crate::models::job::JobTicket;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────
//
// Fields stay untyped: required ones only need to be truthy, and `options` is
// opaque except for the few keys text-to-video reads.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignRequest {
    pub project_name: Option<Value>,
    pub design_type: Option<Value>,
    pub prompt: Option<Value>,
    pub user_id: Option<Value>,
    /// `{colorScheme, style, format, dimensions}` from the dashboard.
    pub options: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailRequest {
    pub title: Option<Value>,
    pub prompt: Option<Value>,
    pub template: Option<Value>,
    pub user_id: Option<Value>,
    /// `{dimensions, format, fontSize}` from the dashboard.
    pub options: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoProcessRequest {
    pub video_url: Option<Value>,
    pub prompt: Option<Value>,
    pub user_id: Option<Value>,
    /// `{quality, format, speed, transitions}` from the dashboard.
    pub options: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoGenerateRequest {
    pub prompt: Option<Value>,
    pub user_id: Option<Value>,
    /// `{duration, resolution, style}`; duration arrives as a string or a number.
    pub options: Option<Value>,
}

/// Opaque request values are only logged, as JSON.
fn loggable(value: &Option<Value>) -> Value {
    value.clone().unwrap_or(Value::Null)
}

/// `duration` is forwarded untouched unless it is falsy.
fn duration_or_default(duration: Option<&Value>) -> Value {
    match duration {
        Some(v) if truthy(Some(v)).is_some() => v.clone(),
        _ => json!(DEFAULT_DURATION_SECS),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/design/generate
pub async fn handle_design_generate(
    JsonBody(req): JsonBody<DesignRequest>,
) -> Result<Json<JobTicket>, AppError> {
    let (Some(project_name), Some(design_type), Some(prompt), Some(user_id)) = (
        field(&req.project_name),
        field(&req.design_type),
        field(&req.prompt),
        field(&req.user_id),
    ) else {
        return Err(AppError::missing_fields());
    };

    let ticket = JobTicket::processing("Design generation started", "3-5 minutes");
    info!(
        job_id = %ticket.job_id,
        user_id = %user_id,
        project_name = %project_name,
        design_type = %design_type,
        prompt = %prompt,
        options = %loggable(&req.options),
        "Design generation job created"
    );

    Ok(Json(ticket))
}

/// POST /api/thumbnail/generate
pub async fn handle_thumbnail_generate(
    JsonBody(req): JsonBody<ThumbnailRequest>,
) -> Result<Json<JobTicket>, AppError> {
    let (Some(title), Some(prompt), Some(user_id)) = (
        field(&req.title),
        field(&req.prompt),
        field(&req.user_id),
    ) else {
        return Err(AppError::missing_fields());
    };

    let ticket = JobTicket::processing("Thumbnail generation started", "2-3 minutes");
    info!(
        job_id = %ticket.job_id,
        user_id = %user_id,
        title = %title,
        prompt = %prompt,
        template = %loggable(&req.template),
        options = %loggable(&req.options),
        "Thumbnail generation job created"
    );

    Ok(Json(ticket))
}

/// POST /api/video/process
pub async fn handle_video_process(
    JsonBody(req): JsonBody<VideoProcessRequest>,
) -> Result<Json<JobTicket>, AppError> {
    let (Some(video_url), Some(prompt), Some(user_id)) = (
        field(&req.video_url),
        field(&req.prompt),
        field(&req.user_id),
    ) else {
        return Err(AppError::missing_fields());
    };

    let ticket = JobTicket::processing("Video processing started", "5-10 minutes");
    info!(
        job_id = %ticket.job_id,
        user_id = %user_id,
        video_url = %video_url,
        prompt = %prompt,
        options = %loggable(&req.options),
        "Video processing job created"
    );

    Ok(Json(ticket))
}

/// POST /api/video/generate
///
/// Forwards an enhanced prompt to the video API once and echoes its response as `data`.
pub async fn handle_video_generate(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<VideoGenerateRequest>,
) -> Result<Json<JobTicket>, AppError> {
    let (Some(prompt), Some(user_id)) = (field(&req.prompt), field(&req.user_id)) else {
        return Err(AppError::missing_fields());
    };

    let options = req.options.as_ref();
    let style = truthy(options.and_then(|o| o.get("style")));
    let resolution = truthy(options.and_then(|o| o.get("resolution")))
        .unwrap_or_else(|| DEFAULT_RESOLUTION.to_string());

    let request = VideoRequest {
        prompt: enhance_video_prompt(&prompt, style.as_deref()),
        resolution,
        duration: duration_or_default(options.and_then(|o| o.get("duration"))),
    };

    let data = state
        .video
        .generate(&request)
        .await
        .map_err(|e| AppError::upstream("Video generation failed", e))?;

    let ticket = JobTicket::processing("Video generation started with Sora AI", "2-5 minutes");
    info!(
        job_id = %ticket.job_id,
        user_id = %user_id,
        prompt = %prompt,
        options = %loggable(&req.options),
        "Video generation job created"
    );

    Ok(Json(ticket.with_data(data)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_defaults_on_falsy_values() {
        assert_eq!(duration_or_default(None), json!(5));
        assert_eq!(duration_or_default(Some(&Value::Null)), json!(5));
        assert_eq!(duration_or_default(Some(&json!(""))), json!(5));
        assert_eq!(duration_or_default(Some(&json!(0))), json!(5));
    }

    #[test]
    fn test_duration_passes_through_given_value() {
        assert_eq!(duration_or_default(Some(&json!("10"))), json!("10"));
        assert_eq!(duration_or_default(Some(&json!(15))), json!(15));
    }

    #[test]
    fn test_loggable_passes_through_any_shape() {
        let options = Some(json!({ "fontSize": 48, "transitions": true }));
        assert_eq!(loggable(&options)["fontSize"], 48);
        assert_eq!(loggable(&Some(json!("x"))), json!("x"));
        assert_eq!(loggable(&None), Value::Null);
    }
}
