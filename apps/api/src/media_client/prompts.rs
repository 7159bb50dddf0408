// Prompt fragments sent to the video model.

/// Appended to every video prompt.
pub const QUALITY_SUFFIX: &str = "High quality, professional video.";

/// Builds the prompt forwarded to the video model.
///
/// The style slot stays in place even when empty, so an unstyled prompt keeps a double space.
pub fn enhance_video_prompt(prompt: &str, style: Option<&str>) -> String {
    let style_part = style.map(|s| format!("Style: {s}.")).unwrap_or_default();
    format!("{prompt}. {style_part} {QUALITY_SUFFIX}")
}
