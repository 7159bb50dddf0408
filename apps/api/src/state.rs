use std::sync::Arc;

use crate::auth::codes::CodeStore;
use crate::config::Config;
use crate::mailer::Mailer;
use crate::media_client::VideoGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Verification codes. In-memory unless REDIS_URL is set.
    pub codes: Arc<dyn CodeStore>,
    pub mailer: Arc<dyn Mailer>,
    /// Video generation backend. Default: OpenAiVideoClient.
    pub video: Arc<dyn VideoGenerator>,
}
