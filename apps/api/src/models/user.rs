use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};

pub const MOCK_USER_ID: &str = "mock-user-id";
pub const MOCK_USER_NAME: &str = "Mock User";
/// Demo bearer token handed out by signup and login. Nothing validates it.
pub const MOCK_TOKEN: &str = "mock-jwt-token";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(serialize_with = "serialize_millis")]
    pub created_at: DateTime<Utc>,
}

/// ISO 8601 with millisecond precision, e.g. `2026-01-02T03:04:05.123Z`.
fn serialize_millis<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub user: User,
    pub token: &'static str,
}

impl AuthResponse {
    pub fn new(user: User) -> Self {
        Self {
            success: true,
            user,
            token: MOCK_TOKEN,
        }
    }
}
