//! Request body extraction shared by every POST handler.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::errors::AppError;

/// JSON body extractor with lenient parsing.
///
/// Unlike `axum::Json` it ignores `Content-Type`, and a body that is empty or not a
/// JSON object is read as `{}`. Required-field checks in the handlers then answer
/// with their usual 400 instead of an axum rejection.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;

        let value = match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(map)) => Value::Object(map),
            _ => Value::Object(Map::new()),
        };

        serde_json::from_value(value)
            .map(JsonBody)
            .map_err(|e| AppError::Validation(format!("Invalid request body: {e}")))
    }
}

/// Reads a required field the way the dashboard's JavaScript checks it: absent, `null`,
/// `false`, `0` and `""` count as missing. Any other value is rendered as a string.
pub fn field(value: &Option<Value>) -> Option<String> {
    truthy(value.as_ref())
}

/// Same as [`field`] for a value looked up inside a loosely typed object.
pub fn truthy(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct SampleBody {
        email: Option<Value>,
    }

    async fn extract(body: &'static str) -> Result<SampleBody, AppError> {
        let req = Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from(body))
            .unwrap();
        JsonBody::<SampleBody>::from_request(req, &()).await.map(|b| b.0)
    }

    #[tokio::test]
    async fn test_object_body_is_parsed() {
        let sample = extract(r#"{"email":"a@b.co"}"#).await.unwrap();
        assert_eq!(field(&sample.email).as_deref(), Some("a@b.co"));
    }

    #[tokio::test]
    async fn test_empty_and_non_object_bodies_read_as_empty() {
        assert!(extract("").await.unwrap().email.is_none());
        assert!(extract("not json").await.unwrap().email.is_none());
        assert!(extract("[1,2]").await.unwrap().email.is_none());
    }

    #[tokio::test]
    async fn test_non_string_field_is_accepted() {
        let sample = extract(r#"{"email":42}"#).await.unwrap();
        assert_eq!(field(&sample.email).as_deref(), Some("42"));
    }

    #[test]
    fn test_field_treats_falsy_values_as_missing() {
        assert_eq!(field(&None), None);
        assert_eq!(field(&Some(Value::Null)), None);
        assert_eq!(field(&Some(json!(""))), None);
        assert_eq!(field(&Some(json!(false))), None);
        assert_eq!(field(&Some(json!(0))), None);
        assert_eq!(field(&Some(json!(0.0))), None);
    }

    #[test]
    fn test_field_renders_truthy_scalars() {
        assert_eq!(field(&Some(json!("x"))).as_deref(), Some("x"));
        assert_eq!(field(&Some(json!(123456))).as_deref(), Some("123456"));
        assert_eq!(field(&Some(json!(true))).as_deref(), Some("true"));
        assert_eq!(field(&Some(json!(" "))).as_deref(), Some(" "));
    }

    #[test]
    fn test_truthy_on_missing_lookup() {
        let options = json!({ "style": "bold" });
        assert_eq!(truthy(options.get("style")).as_deref(), Some("bold"));
        assert_eq!(truthy(options.get("format")), None);
        assert_eq!(truthy(json!("x").get("style")), None);
    }
}
