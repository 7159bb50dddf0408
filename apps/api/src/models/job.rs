use serde::Serialize;
use serde_json::Value;

use crate::models::random_id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Processing,
}

/// Immediate answer of a generation endpoint. The job id is never tracked afterwards.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobTicket {
    pub success: bool,
    pub job_id: String,
    pub status: JobStatus,
    pub message: &'static str,
    pub estimated_time: &'static str,
    /// Raw response of the generation API, when one was called.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JobTicket {
    pub fn processing(message: &'static str, estimated_time: &'static str) -> Self {
        Self {
            success: true,
            job_id: random_id(),
            status: JobStatus::Processing,
            message,
            estimated_time,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ticket_serializes_camel_case_without_data() {
        let ticket = JobTicket::processing("Design generation started", "3-5 minutes");
        let value = serde_json::to_value(&ticket).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["status"], "processing");
        assert_eq!(value["estimatedTime"], "3-5 minutes");
        assert_eq!(value["jobId"].as_str().unwrap().len(), 9);
        assert!(value.get("data").is_none());
    }

    #[test]
    fn test_ticket_carries_data_when_set() {
        let ticket = JobTicket::processing("m", "t").with_data(json!({ "id": "chatcmpl-1" }));
        let value = serde_json::to_value(&ticket).unwrap();
        assert_eq!(value["data"]["id"], "chatcmpl-1");
    }
}
