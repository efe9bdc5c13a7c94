//! JSON bodies exchanged with the frontend.

use hai_core::NormalizedResponse;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// Body of `POST /chat`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChatReq {
    /// Free-text healthcare question.
    pub question: String,
}

/// Successful reply from `POST /chat`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChatRes {
    /// Model answer, unchanged.
    pub answer: String,
}

/// Error body returned by every endpoint alongside a non-2xx status.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
}

impl ErrorRes {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Reply from `POST /medicine-analyze`.
///
/// `data` is present when `parsed` is true; `raw` holds the model text otherwise.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MedicineAnalyzeRes {
    pub parsed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub data: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl From<NormalizedResponse> for MedicineAnalyzeRes {
    fn from(value: NormalizedResponse) -> Self {
        match value {
            NormalizedResponse::Parsed(data) => Self {
                parsed: true,
                data: Some(data),
                raw: None,
            },
            NormalizedResponse::Unparsed(raw) => Self {
                parsed: false,
                data: None,
                raw: Some(raw),
            },
        }
    }
}

/// Reply from `GET /health`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
    /// Whether an inference API key was configured at startup.
    pub inference_configured: bool,
    /// RFC 3339 timestamp of the check.
    pub checked_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_medicine_res_matches_core_serialization() {
        let parsed = hai_core::normalize(r#"{"name":"Loratadine"}"#);
        let unparsed = hai_core::normalize("no json here");

        for response in [parsed, unparsed] {
            let from_core = serde_json::to_value(&response).unwrap();
            let from_api = serde_json::to_value(MedicineAnalyzeRes::from(response)).unwrap();
            assert_eq!(from_core, from_api);
        }
    }

    #[test]
    fn test_unparsed_res_omits_data() {
        let body = serde_json::to_value(MedicineAnalyzeRes::from(NormalizedResponse::Unparsed(
            "text".into(),
        )))
        .unwrap();
        assert_eq!(body, json!({"parsed": false, "raw": "text"}));
    }
}
