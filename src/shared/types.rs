use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Envelope status, JSend style
///
/// - `success`: the request was handled and `data` holds the result
/// - `fail`: the request was rejected because of the client input (4xx)
/// - `error`: the server failed while handling the request (5xx)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ApiStatus {
    Success,
    Fail,
    Error,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub status: ApiStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Wrapper used by create endpoints: `{ "data": <record> }`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Created<T> {
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: ApiStatus::Success,
            data: Some(data),
            message: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            status: ApiStatus::Fail,
            data: None,
            message: Some(message.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            status: ApiStatus::Error,
            data: None,
            message: Some(message.into()),
        }
    }
}
