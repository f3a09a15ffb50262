use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use veredito::audit::AuditError;
use veredito::constants::VEREDITO_STATUS_HEADER;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("approval assembly failed: {0}")]
    ApprovalFailed(String),

    #[error("internal error: {0}")]
    InternalError(String),
}

impl From<AuditError> for GatewayError {
    fn from(e: AuditError) -> Self {
        match e {
            AuditError::NoImages
            | AuditError::EmptyImage { .. }
            | AuditError::InvalidSubmission { .. } => GatewayError::InvalidRequest(e.to_string()),
            // The audit itself absorbs provider failures into rejections;
            // an error escaping here means the approval transform failed.
            AuditError::ApprovalAssembly { source } => {
                GatewayError::ApprovalFailed(source.to_string())
            }
        }
    }
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, error_message, veredito_status) = match &self {
            GatewayError::InvalidRequest(_) => {
                (StatusCode::BAD_REQUEST, self.to_string(), "invalid_request")
            }
            GatewayError::ApprovalFailed(_) => {
                (StatusCode::BAD_GATEWAY, self.to_string(), "approval_error")
            }
            GatewayError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                self.to_string(),
                "internal_error",
            ),
        };

        let mut headers = HeaderMap::new();
        headers.insert(
            VEREDITO_STATUS_HEADER,
            HeaderValue::from_str(veredito_status).unwrap_or(HeaderValue::from_static("error")),
        );

        let body = Json(ErrorResponse {
            error: error_message,
            code: status.as_u16(),
        });

        (status, headers, body).into_response()
    }
}
