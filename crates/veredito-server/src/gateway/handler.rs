use axum::{
    Json,
    extract::{Multipart, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{debug, instrument};

use crate::gateway::error::GatewayError;
use crate::gateway::payload::AuditResponse;
use crate::gateway::state::HandlerState;
use veredito::audit::{AuditOutcome, ImageSet};
use veredito::constants::{MAX_IMAGE_BYTES, VEREDITO_STATUS_HEADER, is_allowed_image_type};

#[instrument(
    skip(state, multipart),
    fields(
        audit_id = %uuid::Uuid::new_v4(),
        request_id = tracing::field::Empty,
        image_count = tracing::field::Empty
    )
)]
pub async fn audit_handler(
    State(state): State<HandlerState>,
    multipart: Multipart,
) -> Result<Response, GatewayError> {
    let submission = read_submission(multipart).await?;
    tracing::Span::current().record("image_count", submission.images.len());

    let images = ImageSet::new(submission.images);
    let outcome = state.engine.audit_submission(&submission.data, &images).await?;
    tracing::Span::current().record("request_id", outcome.request_id);

    make_response(outcome)
}

/// One decoded audit request: the submission document plus the uploaded
/// photographs, in part order.
pub(crate) struct Submission {
    pub data: serde_json::Value,
    pub images: Vec<Vec<u8>>,
}

/// Reads the multipart body: any number of `images` file parts and exactly
/// one `data` part holding the submission JSON. Unknown parts are skipped;
/// upstream clients attach extra bookkeeping fields.
pub(crate) async fn read_submission(mut multipart: Multipart) -> Result<Submission, GatewayError> {
    let mut images: Vec<Vec<u8>> = Vec::new();
    let mut data: Option<serde_json::Value> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| GatewayError::InvalidRequest(format!("Malformed multipart body: {}", e)))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("images") => {
                let index = images.len() + 1;
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(|e| {
                    GatewayError::InvalidRequest(format!("Failed to read image {}: {}", index, e))
                })?;
                validate_image(index, content_type.as_deref(), &bytes)?;
                images.push(bytes.to_vec());
            }
            Some("data") => {
                let text = field.text().await.map_err(|e| {
                    GatewayError::InvalidRequest(format!("Failed to read submission data: {}", e))
                })?;
                let parsed = serde_json::from_str(&text).map_err(|e| {
                    GatewayError::InvalidRequest(format!(
                        "Submission data is not valid JSON: {}",
                        e
                    ))
                })?;
                data = Some(parsed);
            }
            _ => {
                debug!(
                    field = name.as_deref().unwrap_or("<unnamed>"),
                    "skipping unknown multipart field"
                );
            }
        }
    }

    let data = data
        .ok_or_else(|| GatewayError::InvalidRequest("Missing required field: data".to_string()))?;

    Ok(Submission { data, images })
}

/// Validates one uploaded image before it reaches the engine. `index` is
/// 1-based to match the labels reviewers see.
pub(crate) fn validate_image(
    index: usize,
    content_type: Option<&str>,
    bytes: &[u8],
) -> Result<(), GatewayError> {
    if bytes.is_empty() {
        return Err(GatewayError::InvalidRequest(format!(
            "Image {} is required and must not be empty",
            index
        )));
    }

    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(GatewayError::InvalidRequest(format!(
            "Image {} must not exceed 10MB",
            index
        )));
    }

    match content_type {
        Some(ct) if is_allowed_image_type(ct) => Ok(()),
        _ => Err(GatewayError::InvalidRequest(format!(
            "Image {} must be JPG, JPEG or PNG",
            index
        ))),
    }
}

pub(crate) fn make_response(outcome: AuditOutcome) -> Result<Response, GatewayError> {
    let status = outcome.verdict.status;
    let body = AuditResponse::from(outcome);

    let mut headers = HeaderMap::new();
    headers.insert(
        VEREDITO_STATUS_HEADER,
        HeaderValue::from_static(status.as_str()),
    );
    Ok((StatusCode::OK, headers, Json(body)).into_response())
}
