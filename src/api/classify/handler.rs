// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Classification endpoint handler
//!
//! Sequences the per-request pipeline: validate → store → normalize → OCR →
//! aggregate → classify. The stored upload is a scoped slot, so it is removed
//! on every exit path, including the early-return error arms below.

use axum::http::StatusCode;
use axum::{extract::State, Json};
use axum_extra::extract::multipart::MultipartError;
use axum_extra::extract::Multipart;
use tracing::{debug, info, warn};

use super::response::ClassifyResponse;
use super::upload::validate_filename;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::classification::{aggregate, classify};
use crate::storage::UploadSlot;
use crate::vision::normalize_in_place;

/// POST /v1/classify - Classify an uploaded document image
///
/// Accepts a multipart form with a single part named `image` and returns the
/// recognized text plus a keyword-derived document label.
///
/// # Errors
/// - 400 Bad Request: missing part, empty filename, disallowed extension,
///   or unreadable multipart form
/// - 413 Payload Too Large: upload exceeds the configured maximum
/// - 503 Service Unavailable: the OCR engine never initialized
/// - 500 Internal Server Error: OCR inference or storage failed
pub async fn classify_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ClassifyResponse>, ApiError> {
    let max_bytes = state.config.max_upload_bytes;

    // 1. Locate the `image` part. A body-limit breach can already trip here
    // when a large part precedes it, so the mapping applies to the scan too.
    let mut image_field = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| map_multipart_error(e, max_bytes))?
    {
        if field.name() == Some("image") {
            image_field = Some(field);
            break;
        }
    }
    let field = image_field.ok_or(ApiError::MissingFile)?;

    // 2. Validate the declared filename before reading any bytes
    let filename = field.file_name().map(|s| s.to_string());
    let filename = validate_filename(filename.as_deref())?.to_string();
    debug!("Classification request for upload '{}'", filename);

    // 3. Read the body; enforce the upload size limit before anything is stored
    let bytes = field
        .bytes()
        .await
        .map_err(|e| map_multipart_error(e, max_bytes))?;
    if bytes.len() > max_bytes {
        warn!(
            "Upload '{}' rejected: {} bytes exceeds limit of {}",
            filename,
            bytes.len(),
            max_bytes
        );
        return Err(ApiError::PayloadTooLarge { max_bytes });
    }

    // 4. Resolve the engine handle; fail fast before touching storage
    let engine = state.engine.clone().ok_or_else(|| {
        warn!("OCR engine unavailable, rejecting request");
        ApiError::EngineUnavailable("engine failed to initialize at startup".to_string())
    })?;

    // 5. Store the upload in a request-scoped slot (removed on drop)
    let slot = UploadSlot::create(&state.config.upload_dir, &filename, &bytes)
        .map_err(|e| ApiError::InternalError(e.to_string()))?;

    // 6. Bound the image; failures are logged and the original bytes stand
    match normalize_in_place(slot.path(), state.config.max_image_dim) {
        Ok((w, h)) => debug!("Upload normalized to {}x{}", w, h),
        Err(e) => warn!(
            "Normalization failed for '{}': {}; proceeding with original upload",
            filename, e
        ),
    }

    // 7. Run OCR
    let detections = engine
        .read_text(slot.path())
        .await
        .map_err(|e| ApiError::InferenceFailure(e.to_string()))?;

    // 8. Aggregate text and classify
    let text = aggregate(&detections);
    let document_type = classify(&text);
    info!(
        "Upload '{}' classified as {} ({} detections, {} chars)",
        filename,
        document_type,
        detections.len(),
        text.len()
    );

    Ok(Json(ClassifyResponse::new(document_type, text)))
}

/// Map a multipart read failure onto the error taxonomy. The extractor
/// classifies a breached body limit as 413 (including a `LengthLimitError`
/// surfacing through a stream read error), which this keys on instead of
/// the error's display text.
fn map_multipart_error(e: MultipartError, max_bytes: usize) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge { max_bytes }
    } else {
        ApiError::InvalidRequest(e.to_string())
    }
}
