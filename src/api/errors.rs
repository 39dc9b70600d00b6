// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire shape for every failure response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone)]
pub enum ApiError {
    /// No part named `image` was present in the multipart form
    MissingFile,
    /// The upload carried no filename
    EmptyFilename,
    /// The filename extension is outside the allow-list
    UnsupportedType(String),
    /// The multipart form itself could not be read
    InvalidRequest(String),
    /// The upload exceeded the configured maximum size
    PayloadTooLarge { max_bytes: usize },
    /// The OCR engine never initialized; requests fail fast
    EngineUnavailable(String),
    /// The OCR engine raised during read_text
    InferenceFailure(String),
    InternalError(String),
}

impl ApiError {
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::MissingFile
            | ApiError::EmptyFilename
            | ApiError::UnsupportedType(_)
            | ApiError::InvalidRequest(_) => 400,
            ApiError::PayloadTooLarge { .. } => 413,
            ApiError::EngineUnavailable(_) => 503,
            ApiError::InferenceFailure(_) | ApiError::InternalError(_) => 500,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::MissingFile => write!(f, "No image uploaded"),
            ApiError::EmptyFilename => write!(f, "Empty filename"),
            ApiError::UnsupportedType(ext) => {
                write!(f, "Only PNG and JPG images are allowed (got '{}')", ext)
            }
            ApiError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ApiError::PayloadTooLarge { max_bytes } => {
                write!(f, "File too large. Max {} bytes", max_bytes)
            }
            ApiError::EngineUnavailable(msg) => {
                write!(f, "OCR engine not available: {}", msg)
            }
            ApiError::InferenceFailure(msg) => write!(f, "OCR processing failed: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, axum::response::Json(self.to_response())).into_response()
    }
}
