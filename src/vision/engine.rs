// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! OCR engine contract consumed by the classification pipeline

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One raw OCR result unit.
///
/// Every field is optional on purpose: engines return variably shaped
/// results, and only `text` matters to the pipeline. A detection without
/// text is malformed and gets dropped by the aggregator, not treated as
/// an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    /// Quadrilateral region in image space, clockwise from top-left
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<[[f32; 2]; 4]>,
    /// Recognized text for the region
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Recognition confidence (0.0-1.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

impl Detection {
    /// Convenience constructor for a text-only detection
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            region: None,
            text: Some(text.into()),
            confidence: None,
        }
    }
}

/// Contract for OCR engines.
///
/// The handle is initialized once per process and shared read-only across
/// concurrent requests afterward; implementations wrapping a non-reentrant
/// library must serialize internally behind `&self`.
///
/// Detections are consumed in the order the engine returns them, assumed
/// reading order. If an engine's ordering is non-deterministic across runs,
/// aggregated text (and classification of ambiguous documents) will not be
/// reproducible either.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Engine identifier for logs and the health endpoint
    fn name(&self) -> &'static str;

    /// Run detection + recognition over the image at `path`
    async fn read_text(&self, path: &Path) -> anyhow::Result<Vec<Detection>>;
}
