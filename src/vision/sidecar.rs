// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! OCR sidecar client
//!
//! Detection and recognition inference runs in an external sidecar service;
//! this client posts image bytes and parses whatever detections come back.
//! Loading the sidecar's models is expensive, so the service probes readiness
//! once at startup and keeps this handle for the life of the process.

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use super::engine::{Detection, OcrEngine};

#[derive(serde::Serialize)]
struct ReadTextRequest {
    image: String,
    languages: Vec<String>,
}

#[derive(serde::Deserialize)]
struct ReadTextResponse {
    detections: Vec<Detection>,
}

/// Client for an OCR sidecar exposing `POST /v1/readtext` and `GET /health`
pub struct SidecarOcrEngine {
    client: Client,
    endpoint: String,
    languages: Vec<String>,
}

impl SidecarOcrEngine {
    /// Create a new sidecar client
    pub fn new(endpoint: &str, languages: &[String]) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;

        let endpoint = endpoint.trim_end_matches('/').to_string();
        info!(
            "OCR sidecar client configured: endpoint={}, languages={:?}",
            endpoint, languages
        );

        Ok(Self {
            client,
            endpoint,
            languages: languages.to_vec(),
        })
    }

    /// Create a client and require the sidecar to be reachable.
    ///
    /// This is the startup path: the readiness probe runs exactly once, and
    /// a failure here leaves the service in its fail-fast unavailable state.
    pub async fn connect(endpoint: &str, languages: &[String]) -> Result<Self> {
        let engine = Self::new(endpoint, languages)?;
        if !engine.health_check().await {
            anyhow::bail!("OCR sidecar at {} failed readiness probe", engine.endpoint);
        }
        Ok(engine)
    }

    /// Check if the sidecar is healthy
    pub async fn health_check(&self) -> bool {
        match self
            .client
            .get(format!("{}/health", self.endpoint))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                debug!("OCR sidecar health check failed: {}", e);
                false
            }
        }
    }
}

#[async_trait]
impl OcrEngine for SidecarOcrEngine {
    fn name(&self) -> &'static str {
        "ocr-sidecar"
    }

    async fn read_text(&self, path: &Path) -> Result<Vec<Detection>> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read stored image {}", path.display()))?;

        let request = ReadTextRequest {
            image: STANDARD.encode(&bytes),
            languages: self.languages.clone(),
        };

        let response = self
            .client
            .post(format!("{}/v1/readtext", self.endpoint))
            .json(&request)
            .send()
            .await
            .context("OCR sidecar request failed")?
            .error_for_status()
            .context("OCR sidecar returned an error status")?;

        let parsed: ReadTextResponse = response
            .json()
            .await
            .context("failed to parse OCR sidecar response")?;

        debug!(
            "OCR sidecar returned {} detections for {}",
            parsed.detections.len(),
            path.display()
        );

        Ok(parsed.detections)
    }
}
