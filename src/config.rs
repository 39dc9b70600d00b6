// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Service configuration from environment variables

use std::env;
use std::path::PathBuf;

/// Default maximum upload size (5 MB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Default longest-edge bound applied during normalization
pub const DEFAULT_MAX_IMAGE_DIM: u32 = 1600;

/// Runtime configuration for the classifier service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Port the HTTP API listens on
    pub api_port: u16,
    /// Directory holding request-scoped upload slots
    pub upload_dir: PathBuf,
    /// Maximum accepted upload size in bytes
    pub max_upload_bytes: usize,
    /// Longest-edge bound for image normalization
    pub max_image_dim: u32,
    /// Base URL of the OCR sidecar
    pub ocr_endpoint: String,
    /// Languages requested from the OCR sidecar
    pub ocr_languages: Vec<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_port: 8080,
            upload_dir: PathBuf::from("./uploads"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_image_dim: DEFAULT_MAX_IMAGE_DIM,
            ocr_endpoint: "http://127.0.0.1:8581".to_string(),
            ocr_languages: vec!["en".to_string()],
        }
    }
}

impl ServiceConfig {
    /// Build a configuration from environment variables, falling back to
    /// defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(defaults.api_port);

        let upload_dir = env::var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.upload_dir);

        let max_upload_bytes = env::var("MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(defaults.max_upload_bytes);

        let max_image_dim = env::var("MAX_IMAGE_DIM")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(defaults.max_image_dim);

        let ocr_endpoint =
            env::var("OCR_ENDPOINT").unwrap_or(defaults.ocr_endpoint);

        let ocr_languages = env::var("OCR_LANGUAGES")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
            })
            .ok()
            .filter(|langs: &Vec<String>| !langs.is_empty())
            .unwrap_or(defaults.ocr_languages);

        Self {
            api_port,
            upload_dir,
            max_upload_bytes,
            max_image_dim,
            ocr_endpoint,
            ocr_languages,
        }
    }
}
