// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod classification;
pub mod config;
pub mod storage;
pub mod version;
pub mod vision;

// Re-export main types
pub use api::{ApiError, ErrorResponse};
pub use api::classify::{classify_handler, ClassifyResponse};
pub use api::http_server::AppState;
pub use classification::{aggregate, classify, placeholder_fields, DocumentType};
pub use config::ServiceConfig;
pub use storage::{sanitize_filename, StorageError, UploadSlot};
pub use vision::{Detection, NormalizeError, OcrEngine, SidecarOcrEngine};
