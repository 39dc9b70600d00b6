// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use doc_classifier_node::{
    api::{start_server, AppState},
    config::ServiceConfig,
    version,
    vision::{OcrEngine, SidecarOcrEngine},
};
use std::{env, sync::Arc};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    println!("🚀 Starting {}...", version::get_version_string());

    let config = ServiceConfig::from_env();
    tracing::info!(
        "Config: port={}, upload_dir={}, max_upload_bytes={}, max_image_dim={}, ocr_endpoint={}",
        config.api_port,
        config.upload_dir.display(),
        config.max_upload_bytes,
        config.max_image_dim,
        config.ocr_endpoint
    );

    // Eager engine initialization: one readiness probe at startup. If it
    // fails, the service still comes up but every classification request
    // fails fast with 503 until the process is restarted.
    println!("🔄 Connecting to OCR sidecar at {}...", config.ocr_endpoint);
    let engine: Option<Arc<dyn OcrEngine>> =
        match SidecarOcrEngine::connect(&config.ocr_endpoint, &config.ocr_languages).await {
            Ok(engine) => {
                println!("✅ OCR sidecar ready");
                Some(Arc::new(engine))
            }
            Err(e) => {
                tracing::warn!("❌ OCR engine initialization failed: {}", e);
                None
            }
        };

    let state = AppState::new(engine, config);
    start_server(state)
        .await
        .map_err(|e| anyhow::anyhow!("server error: {}", e))?;

    Ok(())
}
