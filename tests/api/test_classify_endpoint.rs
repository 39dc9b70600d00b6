// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Endpoint tests for POST /v1/classify
//!
//! These tests drive the full router with hand-built multipart bodies and a
//! mock OCR engine, and verify:
//! - The successful classify pipeline end to end
//! - Every validator rejection and its status code
//! - The distinct 413 for oversized uploads, before any OCR runs
//! - Fail-fast 503 when the engine never initialized
//! - Upload-slot cleanup on success and on induced failure
//! - Normalization failures falling through to OCR on the original bytes

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use doc_classifier_node::{
    api::http_server::{router, AppState},
    config::ServiceConfig,
    vision::{Detection, OcrEngine},
};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "X-CLASSIFY-TEST-BOUNDARY";

/// Mock engine returning canned detections and recording every call
struct MockOcrEngine {
    detections: Vec<Detection>,
    calls: Arc<Mutex<Vec<(PathBuf, Vec<u8>)>>>,
}

impl MockOcrEngine {
    fn with_texts(texts: &[&str]) -> (Self, Arc<Mutex<Vec<(PathBuf, Vec<u8>)>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let engine = Self {
            detections: texts.iter().map(|t| Detection::from_text(*t)).collect(),
            calls: calls.clone(),
        };
        (engine, calls)
    }
}

#[async_trait]
impl OcrEngine for MockOcrEngine {
    fn name(&self) -> &'static str {
        "mock-ocr"
    }

    async fn read_text(&self, path: &Path) -> anyhow::Result<Vec<Detection>> {
        let bytes = std::fs::read(path)?;
        self.calls.lock().unwrap().push((path.to_path_buf(), bytes));
        Ok(self.detections.clone())
    }
}

/// Engine whose inference always raises
struct FailingOcrEngine;

#[async_trait]
impl OcrEngine for FailingOcrEngine {
    fn name(&self) -> &'static str {
        "failing-ocr"
    }

    async fn read_text(&self, _path: &Path) -> anyhow::Result<Vec<Detection>> {
        anyhow::bail!("recognition network exploded")
    }
}

fn test_config(upload_dir: &TempDir) -> ServiceConfig {
    ServiceConfig {
        upload_dir: upload_dir.path().to_path_buf(),
        ..ServiceConfig::default()
    }
}

fn state_with_engine(engine: impl OcrEngine + 'static, upload_dir: &TempDir) -> AppState {
    AppState::new(Some(Arc::new(engine)), test_config(upload_dir))
}

/// Build a multipart body with one part
fn multipart_body(field_name: &str, filename: Option<&str>, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    match filename {
        Some(name) => body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                field_name, name
            )
            .as_bytes(),
        ),
        None => body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n", field_name).as_bytes(),
        ),
    }
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn classify_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/classify")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

/// A small but real PNG, so normalization succeeds
fn tiny_png() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(8, 8, image::Rgb([120, 120, 120]));
    let mut buf = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
    buf.into_inner()
}

async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn dir_entry_count(dir: &TempDir) -> usize {
    std::fs::read_dir(dir.path()).unwrap().count()
}

#[tokio::test]
async fn test_classify_birth_certificate_end_to_end() {
    let uploads = TempDir::new().unwrap();
    let (engine, _calls) = MockOcrEngine::with_texts(&[
        "Philippine Statistics Authority",
        "Certificate of Live Birth",
        "Name of Child",
    ]);
    let app = router(state_with_engine(engine, &uploads));

    let body = multipart_body("image", Some("birth_cert.png"), &tiny_png());
    let response = app.oneshot(classify_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["document_type"], "Birth Certificate");
    assert_eq!(
        json["text"],
        "Philippine Statistics Authority Certificate of Live Birth Name of Child"
    );
    assert_eq!(json["fields"]["example_field"], "Sample extracted info");
}

#[tokio::test]
async fn test_classify_identification_card() {
    let uploads = TempDir::new().unwrap();
    let (engine, _calls) =
        MockOcrEngine::with_texts(&["Republic of the Philippines", "Driver's License"]);
    let app = router(state_with_engine(engine, &uploads));

    let body = multipart_body("image", Some("license.jpg"), &tiny_png());
    let response = app.oneshot(classify_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["document_type"], "Identification Card");
}

#[tokio::test]
async fn test_no_detections_is_unknown_not_error() {
    let uploads = TempDir::new().unwrap();
    let (engine, _calls) = MockOcrEngine::with_texts(&[]);
    let app = router(state_with_engine(engine, &uploads));

    let body = multipart_body("image", Some("blank.png"), &tiny_png());
    let response = app.oneshot(classify_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["document_type"], "Unknown");
    assert_eq!(json["text"], "");
}

#[tokio::test]
async fn test_missing_image_part() {
    let uploads = TempDir::new().unwrap();
    let (engine, calls) = MockOcrEngine::with_texts(&["text"]);
    let app = router(state_with_engine(engine, &uploads));

    let body = multipart_body("attachment", Some("scan.png"), &tiny_png());
    let response = app.oneshot(classify_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = response_json(response).await;
    assert_eq!(json["error"], "No image uploaded");
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_filename() {
    let uploads = TempDir::new().unwrap();
    let (engine, _calls) = MockOcrEngine::with_texts(&["text"]);
    let app = router(state_with_engine(engine, &uploads));

    let body = multipart_body("image", None, &tiny_png());
    let response = app.oneshot(classify_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = response_json(response).await;
    assert_eq!(json["error"], "Empty filename");
}

#[tokio::test]
async fn test_unsupported_extension() {
    let uploads = TempDir::new().unwrap();
    let (engine, calls) = MockOcrEngine::with_texts(&["text"]);
    let app = router(state_with_engine(engine, &uploads));

    let body = multipart_body("image", Some("scan.gif"), &tiny_png());
    let response = app.oneshot(classify_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = response_json(response).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("Only PNG and JPG images are allowed"));
    assert!(calls.lock().unwrap().is_empty());
    assert_eq!(dir_entry_count(&uploads), 0);
}

#[tokio::test]
async fn test_payload_too_large_before_ocr() {
    let uploads = TempDir::new().unwrap();
    let (engine, calls) = MockOcrEngine::with_texts(&["text"]);
    let config = ServiceConfig {
        upload_dir: uploads.path().to_path_buf(),
        max_upload_bytes: 1024,
        ..ServiceConfig::default()
    };
    let app = router(AppState::new(Some(Arc::new(engine)), config));

    let oversized = vec![0u8; 4096];
    let body = multipart_body("image", Some("huge.png"), &oversized);
    let response = app.oneshot(classify_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let json = response_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("File too large"));
    // Rejected before OCR ran or anything hit storage
    assert!(calls.lock().unwrap().is_empty());
    assert_eq!(dir_entry_count(&uploads), 0);
}

#[tokio::test]
async fn test_body_limit_breach_while_scanning_parts_is_413() {
    // The breach happens inside next_field() while a large part preceding
    // `image` is being skipped; it must still map to 413, not 400.
    let uploads = TempDir::new().unwrap();
    let (engine, calls) = MockOcrEngine::with_texts(&["text"]);
    let config = ServiceConfig {
        upload_dir: uploads.path().to_path_buf(),
        max_upload_bytes: 1024,
        ..ServiceConfig::default()
    };
    let app = router(AppState::new(Some(Arc::new(engine)), config));

    // Well past the body limit (configured max plus framing headroom)
    let padding = vec![0u8; 256 * 1024];
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        b"Content-Disposition: form-data; name=\"padding\"; filename=\"pad.bin\"\r\n",
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(&padding);
    body.extend_from_slice(format!("\r\n--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        b"Content-Disposition: form-data; name=\"image\"; filename=\"scan.png\"\r\n",
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(&tiny_png());
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    let response = app.oneshot(classify_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let json = response_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("File too large"));
    assert!(calls.lock().unwrap().is_empty());
    assert_eq!(dir_entry_count(&uploads), 0);
}

#[tokio::test]
async fn test_engine_unavailable_fails_fast() {
    let uploads = TempDir::new().unwrap();
    let app = router(AppState::new(None, test_config(&uploads)));

    let body = multipart_body("image", Some("scan.png"), &tiny_png());
    let response = app.oneshot(classify_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = response_json(response).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("OCR engine not available"));
    assert_eq!(dir_entry_count(&uploads), 0);
}

#[tokio::test]
async fn test_inference_failure_surfaces_message() {
    let uploads = TempDir::new().unwrap();
    let app = router(state_with_engine(FailingOcrEngine, &uploads));

    let body = multipart_body("image", Some("scan.png"), &tiny_png());
    let response = app.oneshot(classify_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = response_json(response).await;
    let message = json["error"].as_str().unwrap();
    assert!(message.contains("OCR processing failed"));
    assert!(message.contains("recognition network exploded"));
}

#[tokio::test]
async fn test_upload_slot_removed_after_success() {
    let uploads = TempDir::new().unwrap();
    let (engine, calls) = MockOcrEngine::with_texts(&["passport"]);
    let app = router(state_with_engine(engine, &uploads));

    let body = multipart_body("image", Some("scan.png"), &tiny_png());
    let response = app.oneshot(classify_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The engine saw a stored file, and it is gone now
    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert!(!calls[0].0.exists());
    assert_eq!(dir_entry_count(&uploads), 0);
}

#[tokio::test]
async fn test_upload_slot_removed_after_inference_failure() {
    let uploads = TempDir::new().unwrap();
    let app = router(state_with_engine(FailingOcrEngine, &uploads));

    let body = multipart_body("image", Some("scan.png"), &tiny_png());
    let response = app.oneshot(classify_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(dir_entry_count(&uploads), 0);
}

#[tokio::test]
async fn test_corrupt_image_still_reaches_ocr() {
    // Allowed extension but undecodable bytes: normalization fails silently
    // and the engine gets the original upload untouched.
    let uploads = TempDir::new().unwrap();
    let (engine, calls) =
        MockOcrEngine::with_texts(&["Certificate of Live Birth", "Name of Child"]);
    let app = router(state_with_engine(engine, &uploads));

    let garbage = b"these are not pixels".to_vec();
    let body = multipart_body("image", Some("broken.png"), &garbage);
    let response = app.oneshot(classify_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["document_type"], "Birth Certificate");

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1, garbage);
    assert_eq!(dir_entry_count(&uploads), 0);
}

#[tokio::test]
async fn test_normalization_rewrites_large_upload_before_ocr() {
    // A valid oversized image must reach the engine as a bounded JPEG
    let uploads = TempDir::new().unwrap();
    let (engine, calls) = MockOcrEngine::with_texts(&["text"]);
    let config = ServiceConfig {
        upload_dir: uploads.path().to_path_buf(),
        max_image_dim: 4,
        ..ServiceConfig::default()
    };
    let app = router(AppState::new(Some(Arc::new(engine)), config));

    let body = multipart_body("image", Some("big.png"), &tiny_png());
    let response = app.oneshot(classify_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let calls = calls.lock().unwrap();
    let stored = &calls[0].1;
    assert_eq!(&stored[..3], &[0xFF, 0xD8, 0xFF], "expected JPEG bytes");
    let img = image::load_from_memory(stored).unwrap();
    assert!(img.width() <= 4 && img.height() <= 4);
}

#[tokio::test]
async fn test_traversal_filename_stays_inside_upload_dir() {
    let uploads = TempDir::new().unwrap();
    let (engine, calls) = MockOcrEngine::with_texts(&["text"]);
    let app = router(state_with_engine(engine, &uploads));

    let body = multipart_body("image", Some("..%2F..%2Fetc%2Fcron.png"), &tiny_png());
    let response = app.oneshot(classify_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let calls = calls.lock().unwrap();
    assert!(calls[0].0.starts_with(uploads.path()));
}
