// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Bounded in-place image normalization
//!
//! Large uploads are downscaled before OCR to cap memory use and inference
//! latency. Normalization is best-effort: the orchestrator logs failures and
//! proceeds with the bytes already on disk, so a corrupt upload still gets
//! its shot at the engine.

use image::imageops::FilterType;
use image::{codecs::jpeg::JpegEncoder, DynamicImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use thiserror::Error;

/// JPEG quality used when re-encoding normalized uploads
const JPEG_QUALITY: u8 = 85;

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Normalize the stored image in place.
///
/// Decodes the image at `path`, converts it to RGB (dropping any alpha
/// channel), downscales with Lanczos resampling so the longest edge is at
/// most `max_dim`, and overwrites the file as JPEG quality 85. Re-encoding
/// happens even when no resize was needed, which also strips embedded
/// metadata and normalizes file size.
///
/// Returns the final pixel dimensions.
pub fn normalize_in_place(path: &Path, max_dim: u32) -> Result<(u32, u32), NormalizeError> {
    let img = image::open(path).map_err(|e| NormalizeError::Decode(e.to_string()))?;
    let rgb = img.to_rgb8();
    let (width, height) = (rgb.width(), rgb.height());

    let scale = (max_dim as f64 / width.max(height) as f64).min(1.0);
    let rgb = if scale < 1.0 {
        let new_width = ((width as f64 * scale).round() as u32).max(1);
        let new_height = ((height as f64 * scale).round() as u32).max(1);
        image::imageops::resize(&rgb, new_width, new_height, FilterType::Lanczos3)
    } else {
        rgb
    };

    let (out_width, out_height) = (rgb.width(), rgb.height());

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let encoder = JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY);
    DynamicImage::ImageRgb8(rgb)
        .write_with_encoder(encoder)
        .map_err(|e| NormalizeError::Encode(e.to_string()))?;

    Ok((out_width, out_height))
}
