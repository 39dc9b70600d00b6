// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Upload validation
//!
//! Pure checks run before any bytes are stored: filename presence and an
//! extension allow-list. Deliberately no magic-byte sniffing; a mismatched
//! but allowed extension passes here and only fails later if the normalizer
//! cannot decode it.

use crate::api::errors::ApiError;

/// Accepted upload extensions (case-insensitive)
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Validate a declared upload filename.
///
/// Returns the filename on success so callers can thread it through to
/// storage without re-unwrapping the option.
pub fn validate_filename(name: Option<&str>) -> Result<&str, ApiError> {
    let name = match name {
        Some(n) if !n.is_empty() => n,
        _ => return Err(ApiError::EmptyFilename),
    };

    let extension = match name.rsplit_once('.') {
        Some((_, ext)) => ext,
        None => return Err(ApiError::UnsupportedType("no extension".to_string())),
    };

    if !ALLOWED_EXTENSIONS.contains(&extension.to_lowercase().as_str()) {
        return Err(ApiError::UnsupportedType(extension.to_string()));
    }

    Ok(name)
}
