// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Request-scoped upload storage
//!
//! Every upload lives in its own slot for exactly one request. The slot is a
//! scoped resource: dropping it removes the file, so cleanup holds on the
//! success path, on every mapped failure, and on unwind.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to create upload directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to write upload {0}: {1}")]
    Write(PathBuf, std::io::Error),
}

/// Reduce a client-supplied filename to a path-safe slot component.
///
/// Keeps ASCII alphanumerics, `.`, `_` and `-`; everything else (including
/// path separators) becomes `_`. Leading dots are stripped so a name can
/// never be hidden or relative. An empty result falls back to `"upload"`.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.').to_string();
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

/// A stored upload that is deleted when dropped
pub struct UploadSlot {
    path: PathBuf,
}

impl UploadSlot {
    /// Write `bytes` into a fresh slot under `dir`.
    ///
    /// The slot name is a v4 UUID prefix plus the sanitized client filename,
    /// so concurrent requests uploading the same name never collide.
    pub fn create(dir: &Path, filename: &str, bytes: &[u8]) -> Result<Self, StorageError> {
        fs::create_dir_all(dir).map_err(|e| StorageError::CreateDir(dir.to_path_buf(), e))?;

        let slot_name = format!("{}_{}", Uuid::new_v4(), sanitize_filename(filename));
        let path = dir.join(slot_name);
        fs::write(&path, bytes).map_err(|e| StorageError::Write(path.clone(), e))?;

        debug!("Upload stored at {}", path.display());
        Ok(Self { path })
    }

    /// Path of the stored bytes
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for UploadSlot {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            // Nothing to do besides note it; the file may already be gone
            debug!("Failed to remove upload slot {}: {}", self.path.display(), e);
        } else {
            debug!("Upload slot {} removed", self.path.display());
        }
    }
}
