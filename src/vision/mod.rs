// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision processing for the classification pipeline
//!
//! This module provides:
//! - The `OcrEngine` contract consumed by the pipeline
//! - The sidecar-backed production engine
//! - Bounded in-place image normalization

pub mod engine;
pub mod normalize;
pub mod sidecar;

pub use engine::{Detection, OcrEngine};
pub use normalize::{normalize_in_place, NormalizeError};
pub use sidecar::SidecarOcrEngine;
