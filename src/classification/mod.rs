// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Text aggregation and keyword-based document classification

pub mod aggregate;
pub mod classifier;

pub use aggregate::aggregate;
pub use classifier::{classify, placeholder_fields, DocumentType};
