// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Classification response types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::classification::{placeholder_fields, DocumentType};

/// Response from document classification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyResponse {
    /// Assigned document label
    pub document_type: DocumentType,
    /// Full aggregated text recognized by the engine
    pub text: String,
    /// Structured fields extracted from the document (placeholder)
    pub fields: HashMap<String, String>,
}

impl ClassifyResponse {
    pub fn new(document_type: DocumentType, text: String) -> Self {
        Self {
            document_type,
            text,
            fields: placeholder_fields(),
        }
    }
}
