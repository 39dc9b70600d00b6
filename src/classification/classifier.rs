// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Ordered keyword classification of aggregated document text

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Closed set of document labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentType {
    #[serde(rename = "Birth Certificate")]
    BirthCertificate,
    #[serde(rename = "Identification Card")]
    IdentificationCard,
    Unknown,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::BirthCertificate => "Birth Certificate",
            DocumentType::IdentificationCard => "Identification Card",
            DocumentType::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyword groups evaluated in order; the first group with any hit wins.
///
/// Birth-certificate keywords are checked strictly before ID keywords so a
/// birth certificate mentioning "Philippines" is not misclassified as an ID.
/// Matching is substring, not word-boundary: "id" hitting inside
/// "identification" is intended behavior.
const KEYWORD_GROUPS: &[(DocumentType, &[&str])] = &[
    (
        DocumentType::BirthCertificate,
        &["birth certificate", "child", "registry", "philippine statistics"],
    ),
    (
        DocumentType::IdentificationCard,
        &["id", "republic", "philippines", "national id", "license", "passport"],
    ),
];

/// Classify aggregated document text
pub fn classify(text: &str) -> DocumentType {
    let lower = text.to_lowercase();
    for (label, keywords) in KEYWORD_GROUPS {
        if keywords.iter().any(|k| lower.contains(k)) {
            return *label;
        }
    }
    DocumentType::Unknown
}

/// Placeholder structured-fields mapping; real field extraction is out of
/// scope for this service.
pub fn placeholder_fields() -> HashMap<String, String> {
    let mut fields = HashMap::new();
    fields.insert(
        "example_field".to_string(),
        "Sample extracted info".to_string(),
    );
    fields
}
