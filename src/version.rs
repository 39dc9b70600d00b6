// Version information for the Document Classifier Node

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-keyword-classification-2026-08-28";

/// Semantic version number
pub const VERSION_NUMBER: &str = "0.1.0";

/// Build date
pub const BUILD_DATE: &str = "2026-08-28";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "multipart-upload",
    "bounded-normalization",
    "sidecar-ocr",
    "keyword-classification",
    "scoped-upload-cleanup",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Document Classifier Node {} ({})", VERSION_NUMBER, BUILD_DATE)
}
