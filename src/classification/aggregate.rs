// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detection text aggregation

use crate::vision::Detection;

/// Collapse engine detections into one text blob.
///
/// Detections without a text field are malformed and dropped. The rest are
/// joined with single spaces in engine order (no re-ordering is imposed
/// here), and the final string is trimmed. No detections means an empty
/// string, not an error.
pub fn aggregate(detections: &[Detection]) -> String {
    let texts: Vec<&str> = detections
        .iter()
        .filter_map(|det| det.text.as_deref())
        .collect();

    texts.join(" ").trim().to_string()
}
