// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Document classification endpoint

pub mod handler;
pub mod response;
pub mod upload;

pub use handler::classify_handler;
pub use response::ClassifyResponse;
pub use upload::{validate_filename, ALLOWED_EXTENSIONS};
