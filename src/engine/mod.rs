//! Detection engine.
//!
//! This module contains the signature library and the URL classifier the
//! detectors and guards match page activity against.

pub mod patterns;
pub mod url_classifier;
