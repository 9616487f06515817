//! URL handling module for objcrawler
//!
//! This module provides URL normalization, origin derivation, and the
//! suffix rules that decide crawl urgency and which files count as models.

mod normalize;
mod origin;
mod priority;

// Re-export main functions
pub use normalize::{normalize_parsed, normalize_url};
pub use origin::origin_of;
pub use priority::{
    has_archive_suffix, has_model_suffix, priority_for, ARCHIVE_SUFFIX, DEFAULT_PRIORITY,
    MODEL_SUFFIX, URGENT_PRIORITY,
};
