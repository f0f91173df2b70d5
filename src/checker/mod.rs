// src/checker/mod.rs
// =============================================================================
// This module contains the low-level building blocks of an audit.
//
// Submodules:
// - http: Makes HTTP requests, turning every failure into a default value
// - html: Scans page HTML for same-origin links and insecure references
//
// Nothing in here knows about the audit checklist; that lives in `audit`.
// =============================================================================

mod html;
mod http;

pub use html::{extract_internal_links, has_mixed_content};
pub use http::{FetchResult, Fetcher};
