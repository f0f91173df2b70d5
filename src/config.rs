// src/config.rs
// =============================================================================
// Runtime settings shared by the fetch layer and the audit orchestrator.
//
// Values come from the command line (or AUDIT_LITE_* environment variables,
// see cli.rs). Everything has a default, so `AuditSettings::default()` is a
// fully working configuration, which is what the tests use.
// =============================================================================

use std::time::Duration;

/// How long one outbound request (send + body) may take before it is aborted
pub const DEFAULT_TIMEOUT_MS: u64 = 20_000;

/// How many same-origin link candidates we collect from the page
pub const DEFAULT_MAX_LINKS: usize = 30;

/// How many not-ok links are echoed back in `links.sample`
pub const DEFAULT_SAMPLE_SIZE: usize = 10;

pub const DEFAULT_USER_AGENT: &str = concat!("audit-lite/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct AuditSettings {
    pub timeout: Duration,
    pub max_links: usize,
    pub sample_size: usize,
    pub user_agent: String,
}

impl Default for AuditSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            max_links: DEFAULT_MAX_LINKS,
            sample_size: DEFAULT_SAMPLE_SIZE,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}
