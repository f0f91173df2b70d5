// src/audit/report.rs
// =============================================================================
// The JSON shapes returned by the audit endpoint.
//
// #[serde(rename_all = "camelCase")] turns `requested_url` into `requestedUrl`
// so the wire format matches what browser clients expect. Field order in the
// structs is the key order in the JSON output.
// =============================================================================

use serde::{Deserialize, Serialize};

/// Full audit result, built once per request and never mutated afterwards
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    /// Always true; distinguishes a report from an `ErrorBody`
    pub ok: bool,
    pub requested_url: String,
    pub security: SecuritySummary,
    pub mixed_content: bool,
    pub robots: RobotsSummary,
    pub sitemap: SitemapSummary,
    pub legal: LegalSummary,
    pub links: LinkSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SecuritySummary {
    /// Security headers found on the page, in checklist order
    pub present: Vec<String>,
    pub https: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RobotsSummary {
    pub present: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SitemapSummary {
    pub ok: bool,
    pub status: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LegalSummary {
    pub present: Vec<String>,
}

/// One probed legal path
#[derive(Debug, Clone, PartialEq)]
pub struct LegalProbe {
    pub path: String,
    pub present: bool,
}

/// One probed internal link
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinkProbe {
    pub url: String,
    pub ok: bool,
    pub status: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinkSummary {
    pub checked: usize,
    pub broken: usize,
    /// The first not-ok probes, in discovery order
    pub sample: Vec<LinkProbe>,
}

impl LinkSummary {
    pub fn from_probes(probes: &[LinkProbe], sample_size: usize) -> Self {
        let broken: Vec<&LinkProbe> = probes.iter().filter(|p| !p.ok).collect();
        Self {
            checked: probes.len(),
            broken: broken.len(),
            sample: broken.into_iter().take(sample_size).cloned().collect(),
        }
    }
}

/// Body of a 400 response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub error: String,
}
