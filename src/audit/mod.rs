// src/audit/mod.rs
// =============================================================================
// This module runs one audit of one website.
//
// How it works:
// 1. The caller validates the target URL (validate_target)
// 2. Fetch the target page in full (status, headers, body)
// 3. Derive the security header list and the mixed-content flag from it
// 4. Probe /robots.txt (GET) and /sitemap.xml (HEAD)
// 5. HEAD every legal-notice path concurrently
// 6. Extract same-origin links from the page and HEAD them concurrently
// 7. Assemble the AuditReport
//
// Only step 1 can fail. Every later step works on FetchResult values whose
// failure case is a default, so a dead site still produces a full report.
// =============================================================================

mod checklist;
mod report;

pub use checklist::{LEGAL_PATHS, ROBOTS_PATH, SECURITY_HEADERS, SITEMAP_PATH};
pub use report::{
    AuditReport, ErrorBody, LegalProbe, LegalSummary, LinkProbe, LinkSummary, RobotsSummary,
    SecuritySummary, SitemapSummary,
};

use crate::checker::{extract_internal_links, has_mixed_content, FetchResult, Fetcher};
use crate::config::AuditSettings;
use reqwest::header::HeaderMap;
use thiserror::Error;
use tracing::{debug, info, instrument};
use url::Url;

/// The only error an audit request can produce
#[derive(Debug, Error, PartialEq)]
pub enum AuditError {
    #[error("URL invalide")]
    InvalidUrl,
}

/// Trims the raw `url` parameter and parses it as an absolute URL.
///
/// A missing parameter is treated like an empty one.
pub fn validate_target(raw: Option<&str>) -> Result<Url, AuditError> {
    let raw = raw.unwrap_or_default().trim();
    Url::parse(raw).map_err(|e| {
        debug!(input = raw, error = %e, "rejected audit target");
        AuditError::InvalidUrl
    })
}

// Runs audits. Cheap to clone: the Fetcher shares its connection pool.
#[derive(Debug, Clone)]
pub struct Auditor {
    fetcher: Fetcher,
    settings: AuditSettings,
}

impl Auditor {
    pub fn new(fetcher: Fetcher, settings: AuditSettings) -> Self {
        Self { fetcher, settings }
    }

    /// Audits `target`. Never fails: unreachable probes show up as false/0 fields.
    #[instrument(skip_all, fields(url = %target))]
    pub async fn run(&self, target: &Url) -> AuditReport {
        let page = self.fetcher.fetch_full(target.as_str()).await;
        debug!(status = page.status, bytes = page.body.len(), "fetched target page");

        let security = SecuritySummary {
            present: present_headers(&page.headers, SECURITY_HEADERS),
            https: target.scheme() == "https",
        };
        let mixed_content = has_mixed_content(&page.body);

        let robots = RobotsSummary {
            present: match target.join(ROBOTS_PATH) {
                Ok(url) => !self.fetcher.fetch_text(url.as_str()).await.trim().is_empty(),
                Err(_) => false,
            },
        };

        let sitemap_head = match target.join(SITEMAP_PATH) {
            Ok(url) => self.fetcher.fetch_head(url.as_str()).await,
            Err(_) => FetchResult::default(),
        };
        let sitemap = SitemapSummary {
            ok: sitemap_head.ok,
            status: sitemap_head.status,
        };

        let legal = LegalSummary {
            present: self
                .probe_legal_paths(target, LEGAL_PATHS)
                .await
                .into_iter()
                .filter(|probe| probe.present)
                .map(|probe| probe.path)
                .collect(),
        };

        let links = extract_internal_links(&page.body, target, self.settings.max_links);
        let probes = self.probe_links(links).await;
        let links = LinkSummary::from_probes(&probes, self.settings.sample_size);

        info!(
            status = page.status,
            headers = security.present.len(),
            legal = legal.present.len(),
            links_checked = links.checked,
            links_broken = links.broken,
            "audit complete"
        );

        AuditReport {
            ok: true,
            requested_url: target.to_string(),
            security,
            mixed_content,
            robots,
            sitemap,
            legal,
            links,
        }
    }

    // HEAD every candidate path; a redirect (3xx) still counts as present
    async fn probe_legal_paths(&self, target: &Url, paths: &[&str]) -> Vec<LegalProbe> {
        // A path that cannot be joined is probed as "" and fails like a dead link
        let urls: Vec<String> = paths
            .iter()
            .map(|path| target.join(path).map(String::from).unwrap_or_default())
            .collect();

        let results = self.fetcher.fetch_head_all(&urls).await;

        paths
            .iter()
            .zip(results)
            .map(|(path, result)| LegalProbe {
                path: path.to_string(),
                present: result.ok || (200..400).contains(&result.status),
            })
            .collect()
    }

    async fn probe_links(&self, links: Vec<String>) -> Vec<LinkProbe> {
        let results = self.fetcher.fetch_head_all(&links).await;

        links
            .into_iter()
            .zip(results)
            .map(|(url, result)| LinkProbe {
                url,
                ok: result.ok,
                status: result.status,
            })
            .collect()
    }
}

// Checklist entries present in `headers`, in checklist order
fn present_headers(headers: &HeaderMap, checklist: &[&str]) -> Vec<String> {
    checklist
        .iter()
        .filter(|name| headers.contains_key(**name))
        .map(|name| name.to_string())
        .collect()
}
