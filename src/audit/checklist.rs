// src/audit/checklist.rs
// =============================================================================
// The fixed checklists of the audit, kept as plain ordered data.
//
// The orchestrator walks these slices generically, so adding a header or a
// legal page is a one-line change here. Report lists follow the order below,
// not the order the server happened to answer in.
// =============================================================================

/// Security response headers looked up (case-insensitively) on the audited page
pub const SECURITY_HEADERS: &[&str] = &[
    "content-security-policy",
    "x-frame-options",
    "x-content-type-options",
    "referrer-policy",
    "permissions-policy",
    "strict-transport-security",
];

/// Legal notice / GDPR pages, French and English spellings
pub const LEGAL_PATHS: &[&str] = &[
    "/mentions-legales",
    "/mentions-légales",
    "/mentions",
    "/legal-notice",
    "/conditions-generales",
    "/cgv",
    "/cgu",
    "/terms",
    "/terms-and-conditions",
    "/politique-de-confidentialite",
    "/confidentialite",
    "/privacy",
    "/privacy-policy",
    "/cookies",
    "/cookie-policy",
    "/politique-de-cookies",
];

pub const ROBOTS_PATH: &str = "/robots.txt";
pub const SITEMAP_PATH: &str = "/sitemap.xml";
