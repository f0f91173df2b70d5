// src/checker/html.rs
// =============================================================================
// This module looks at raw page HTML without parsing it.
//
// Two scans:
// - extract_internal_links: finds <a ... href="..."> values with a regex,
//   resolves them against the page URL and keeps the same-origin ones
// - has_mixed_content: looks for any insecure "http://..." reference
//
// Both are deliberately naive text scans. They will see links inside
// comments or scripts and miss links added by JavaScript.
//
// We use the `url` crate to:
// - Resolve relative URLs to absolute URLs (Url::join)
// - Compare origins (scheme + host + port)
// =============================================================================

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;
use url::Url;

fn anchor_href_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?i)<a[^>]+href=["']([^"']+)["']"#).expect("anchor href pattern is valid")
    })
}

fn insecure_reference_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?i)http://[^"' \n]+"#).expect("insecure reference pattern is valid")
    })
}

// Extracts same-origin links from HTML content
//
// Parameters:
//   html: the HTML content to scan (borrowed as &str)
//   base: the URL of the page (for resolving relative links and the origin check)
//   max_links: how many same-origin candidates to collect before we stop scanning
//
// Returns: unique absolute URLs, in the order they were first seen
//
// The cap applies to raw candidates, duplicates included. A page that repeats
// "/home" thirty times yields a single link even if it has more further down.
//
// Example:
//   html = "<a href='/a'><a href='/a'><a href='https://other.example/b'><a href='/c'>"
//   base = "https://site.example"
//   result = ["https://site.example/a", "https://site.example/c"]
pub fn extract_internal_links(html: &str, base: &Url, max_links: usize) -> Vec<String> {
    let origin = base.origin();
    let mut candidates = Vec::new();

    for captures in anchor_href_pattern().captures_iter(html) {
        if candidates.len() >= max_links {
            break;
        }

        let href = &captures[1];
        // join() handles both relative and absolute hrefs
        if let Ok(resolved) = base.join(href) {
            if resolved.origin() == origin {
                candidates.push(resolved.to_string());
            }
        }
    }

    // Keep the first occurrence of each URL
    let mut seen = HashSet::new();
    candidates.retain(|url| seen.insert(url.clone()));
    candidates
}

/// True when the page references anything over plain `http://`
pub fn has_mixed_content(html: &str) -> bool {
    insecure_reference_pattern().is_match(html)
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why a regex and not an HTML parser?
//    - The audit only wants a bounded sample of links, not a faithful DOM
//    - The pattern matches any <a ...> tag carrying an href, whatever the
//      other attributes are, with single or double quotes
//
// 2. What does Url::origin() compare?
//    - Scheme, host and port. http://site and https://site are different
//      origins, so are site:80 and site:8080
//    - mailto:, javascript: and data: URLs have an "opaque" origin that never
//      equals anything, so they are dropped for free
//
// 3. What is OnceLock?
//    - A cell that is written once and then read forever
//    - The regexes are compiled on first use and shared afterwards
// -----------------------------------------------------------------------------
