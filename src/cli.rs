// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - serve: run the HTTP audit endpoint
// - audit: run one audit from the terminal and print the report
//
// The tuning knobs (timeout, link cap, sample size, user agent) are global
// options. Each one can also come from an AUDIT_LITE_* environment variable,
// which is how the server is usually configured in a container.
// =============================================================================

use crate::config::{
    AuditSettings, DEFAULT_MAX_LINKS, DEFAULT_SAMPLE_SIZE, DEFAULT_TIMEOUT_MS, DEFAULT_USER_AGENT,
};
use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "audit-lite",
    version,
    about = "Lightweight website audit: security headers, mixed content, robots/sitemap, legal pages, internal links",
    long_about = "audit-lite fetches one page, checks its security headers and mixed content, probes \
                  robots.txt, sitemap.xml and common legal-notice pages, and reports the status of a \
                  sample of same-origin links. Run it as an HTTP service (serve) or one-shot (audit)."
)]
pub struct Cli {
    #[command(flatten)]
    pub tuning: TuningArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by both subcommands
#[derive(Args, Debug)]
pub struct TuningArgs {
    /// Timeout for each outbound request, in milliseconds
    #[arg(long, global = true, env = "AUDIT_LITE_TIMEOUT_MS", default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// How many same-origin link candidates to collect from the page
    #[arg(long, global = true, env = "AUDIT_LITE_MAX_LINKS", default_value_t = DEFAULT_MAX_LINKS)]
    pub max_links: usize,

    /// How many broken links to echo back in the report sample
    #[arg(long, global = true, env = "AUDIT_LITE_SAMPLE_SIZE", default_value_t = DEFAULT_SAMPLE_SIZE)]
    pub sample_size: usize,

    /// User-Agent header sent with every probe
    #[arg(long, global = true, env = "AUDIT_LITE_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,
}

impl TuningArgs {
    pub fn settings(&self) -> AuditSettings {
        AuditSettings {
            timeout: Duration::from_millis(self.timeout_ms),
            max_links: self.max_links,
            sample_size: self.sample_size,
            user_agent: self.user_agent.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the audit endpoint over HTTP
    ///
    /// Example: audit-lite serve --bind 0.0.0.0:8080
    /// then:    curl 'http://localhost:8080/api/audit-lite?url=https://example.com'
    Serve {
        /// Address to listen on
        #[arg(long, env = "AUDIT_LITE_BIND", default_value = "127.0.0.1:3000")]
        bind: SocketAddr,
    },

    /// Audit one website and print the report
    ///
    /// Example: audit-lite audit https://example.com --json
    Audit {
        /// Absolute URL of the page to audit
        url: String,

        /// Output the raw JSON report instead of a summary
        #[arg(long)]
        json: bool,
    },
}
