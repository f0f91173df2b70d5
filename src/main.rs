// src/main.rs
// =============================================================================
// This is the entry point of audit-lite.
//
// What happens here:
// 1. Parse command-line arguments (and AUDIT_LITE_* env vars) using clap
// 2. Set up logging to stderr with tracing
// 3. Build the shared HTTP fetcher and the auditor
// 4. Either serve the HTTP endpoint or run a single audit
// 5. Exit with proper code (0 = success, 1 = broken links, 2 = error)
// =============================================================================

mod audit;   // src/audit/ - checklist, report shapes, orchestration
mod checker; // src/checker/ - HTTP fetching and HTML scanning
mod cli;     // src/cli.rs - command-line parsing
mod config;  // src/config.rs - runtime settings and defaults
mod server;  // src/server.rs - the axum endpoint

use anyhow::Result;
use audit::{validate_target, AuditReport, Auditor};
use checker::Fetcher;
use clap::Parser;
use cli::{Cli, Commands};
use tracing::error;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "audit_lite=info,tower_http=info";

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing();

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "audit-lite failed");
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr so `audit --json` output on stdout stays machine-readable
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();
}

// Returns:
//   Ok(0) = served until shutdown, or audited with no broken links
//   Ok(1) = audit found broken internal links
//   Ok(2) = the URL given to `audit` is invalid
//   Err = unexpected error (bind failure, client construction, ...)
async fn run(cli: Cli) -> Result<i32> {
    let settings = cli.tuning.settings();
    let fetcher = Fetcher::new(&settings)?;
    let auditor = Auditor::new(fetcher, settings);

    match cli.command {
        Commands::Serve { bind } => {
            server::serve(bind, auditor).await?;
            Ok(0)
        }
        Commands::Audit { url, json } => handle_audit(&auditor, &url, json).await,
    }
}

async fn handle_audit(auditor: &Auditor, raw_url: &str, json: bool) -> Result<i32> {
    let target = match validate_target(Some(raw_url)) {
        Ok(url) => url,
        Err(e) => {
            eprintln!("Error: {} ({})", e, raw_url.trim());
            return Ok(2);
        }
    };

    let report = auditor.run(&target).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }

    if report.links.broken > 0 {
        Ok(1)
    } else {
        Ok(0)
    }
}

// Prints the report as a human-readable summary in the terminal
fn print_summary(report: &AuditReport) {
    println!("🔍 Audit of {}", report.requested_url);
    println!("{}", "=".repeat(72));

    println!("{:<22} {}", "HTTPS", yes_no(report.security.https));
    println!(
        "{:<22} {}",
        "Security headers",
        join_or_none(&report.security.present)
    );
    println!("{:<22} {}", "Mixed content", yes_no(report.mixed_content));
    println!("{:<22} {}", "robots.txt", yes_no(report.robots.present));
    println!(
        "{:<22} {} (HTTP {})",
        "sitemap.xml",
        yes_no(report.sitemap.ok),
        report.sitemap.status
    );
    println!("{:<22} {}", "Legal pages", join_or_none(&report.legal.present));

    println!();
    println!("📊 Internal links:");
    println!("   📋 Checked: {}", report.links.checked);
    println!("   ❌ Broken: {}", report.links.broken);

    for probe in &report.links.sample {
        println!("      {:<60} HTTP {}", probe.url, probe.status);
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "✅ yes"
    } else {
        "❌ no"
    }
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}
