use std::io::{self, Read};

use anyhow::{anyhow, Context, Result};
use clap::Args;

use crate::telemetry::{self};
use crate::telemetry::ops::extract::Phase as ExtractPhase;

pub mod batch;
pub mod error;
pub mod extractor;
pub mod fetch;
pub mod sanitize;
pub mod task;
pub mod types;

use batch::Batch;
use extractor::{Registry, Site};
use fetch::FetchSettings;
use types::{BatchResult, ExtractPlan, ExtractionResult, MediaKind, PlannedUrl};

#[derive(Args, Debug)]
pub struct ExtractCmd {
    /// Page URLs to extract, processed as one batch
    pub urls: Vec<String>,
    /// Read more URLs from a file, one per line (`-` for stdin)
    #[arg(long)] pub from_file: Option<String>,
    /// Max pages fetched at once (overrides MSCRAPE_MAX_CONCURRENCY)
    #[arg(long)] pub concurrency: Option<usize>,
    /// Per-request timeout in seconds (overrides MSCRAPE_TIMEOUT_SECS)
    #[arg(long)] pub timeout_secs: Option<u64>,
    /// Only resolve each URL to its site; fetch nothing
    #[arg(long, default_value_t = false)] pub plan: bool,
    #[arg(long, default_value_t = 10)] pub plan_limit: usize,
    /// Serve another host with a known extractor, as HOST=SITE (repeatable)
    #[arg(long = "host-alias", value_parser = parse_host_alias)] pub host_aliases: Vec<(String, Site)>,
}

pub async fn run(args: ExtractCmd) -> Result<()> {
    let settings = FetchSettings::resolve(args.concurrency, args.timeout_secs);
    let log = telemetry::extract();
    let _g = log.root_span_kv([
        ("plan", args.plan.to_string()),
        ("concurrency", settings.concurrency.to_string()),
        ("timeout_secs", settings.timeout_secs.to_string()),
        ("from_file", format!("{:?}", args.from_file)),
    ]).entered();

    let mut urls = args.urls.clone();
    if let Some(path) = args.from_file.as_deref() { urls.extend(read_url_list(path)?); }

    let registry = args.host_aliases.iter().fold(Registry::builtin(), |reg, (host, site)| reg.with_host(host.clone(), *site));

    if args.plan {
        let _p = log.span(&ExtractPhase::Plan).entered();
        let planned: Vec<PlannedUrl> = urls.iter().map(|u| match task::resolve(&registry, u) {
            Ok(site) => PlannedUrl { url: u.clone(), site: Some(site.name()), reason: None },
            Err(e) => PlannedUrl { url: u.clone(), site: None, reason: Some(e.to_string()) },
        }).collect();
        let supported = planned.iter().filter(|p| p.site.is_some()).count();

        if telemetry::config::json_mode() {
            let plan = ExtractPlan {
                urls: urls.len(),
                supported,
                concurrency: settings.concurrency,
                timeout_secs: settings.timeout_secs,
                sample_urls: planned.into_iter().take(args.plan_limit).collect(),
            };
            log.plan(&plan)?;
        } else {
            log.info(format!("📝 Extract plan — urls={} supported={} concurrency={} timeout={}s", urls.len(), supported, settings.concurrency, settings.timeout_secs));
            for p in planned.iter().take(args.plan_limit) {
                match (&p.site, &p.reason) {
                    (Some(site), _) => log.info(format!("  {} -> {}", p.url, site)),
                    (None, Some(reason)) => log.warn(format!("  {} -> {}", p.url, reason)),
                    (None, None) => {}
                }
            }
            if planned.len() > args.plan_limit { log.info(format!("  ... ({} more)", planned.len() - args.plan_limit)); }
            log.info("   Drop --plan to fetch.");
        }
        return Ok(());
    }

    let batch = Batch::new(registry, settings)?;
    let result = batch.run(urls).await;

    if telemetry::config::json_mode() {
        log.result(&result)?;
    } else if result.is_empty() {
        log.info("ℹ️  No URLs given; nothing to extract.");
    } else {
        print_items(&result);
        log.info(format!("   {} url(s) processed.", result.len()));
    }
    Ok(())
}

fn print_items(result: &BatchResult) {
    let log = telemetry::extract();
    for r in result.results.iter().filter(|r| r.is_success()) {
        let ExtractionResult::Success { title, items, .. } = r else { continue };
        log.info(format!("📁 {} <- {}", title, r.source_url()));
        for item in items {
            let kind = match item.kind { MediaKind::Image => "image", MediaKind::Video => "video" };
            if item.thumbnail_url.is_empty() {
                log.info(format!("  {}/{} {}", title, kind, item.media_url));
            } else {
                log.info(format!("  {}/{} {} (thumb {})", title, kind, item.media_url, item.thumbnail_url));
            }
        }
    }
}

fn parse_host_alias(s: &str) -> Result<(String, Site)> {
    let (host, name) = s.split_once('=').ok_or_else(|| anyhow!("expected HOST=SITE, got {:?}", s))?;
    let host = host.trim();
    if host.is_empty() { return Err(anyhow!("empty host in {:?}", s)); }
    let site = Site::from_name(name).ok_or_else(|| anyhow!("unknown site {:?} (known: erome, imagepond)", name.trim()))?;
    Ok((host.to_ascii_lowercase(), site))
}

fn read_url_list(path: &str) -> Result<Vec<String>> {
    let text = if path == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).context("read URLs from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path).with_context(|| format!("read URL list {}", path))?
    };
    Ok(parse_url_list(&text))
}

fn parse_url_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect()
}
