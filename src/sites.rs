use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::extraction::extractor::Registry;
use crate::telemetry::{self};
use crate::telemetry::ops::sites::Phase as SitesPhase;

/// mscrape sites
#[derive(Args, Debug)]
pub struct SitesCmd {}

#[derive(Serialize)]
struct SiteRow { host: String, extractor: &'static str }

pub fn run(_args: SitesCmd) -> Result<()> {
    let log = telemetry::sites();
    let _g = log.root_span().entered();
    let _l = log.span(&SitesPhase::List).entered();

    let registry = Registry::builtin();
    let rows: Vec<SiteRow> = registry
        .hosts()
        .into_iter()
        .map(|(host, site)| SiteRow { host: host.to_string(), extractor: site.name() })
        .collect();

    if telemetry::config::json_mode() {
        log.result(&rows)?;
    } else {
        log.info(format!("🌐 {} supported site(s)", rows.len()));
        for r in &rows { log.info(format!("  {} ({})", r.host, r.extractor)); }
    }
    Ok(())
}
