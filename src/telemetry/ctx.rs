use anyhow::Result;
use serde::Serialize;
use std::marker::PhantomData;
use std::time::Instant;
use tracing::{info, debug, warn, info_span, Span};

use super::emit;
use crate::extraction::types::{BatchTotals, ExtractionResult};
use crate::output::types::Meta;

pub trait PhaseSpan {
    fn name(&self) -> &'static str;
    fn span(&self) -> Span;
}

pub trait OpMarker {
    const NAME: &'static str;
    type Phase: PhaseSpan;
    fn root_span() -> Span;
}

pub struct LogCtx<O: OpMarker> {
    pub(crate) json: bool,
    pub(crate) started: Instant,
    pub(crate) _marker: PhantomData<O>,
}

impl<O: OpMarker> LogCtx<O> {
    fn op_name(&self) -> &'static str { O::NAME }

    pub fn root_span(&self) -> Span { O::root_span() }

    pub fn root_span_kv<'a, T>(&self, fields: T) -> Span
    where
        T: IntoIterator<Item = (&'a str, String)>,
    {
        let span = self.root_span();
        let details = kv_to_string(fields);
        if details.is_empty() {
            info!(op = %self.op_name(), "start");
        } else {
            info!(op = %self.op_name(), details = %details, "start");
        }
        span
    }

    pub fn span(&self, ph: &O::Phase) -> Span { ph.span() }

    pub fn info(&self, msg: impl AsRef<str>) { if self.json { info!(op = %self.op_name(), "{}", msg.as_ref()); } else { info!("{}", msg.as_ref()); } }
    pub fn warn(&self, msg: impl AsRef<str>) { if self.json { warn!(op = %self.op_name(), "{}", msg.as_ref()); } else { warn!("{}", msg.as_ref()); } }

    pub fn debug_kv<'a, D>(&self, msg: &str, kv: D)
    where
        D: IntoIterator<Item = (&'a str, String)>,
    {
        let details = kv_to_string(kv);
        if self.json { debug!(op = %self.op_name(), details = %details, "{}", msg); }
        else { debug!("{} {}", msg, details); }
    }

    pub fn plan<T: Serialize>(&self, plan: &T) -> Result<()> { emit::print_plan(self.op_name(), plan, Some(self.meta())) }
    pub fn result<T: Serialize>(&self, result: &T) -> Result<()> { emit::print_result(self.op_name(), result, Some(self.meta())) }

    fn meta(&self) -> Meta { Meta { duration_ms: Some(self.started.elapsed().as_millis()) } }
}

impl LogCtx<crate::telemetry::ops::extract::Extract> {
    /// Span covering one URL's task; spawned futures are instrumented with it.
    pub fn url_span(&self, index: usize, url: &str) -> Span { info_span!("url", index, url = %url) }

    pub fn url_outcome(&self, index: usize, result: &ExtractionResult) {
        match result {
            ExtractionResult::Success { source_url, title, items } => {
                if self.json { info!(op = %self.op_name(), index, url = %source_url, title = %title, items = items.len(), "url_ok"); }
                else { info!("✅ [{}] {} — \"{}\" ({} item(s))", index, source_url, title, items.len()); }
            }
            ExtractionResult::Failure { source_url, failure_reason } => {
                if self.json { warn!(op = %self.op_name(), index, url = %source_url, reason = %failure_reason, "url_failed"); }
                else { warn!("❌ [{}] {} — {}", index, source_url, failure_reason); }
            }
        }
    }

    pub fn totals(&self, totals: &BatchTotals) {
        let BatchTotals { succeeded, failed, items } = *totals;
        if self.json { info!(op = %self.op_name(), succeeded, failed, items, "extract_totals"); }
        else { info!("📊 Extract totals — succeeded={} failed={} items={}", succeeded, failed, items); }
    }
}

fn kv_to_string<'a, T>(kv: T) -> String
where
    T: IntoIterator<Item = (&'a str, String)>,
{
    let mut parts: Vec<String> = Vec::new();
    for (k, v) in kv { parts.push(format!("{}={}", k, v)); }
    parts.join(" ")
}
