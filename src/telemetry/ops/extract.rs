use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Extract;

#[derive(Copy, Clone, Debug)]
pub enum Phase { Plan, Resolve, Fetch, Parse, Extract, Collect }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self {
        Phase::Plan => "plan",
        Phase::Resolve => "resolve",
        Phase::Fetch => "fetch",
        Phase::Parse => "parse",
        Phase::Extract => "extract",
        Phase::Collect => "collect",
    }}
    fn span(&self) -> Span { match self {
        Phase::Plan => info_span!("plan"),
        Phase::Resolve => info_span!("resolve"),
        Phase::Fetch => info_span!("fetch"),
        Phase::Parse => info_span!("parse"),
        Phase::Extract => info_span!("extract"),
        Phase::Collect => info_span!("collect"),
    }}
}

impl OpMarker for Extract {
    const NAME: &'static str = "extract";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("extract") }
}
