use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Fetch;

#[derive(Copy, Clone, Debug)]
pub enum Phase { Request, Decode, Extract, Alternatives, Save, Output }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self {
        Phase::Request => "request",
        Phase::Decode => "decode",
        Phase::Extract => "extract",
        Phase::Alternatives => "alternatives",
        Phase::Save => "save",
        Phase::Output => "output",
    }}
    fn span(&self) -> Span { match self {
        Phase::Request => info_span!("request"),
        Phase::Decode => info_span!("decode"),
        Phase::Extract => info_span!("extract"),
        Phase::Alternatives => info_span!("alternatives"),
        Phase::Save => info_span!("save"),
        Phase::Output => info_span!("output"),
    }}
}

impl OpMarker for Fetch {
    const NAME: &'static str = "fetch";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("fetch") }
}
