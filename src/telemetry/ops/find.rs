use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Find;

#[derive(Copy, Clone, Debug)]
pub enum Phase { Request, Decode, LocatePayload, Match, Output }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self {
        Phase::Request => "request",
        Phase::Decode => "decode",
        Phase::LocatePayload => "locate_payload",
        Phase::Match => "match",
        Phase::Output => "output",
    }}
    fn span(&self) -> Span { match self {
        Phase::Request => info_span!("request"),
        Phase::Decode => info_span!("decode"),
        Phase::LocatePayload => info_span!("locate_payload"),
        Phase::Match => info_span!("match"),
        Phase::Output => info_span!("output"),
    }}
}

impl OpMarker for Find {
    const NAME: &'static str = "find";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("find") }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_names() {
        let names: Vec<_> = [Phase::Request, Phase::Decode, Phase::LocatePayload, Phase::Match, Phase::Output]
            .iter()
            .map(PhaseSpan::name)
            .collect();
        assert_eq!(names, ["request", "decode", "locate_payload", "match", "output"]);
    }
}
