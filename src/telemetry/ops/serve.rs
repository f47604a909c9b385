use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Serve;

#[derive(Copy, Clone, Debug)]
pub enum Phase { Startup, Handle }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self { Phase::Startup => "startup", Phase::Handle => "handle" } }
    fn span(&self) -> Span { match self { Phase::Startup => info_span!("startup"), Phase::Handle => info_span!("handle") } }
}

impl OpMarker for Serve {
    const NAME: &'static str = "serve";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("serve") }
}
