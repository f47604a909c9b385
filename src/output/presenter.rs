use std::io::{self, Write};
use serde_json::{Map, Value};

use super::config::OutputFormat;
use crate::summary::summarize;

pub trait Presenter: Send + Sync {
    fn emit(&self, matches: &[&Map<String, Value>], w: &mut dyn Write) -> io::Result<()>;
}

pub struct JsonPresenter { pub pretty: bool }
impl Presenter for JsonPresenter {
    fn emit(&self, matches: &[&Map<String, Value>], w: &mut dyn Write) -> io::Result<()> {
        if self.pretty { serde_json::to_writer_pretty(&mut *w, matches).map_err(to_io)? } else { serde_json::to_writer(&mut *w, matches).map_err(to_io)? }
        writeln!(w)
    }
}

pub struct SummaryPresenter;
impl Presenter for SummaryPresenter {
    fn emit(&self, matches: &[&Map<String, Value>], w: &mut dyn Write) -> io::Result<()> {
        let summaries: Vec<Map<String, Value>> = matches.iter().map(|m| summarize(m)).collect();
        serde_json::to_writer_pretty(&mut *w, &summaries).map_err(to_io)?;
        writeln!(w)
    }
}

pub fn presenter_for(format: OutputFormat) -> Box<dyn Presenter> {
    match format {
        OutputFormat::Json => Box::new(JsonPresenter { pretty: false }),
        OutputFormat::Pretty => Box::new(JsonPresenter { pretty: true }),
        OutputFormat::Summary => Box::new(SummaryPresenter),
    }
}

/// Render into memory; used when the same rendering goes to stdout and a file.
pub fn render(format: OutputFormat, matches: &[&Map<String, Value>]) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    presenter_for(format).emit(matches, &mut buf)?;
    Ok(buf)
}

fn to_io(e: serde_json::Error) -> io::Error { io::Error::new(io::ErrorKind::Other, e) }
