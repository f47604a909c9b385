use clap::ValueEnum;

/// How matched objects are rendered by `find`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Summaries of each match, indented
    #[default]
    Summary,
    /// Raw matches, compact
    Json,
    /// Raw matches, indented
    Pretty,
}
