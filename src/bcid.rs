use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use url::Url;

// bc-xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx, any case
#[allow(clippy::expect_used)]
static BCID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)bc-[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}").expect("valid regex")
});

const QUERY_KEYS: [&str; 2] = ["selectedBcId", "bcId"];

/// Agent identifier. Equality ignores ASCII case; the original spelling is kept for display.
#[derive(Debug, Clone, Eq)]
pub struct BcId(String);

impl BcId {
    /// First identifier-shaped substring of `s`.
    pub fn find_in(s: &str) -> Option<BcId> {
        BCID_RE.find(s).map(|m| BcId(m.as_str().to_string()))
    }

    pub fn as_str(&self) -> &str { &self.0 }

    /// Whether the first identifier found in `candidate` equals this one.
    pub fn matches_first_in(&self, candidate: &str) -> bool {
        BcId::find_in(candidate).is_some_and(|found| found == *self)
    }
}

impl PartialEq for BcId {
    fn eq(&self, other: &Self) -> bool { self.0.eq_ignore_ascii_case(&other.0) }
}

impl fmt::Display for BcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

/// clap value parser for `--bcid`.
pub fn parse_arg(s: &str) -> Result<BcId, String> {
    BcId::find_in(s).ok_or_else(|| format!("'{}' does not contain a bc-<uuid> identifier", s))
}

/// Pull an agent id out of a URL.
///
/// The `selectedBcId` / `bcId` query parameters are checked first (their value is searched, not
/// taken verbatim), then the whole URL string. Unparseable URLs skip straight to the string scan.
pub fn from_url(url: &str) -> Option<BcId> {
    match Url::parse(url) {
        Ok(parsed) => {
            let param = parsed
                .query_pairs()
                .find(|(k, _)| QUERY_KEYS.iter().any(|q| k.eq_ignore_ascii_case(q)))
                .map(|(_, v)| v.into_owned());
            if let Some(id) = param.as_deref().and_then(BcId::find_in) {
                return Some(id);
            }
        }
        Err(e) => tracing::debug!(url, error = %e, "url did not parse; scanning raw string"),
    }
    BcId::find_in(url)
}
