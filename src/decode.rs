//! Raw response body to text.
//!
//! Handles gzip framing that slipped past the transport, then tries UTF-8 and Latin-1.
//! Non-UTF-8 bodies carrying NUL bytes are treated as binary and base64 encoded instead,
//! so raw bytes never leave this module untagged.

use base64::Engine;
use flate2::read::GzDecoder;
use serde::Serialize;
use std::io::Read;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum TextEncoding {
    #[serde(rename = "utf-8")]
    Utf8,
    #[serde(rename = "latin-1")]
    Latin1,
    #[serde(rename = "base64")]
    Base64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decoded {
    pub text: String,
    pub encoding: TextEncoding,
    pub decompressed: bool,
}

pub fn decode(raw: &[u8]) -> Decoded {
    let (bytes, decompressed) = match gunzip(raw) {
        Some(Ok(inflated)) => {
            tracing::debug!(from = raw.len(), to = inflated.len(), "decompressed gzipped content");
            (std::borrow::Cow::Owned(inflated), true)
        }
        Some(Err(e)) => {
            tracing::warn!(error = %e, "failed to decompress gzip; using raw bytes");
            (std::borrow::Cow::Borrowed(raw), false)
        }
        None => (std::borrow::Cow::Borrowed(raw), false),
    };

    if let Ok(s) = std::str::from_utf8(&bytes) {
        return Decoded { text: s.to_string(), encoding: TextEncoding::Utf8, decompressed };
    }
    if bytes.contains(&0) {
        tracing::debug!(bytes = bytes.len(), "content appears to be binary, encoding as base64");
        let text = base64::engine::general_purpose::STANDARD.encode(&bytes);
        return Decoded { text, encoding: TextEncoding::Base64, decompressed };
    }
    let text = encoding_rs::mem::decode_latin1(&bytes).into_owned();
    Decoded { text, encoding: TextEncoding::Latin1, decompressed }
}

fn gunzip(raw: &[u8]) -> Option<std::io::Result<Vec<u8>>> {
    if !raw.starts_with(&GZIP_MAGIC) { return None; }
    let mut out = Vec::new();
    Some(GzDecoder::new(raw).read_to_end(&mut out).map(|_| out))
}
