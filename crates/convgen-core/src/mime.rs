//! Content-type classification.
//!
//! Maps a declared content type to the serialization family the synthesizer
//! uses for a body. Classification is pure and total: anything unrecognized
//! is treated as opaque binary.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Serialization family of a content type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MimeFamily {
    Text,
    Xml,
    Multipart,
    Binary,
    Json,
}

impl MimeFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Xml => "xml",
            Self::Multipart => "multipart",
            Self::Binary => "binary",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for MimeFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const MERGE_PATCH_JSON: &str = "application/merge-patch+json";

/// Weighted JSON entry appended to response media types for error payloads
const ERROR_WEIGHTED_JSON: &str = "application/json;q=0.9";

/// Keys are lower-case; lookups lower-case their input.
static KNOWN_MIME_TYPES: Lazy<HashMap<&'static str, MimeFamily>> = Lazy::new(|| {
    HashMap::from([
        ("text/xml", MimeFamily::Xml),
        ("application/xml", MimeFamily::Xml),
        ("application/json", MimeFamily::Json),
        ("text/css", MimeFamily::Text),
        ("text/csv", MimeFamily::Text),
        ("text/html", MimeFamily::Text),
        ("text/javascript", MimeFamily::Text),
        ("text/plain", MimeFamily::Text),
        (MERGE_PATCH_JSON, MimeFamily::Json),
    ])
});

/// Media type without its `;`-delimited parameters, lower-cased
fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn lookup(content_type: &str) -> Option<MimeFamily> {
    let essence = essence(content_type);
    // RFC 6839 structured syntax suffix wins over the table
    if essence.starts_with("application/") && essence.ends_with("+json") {
        return Some(MimeFamily::Json);
    }
    KNOWN_MIME_TYPES.get(essence.as_str()).copied()
}

/// Classify a declared request content type
pub fn classify_mime(content_type: &str) -> MimeFamily {
    lookup(content_type).unwrap_or(MimeFamily::Binary)
}

/// First recognized family among declared response media types
pub fn classify_media_types<'a, I>(media_types: I) -> MimeFamily
where
    I: IntoIterator<Item = &'a str>,
{
    media_types
        .into_iter()
        .filter(|media_type| *media_type != ERROR_WEIGHTED_JSON)
        .find_map(lookup)
        .unwrap_or(MimeFamily::Binary)
}

/// Whether the operation sends an RFC 7396 merge-patch document
pub fn is_merge_patch(content_type: &str) -> bool {
    content_type.trim().eq_ignore_ascii_case(MERGE_PATCH_JSON)
}
