//! JSON plumbing shared by the adapters.

use crate::error::{MalformedKind, Result, SitError};
use crate::model::{JsonObject, SbomFormat};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Deserialize a document, mapping failures to `MalformedDocument`.
pub(crate) fn from_slice<T: DeserializeOwned>(format: SbomFormat, content: &[u8]) -> Result<T> {
    if std::str::from_utf8(content).is_err() {
        return Err(SitError::malformed(
            format,
            "reading input",
            MalformedKind::NotUtf8,
        ));
    }
    serde_json::from_slice(content).map_err(|e| SitError::invalid_json(format, &e))
}

/// Serialize a document to JSON bytes.
pub(crate) fn to_vec<T: Serialize>(format: SbomFormat, value: &T, pretty: bool) -> Result<Vec<u8>> {
    let result = if pretty {
        serde_json::to_vec_pretty(value)
    } else {
        serde_json::to_vec(value)
    };
    result.map_err(|e| SitError::validation(format!("{format} serialization failed: {e}")))
}

/// Unwrap a required field or fail with `MissingField`.
pub(crate) fn require<T>(
    format: SbomFormat,
    value: Option<T>,
    field: &str,
    context: &str,
) -> Result<T> {
    value.ok_or_else(|| SitError::missing_field(format, field, context))
}

/// Parse an RFC 3339 timestamp.
pub(crate) fn parse_timestamp(format: SbomFormat, field: &str, raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            SitError::malformed(
                format,
                "document metadata",
                MalformedKind::InvalidValue {
                    field: field.to_string(),
                    message: format!("'{raw}' is not an RFC 3339 timestamp: {e}"),
                },
            )
        })
}

/// Timestamp in the second-precision UTC form the SBOM schemas expect.
pub(crate) fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Extension fields to write back, minus keys owned by typed fields.
pub(crate) fn extension_fields(stored: Option<&JsonObject>, reserved: &[&str]) -> JsonObject {
    stored
        .map(|fields| {
            fields
                .iter()
                .filter(|(k, _)| !reserved.contains(&k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()
        })
        .unwrap_or_default()
}

/// Lossy text view used by the detectors.
pub(crate) fn preview(content: &[u8]) -> std::borrow::Cow<'_, str> {
    const PREVIEW_LEN: usize = 64 * 1024;
    String::from_utf8_lossy(&content[..content.len().min(PREVIEW_LEN)])
}

/// True if the first non-whitespace byte opens a JSON object.
pub(crate) fn looks_like_json_object(content: &[u8]) -> bool {
    content
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|b| *b == b'{')
}
