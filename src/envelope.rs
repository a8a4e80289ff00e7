//! Note envelope — the `{content, saved}` JSON record both backends persist.
//!
//! DESIGN
//! ======
//! An envelope is built fresh on every save, serialized, handed to the active
//! backend and dropped. Loading parses text back and only `content` goes to
//! the caller. `saved` is written as an ISO-8601 UTC timestamp with
//! millisecond precision (`2025-03-14T09:26:53.589Z`), the shape browsers
//! produce with `Date.prototype.toISOString`.

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};
use tracing::debug;

use crate::error::NotesError;

/// A note ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteEnvelope {
    pub content: String,
    pub saved: OffsetDateTime,
}

/// A note read back from storage. `saved` is informational and absent when
/// the stored value lacks a parseable timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedNote {
    pub content: String,
    pub saved: Option<OffsetDateTime>,
}

#[derive(Serialize)]
struct WireEnvelope<'a> {
    content: &'a str,
    saved: String,
}

#[derive(Deserialize)]
struct RawEnvelope {
    content: String,
    #[serde(default)]
    saved: Option<serde_json::Value>,
}

impl NoteEnvelope {
    /// Envelope stamped with the current time, truncated to milliseconds.
    #[must_use]
    pub fn stamp(content: impl Into<String>) -> Self {
        Self::new(content, now_millis())
    }

    #[must_use]
    pub fn new(content: impl Into<String>, saved: OffsetDateTime) -> Self {
        Self { content: content.into(), saved: saved.to_offset(UtcOffset::UTC) }
    }

    /// Milliseconds since the Unix epoch of `saved`.
    #[must_use]
    pub fn saved_epoch_millis(&self) -> i128 {
        self.saved.unix_timestamp_nanos() / 1_000_000
    }

    /// `saved` rendered as an ISO-8601 string.
    ///
    /// # Errors
    ///
    /// Returns [`NotesError::Serialize`] if the timestamp cannot be formatted.
    pub fn saved_iso(&self) -> Result<String, NotesError> {
        self.saved
            .format(format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"))
            .map_err(|e| NotesError::Serialize(format!("saved timestamp: {e}")))
    }

    /// Compact JSON, used for host storage values.
    ///
    /// # Errors
    ///
    /// Returns [`NotesError::Serialize`] if encoding fails.
    pub fn to_json(&self) -> Result<String, NotesError> {
        let wire = WireEnvelope { content: &self.content, saved: self.saved_iso()? };
        serde_json::to_string(&wire).map_err(|e| NotesError::Serialize(e.to_string()))
    }

    /// Pretty-printed JSON, used for downloaded files.
    ///
    /// # Errors
    ///
    /// Returns [`NotesError::Serialize`] if encoding fails.
    pub fn to_json_pretty(&self) -> Result<String, NotesError> {
        let wire = WireEnvelope { content: &self.content, saved: self.saved_iso()? };
        serde_json::to_string_pretty(&wire).map_err(|e| NotesError::Serialize(e.to_string()))
    }

    /// Parse stored text into a note.
    ///
    /// Accepts any JSON object with a string `content` field; other fields
    /// are ignored. Anything else is malformed.
    ///
    /// # Errors
    ///
    /// Returns [`NotesError::MalformedEnvelope`] for invalid JSON, a
    /// non-object top-level value, or a missing / non-string `content`.
    pub fn parse(text: &str) -> Result<ParsedNote, NotesError> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|e| NotesError::MalformedEnvelope(format!("invalid JSON: {e}")))?;
        if !value.is_object() {
            return Err(NotesError::MalformedEnvelope("top-level value is not an object".into()));
        }
        let raw: RawEnvelope =
            serde_json::from_value(value).map_err(|e| NotesError::MalformedEnvelope(e.to_string()))?;

        let saved = match raw.saved {
            Some(serde_json::Value::String(s)) => {
                let parsed = OffsetDateTime::parse(&s, &Rfc3339).ok();
                if parsed.is_none() {
                    debug!(saved = %s, "envelope saved timestamp unparseable; ignoring");
                }
                parsed
            }
            Some(other) => {
                debug!(kind = json_kind(&other), "envelope saved field is not a string; ignoring");
                None
            }
            None => None,
        };

        Ok(ParsedNote { content: raw.content, saved })
    }
}

fn now_millis() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    now.replace_nanosecond(u32::from(now.millisecond()) * 1_000_000).unwrap_or(now)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[path = "envelope_test.rs"]
mod tests;
