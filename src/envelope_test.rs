use super::*;
use time::macros::datetime;

fn fixed() -> NoteEnvelope {
    NoteEnvelope::new("hello", datetime!(2025-03-14 09:26:53.589 UTC))
}

// =============================================================================
// Serialization
// =============================================================================

#[test]
fn saved_iso_matches_browser_shape() {
    assert_eq!(fixed().saved_iso().unwrap(), "2025-03-14T09:26:53.589Z");
}

#[test]
fn saved_iso_pads_whole_seconds() {
    let env = NoteEnvelope::new("x", datetime!(2025-01-02 03:04:05 UTC));
    assert_eq!(env.saved_iso().unwrap(), "2025-01-02T03:04:05.000Z");
}

#[test]
fn new_normalizes_offset_to_utc() {
    let env = NoteEnvelope::new("x", datetime!(2025-03-14 10:26:53.589 +01:00));
    assert_eq!(env.saved_iso().unwrap(), "2025-03-14T09:26:53.589Z");
}

#[test]
fn to_json_has_exactly_two_fields() {
    let json = fixed().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let obj = value.as_object().unwrap();
    assert_eq!(obj.len(), 2);
    assert_eq!(obj["content"], "hello");
    assert_eq!(obj["saved"], "2025-03-14T09:26:53.589Z");
    assert!(!json.contains('\n'));
}

#[test]
fn to_json_pretty_is_multiline() {
    let json = fixed().to_json_pretty().unwrap();
    assert!(json.contains('\n'));
    assert!(json.contains("\"content\": \"hello\""));
}

#[test]
fn epoch_millis_from_saved() {
    let env = NoteEnvelope::new("x", datetime!(1970-01-01 00:00:01.250 UTC));
    assert_eq!(env.saved_epoch_millis(), 1250);
}

#[test]
fn stamp_truncates_to_milliseconds() {
    let env = NoteEnvelope::stamp("now");
    assert_eq!(env.saved.nanosecond() % 1_000_000, 0);
    assert_eq!(env.content, "now");
}

// =============================================================================
// Parsing
// =============================================================================

#[test]
fn parse_reads_own_output() {
    let parsed = NoteEnvelope::parse(&fixed().to_json().unwrap()).unwrap();
    assert_eq!(parsed.content, "hello");
    assert_eq!(parsed.saved, Some(datetime!(2025-03-14 09:26:53.589 UTC)));
}

#[test]
fn parse_accepts_empty_content() {
    let parsed = NoteEnvelope::parse(r#"{"content": "", "saved": "2025-03-14T09:26:53.589Z"}"#).unwrap();
    assert_eq!(parsed.content, "");
}

#[test]
fn parse_ignores_extra_fields() {
    let parsed = NoteEnvelope::parse(r#"{"content": "a", "saved": "2025-03-14T09:26:53Z", "tags": [1]}"#).unwrap();
    assert_eq!(parsed.content, "a");
    assert!(parsed.saved.is_some());
}

#[test]
fn parse_tolerates_missing_or_bad_saved() {
    let parsed = NoteEnvelope::parse(r#"{"content": "a"}"#).unwrap();
    assert_eq!(parsed.saved, None);

    let parsed = NoteEnvelope::parse(r#"{"content": "a", "saved": "yesterday"}"#).unwrap();
    assert_eq!(parsed.saved, None);

    let parsed = NoteEnvelope::parse(r#"{"content": "a", "saved": 1710408413589}"#).unwrap();
    assert_eq!(parsed.saved, None);
}

#[test]
fn parse_rejects_missing_content() {
    let err = NoteEnvelope::parse(r#"{"foo": "bar"}"#).unwrap_err();
    assert!(matches!(err, NotesError::MalformedEnvelope(ref m) if m.contains("content")));
}

#[test]
fn parse_rejects_non_string_content() {
    let err = NoteEnvelope::parse(r#"{"content": 42, "saved": "2025-03-14T09:26:53.589Z"}"#).unwrap_err();
    assert!(matches!(err, NotesError::MalformedEnvelope(_)));
}

#[test]
fn parse_rejects_non_object_top_level() {
    for text in [r#"["hello", "2025-03-14T09:26:53.589Z"]"#, r#""hello""#, "null", "3"] {
        let err = NoteEnvelope::parse(text).unwrap_err();
        assert!(matches!(err, NotesError::MalformedEnvelope(_)), "{text} should be malformed");
    }
}

#[test]
fn parse_rejects_invalid_json() {
    let err = NoteEnvelope::parse("{content: hello").unwrap_err();
    assert!(matches!(err, NotesError::MalformedEnvelope(ref m) if m.starts_with("invalid JSON")));
}
