use super::*;

#[test]
fn host_limit_errors_keep_host_message() {
    let err = NotesError::from(HostError::Quota("value exceeds 5242880 bytes".into()));
    assert!(matches!(err, NotesError::HostQuotaOrRate(ref m) if m == "value exceeds 5242880 bytes"));
    assert_eq!(err.error_code(), "E_HOST_LIMIT");
    assert!(!err.retryable());

    let err = NotesError::from(HostError::RateLimited("too many requests".into()));
    assert!(matches!(err, NotesError::HostQuotaOrRate(_)));

    let err = NotesError::from(HostError::InvalidKey("key contains '/'".into()));
    assert!(matches!(err, NotesError::HostQuotaOrRate(_)));
}

#[test]
fn unavailable_host_is_transient_and_retryable() {
    let err = NotesError::from(HostError::Unavailable("connection reset".into()));
    assert!(matches!(err, NotesError::TransientHost(_)));
    assert_eq!(err.error_code(), "E_HOST_TRANSIENT");
    assert!(err.retryable());
    assert!(err.to_string().contains("connection reset"));
}

#[test]
fn unsupported_operation_maps_to_rejected() {
    let err = NotesError::from(HostError::Unsupported("list"));
    assert_eq!(err.error_code(), "E_HOST_REJECTED");
    assert!(err.to_string().contains("list"));
}

#[test]
fn malformed_envelope_code_is_distinct() {
    let err = NotesError::MalformedEnvelope("missing field `content`".into());
    assert_eq!(err.error_code(), "E_MALFORMED_ENVELOPE");
    assert!(!err.retryable());
}

#[test]
fn file_io_errors_convert() {
    let err: NotesError = FileIoError::Download("blocked by browser".into()).into();
    assert_eq!(err.error_code(), "E_FILE_IO");
    assert!(err.to_string().contains("blocked by browser"));
}
