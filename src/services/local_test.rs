use super::*;
use crate::files::FileIoError;
use crate::state::test_helpers::FakeFiles;
use time::macros::datetime;

fn adapter(files: &Rc<FakeFiles>) -> LocalAdapter {
    LocalAdapter::new(files.clone(), &NotesConfig::default())
}

// =============================================================================
// save
// =============================================================================

#[tokio::test]
async fn save_hello_produces_envelope_download() {
    let files = FakeFiles::new();
    let filename = adapter(&files).save("hello").await.unwrap();

    let (name, body) = files.last_download().unwrap();
    assert_eq!(name, filename);

    let value: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(value["content"], "hello");
    let saved = value["saved"].as_str().unwrap();
    assert!(time::OffsetDateTime::parse(saved, &time::format_description::well_known::Rfc3339).is_ok());
    assert!(saved.ends_with('Z'));
}

#[tokio::test]
async fn save_filename_is_prefix_and_epoch_millis() {
    let files = FakeFiles::new();
    let filename = adapter(&files).save("x").await.unwrap();

    let millis = filename.strip_prefix("notes-").and_then(|s| s.strip_suffix(".json")).unwrap();
    assert!(!millis.is_empty());
    assert!(millis.bytes().all(|b| b.is_ascii_digit()));

    let (_, body) = files.last_download().unwrap();
    let saved = NoteEnvelope::parse(&body).unwrap().saved.unwrap();
    assert_eq!(millis.parse::<i128>().unwrap(), saved.unix_timestamp_nanos() / 1_000_000);
}

#[test]
fn filename_for_uses_configured_prefix() {
    let files = FakeFiles::new();
    let adapter = LocalAdapter::new(files, &NotesConfig::default().with_file_prefix(" journal "));
    let env = NoteEnvelope::new("x", datetime!(1970-01-01 00:00:02.5 UTC));
    assert_eq!(adapter.filename_for(&env), "journal-2500.json");
}

#[tokio::test]
async fn save_respects_pretty_flag() {
    let files = FakeFiles::new();
    adapter(&files).save("x").await.unwrap();
    assert!(files.last_download().unwrap().1.contains('\n'));

    let compact = LocalAdapter::new(files.clone(), &NotesConfig::default().with_pretty_files(false));
    compact.save("x").await.unwrap();
    assert!(!files.last_download().unwrap().1.contains('\n'));
}

#[tokio::test]
async fn failed_download_surfaces_file_error() {
    let files = FakeFiles::new();
    *files.fail_download.borrow_mut() = Some("popup blocked".into());
    let err = adapter(&files).save("x").await.unwrap_err();
    assert!(matches!(err, NotesError::FileIo(FileIoError::Download(ref m)) if m == "popup blocked"));
    assert!(files.downloads.borrow().is_empty());
}

// =============================================================================
// load
// =============================================================================

#[tokio::test]
async fn save_then_load_round_trips() {
    let files = FakeFiles::new();
    let adapter = adapter(&files);
    for text in ["hello", "", "line one\nline two", "emoji 📝"] {
        adapter.save(text).await.unwrap();
        files.queue_last_download();
        assert_eq!(adapter.load().await.unwrap(), LocalLoad::Content(text.to_owned()));
    }
}

#[tokio::test]
async fn cancelled_picker_is_distinct_from_empty_note() {
    let files = FakeFiles::new();
    let adapter = adapter(&files);

    files.queue_pick(None);
    assert_eq!(adapter.load().await.unwrap(), LocalLoad::Cancelled);
    assert_eq!(adapter.load_state(), LoadState::Cancelled);

    files.queue_pick(Some(r#"{"content": "", "saved": "2025-03-14T09:26:53.589Z"}"#));
    assert_eq!(adapter.load().await.unwrap(), LocalLoad::Content(String::new()));
    assert_eq!(adapter.load_state(), LoadState::Parsed);
}

#[tokio::test]
async fn file_missing_content_is_malformed() {
    let files = FakeFiles::new();
    let adapter = adapter(&files);
    files.queue_pick(Some(r#"{"foo": "bar"}"#));

    let err = adapter.load().await.unwrap_err();
    assert!(matches!(err, NotesError::MalformedEnvelope(_)));
    assert_eq!(adapter.load_state(), LoadState::ParseFailed);
}

#[tokio::test]
async fn any_filename_with_valid_shape_is_accepted() {
    let files = FakeFiles::new();
    let adapter = adapter(&files);
    files.queue_pick(Some(r#"{"saved": "2020-01-01T00:00:00.000Z", "content": "from elsewhere"}"#));
    assert_eq!(adapter.load().await.unwrap(), LocalLoad::Content("from elsewhere".into()));
}

#[tokio::test]
async fn read_error_returns_to_idle() {
    let files = FakeFiles::new();
    let adapter = adapter(&files);
    files.picks.borrow_mut().push_back(Err(FileIoError::Read("disk gone".into())));

    let err = adapter.load().await.unwrap_err();
    assert!(matches!(err, NotesError::FileIo(_)));
    assert_eq!(adapter.load_state(), LoadState::Idle);
}

#[tokio::test]
async fn state_starts_idle_and_terminal_states_persist() {
    let files = FakeFiles::new();
    let adapter = adapter(&files);
    assert_eq!(adapter.load_state(), LoadState::Idle);
    assert!(!LoadState::Idle.is_terminal());
    assert!(!LoadState::PickerOpen.is_terminal());

    files.queue_pick(Some("not json"));
    let _ = adapter.load().await;
    assert_eq!(adapter.load_state(), LoadState::ParseFailed);
    assert!(adapter.load_state().is_terminal());

    // Saving does not move the load state machine.
    adapter.save("x").await.unwrap();
    assert_eq!(adapter.load_state(), LoadState::ParseFailed);
}

/// Picker that reports the adapter state observed while it is open.
struct ObservingPicker {
    seen: RefCell<Option<LoadState>>,
    adapter_state: RefCell<Option<std::rc::Weak<LocalAdapter>>>,
}

#[async_trait::async_trait(?Send)]
impl FileIo for ObservingPicker {
    async fn download(&self, _filename: &str, _bytes: Vec<u8>) -> Result<(), FileIoError> {
        Ok(())
    }

    async fn pick_text(&self) -> Result<Option<String>, FileIoError> {
        let adapter = self.adapter_state.borrow().as_ref().and_then(std::rc::Weak::upgrade);
        *self.seen.borrow_mut() = adapter.map(|a| a.load_state());
        Ok(None)
    }
}

#[tokio::test]
async fn picker_open_while_waiting_on_user() {
    let picker = Rc::new(ObservingPicker { seen: RefCell::new(None), adapter_state: RefCell::new(None) });
    let adapter = Rc::new(LocalAdapter::new(picker.clone(), &NotesConfig::default()));
    *picker.adapter_state.borrow_mut() = Some(Rc::downgrade(&adapter));

    assert_eq!(adapter.load().await.unwrap(), LocalLoad::Cancelled);
    assert_eq!(*picker.seen.borrow(), Some(LoadState::PickerOpen));
}
