//! Local adapter — notes as downloaded / uploaded JSON files.
//!
//! DESIGN
//! ======
//! Save serializes a pretty-printed envelope and offers it as
//! `<prefix>-<epoch-millis>.json`. Load asks the user for a file and parses
//! it; the filename is irrelevant on the way back in.
//!
//! Load state machine:
//!
//! ```text
//! Idle -> PickerOpen -> Parsed
//!                    -> ParseFailed
//!                    -> Cancelled
//! ```
//!
//! Terminal states persist until the next `load()`. A read failure from the
//! capability itself drops back to `Idle`.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::config::NotesConfig;
use crate::envelope::NoteEnvelope;
use crate::error::NotesError;
use crate::files::FileIo;

/// Where the most recent `load()` got to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    PickerOpen,
    Parsed,
    ParseFailed,
    Cancelled,
}

impl LoadState {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Parsed | Self::ParseFailed | Self::Cancelled)
    }
}

/// Outcome of a local load that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalLoad {
    Content(String),
    Cancelled,
}

pub struct LocalAdapter {
    files: Rc<dyn FileIo>,
    prefix: String,
    pretty: bool,
    state: RefCell<LoadState>,
}

impl LocalAdapter {
    #[must_use]
    pub fn new(files: Rc<dyn FileIo>, config: &NotesConfig) -> Self {
        Self {
            files,
            prefix: config.file_prefix.trim().to_owned(),
            pretty: config.pretty_files,
            state: RefCell::new(LoadState::Idle),
        }
    }

    #[must_use]
    pub fn load_state(&self) -> LoadState {
        self.state.borrow().clone()
    }

    /// Filename for an envelope: `<prefix>-<epoch-millis>.json`.
    #[must_use]
    pub fn filename_for(&self, envelope: &NoteEnvelope) -> String {
        format!("{}-{}.json", self.prefix, envelope.saved_epoch_millis())
    }

    /// Offer `text` as a downloadable note file. Returns the filename used.
    ///
    /// # Errors
    ///
    /// Returns [`NotesError::FileIo`] when the download cannot be started.
    pub async fn save(&self, text: &str) -> Result<String, NotesError> {
        let envelope = NoteEnvelope::stamp(text);
        let body = if self.pretty { envelope.to_json_pretty()? } else { envelope.to_json()? };
        let filename = self.filename_for(&envelope);
        let bytes = body.len();

        if let Err(e) = self.files.download(&filename, body.into_bytes()).await {
            warn!(%filename, error = %e, "note download failed");
            return Err(e.into());
        }
        info!(%filename, bytes, "note offered as download");
        Ok(filename)
    }

    /// Ask the user for a note file and return its content.
    ///
    /// # Errors
    ///
    /// Returns [`NotesError::MalformedEnvelope`] when the chosen file is not
    /// an envelope, and [`NotesError::FileIo`] when it cannot be read.
    pub async fn load(&self) -> Result<LocalLoad, NotesError> {
        self.transition(LoadState::PickerOpen);

        let text = match self.files.pick_text().await {
            Ok(Some(text)) => text,
            Ok(None) => {
                self.transition(LoadState::Cancelled);
                return Ok(LocalLoad::Cancelled);
            }
            Err(e) => {
                warn!(error = %e, "note file read failed");
                self.transition(LoadState::Idle);
                return Err(e.into());
            }
        };

        match NoteEnvelope::parse(&text) {
            Ok(note) => {
                self.transition(LoadState::Parsed);
                info!(bytes = note.content.len(), "note loaded from file");
                Ok(LocalLoad::Content(note.content))
            }
            Err(e) => {
                self.transition(LoadState::ParseFailed);
                warn!(error = %e, "chosen file is not a note");
                Err(e)
            }
        }
    }

    fn transition(&self, next: LoadState) {
        let prev = self.state.replace(next.clone());
        debug!(from = ?prev, to = ?next, "local load state");
    }
}

#[cfg(test)]
#[path = "local_test.rs"]
mod tests;
