//! Remote adapter — note slot in host key/value storage.
//!
//! DESIGN
//! ======
//! One fixed key, one visibility flag, one round-trip per call. Loads always
//! re-fetch; nothing is cached locally. Host limits (key shape, value size,
//! request rate) are the host's to enforce: the adapter only translates the
//! host's answers. A never-written key loads as an empty note.
//!
//! With shared visibility, writers from different users race and the last
//! write wins.

use std::cell::Cell;
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::config::{NotesConfig, Visibility};
use crate::envelope::NoteEnvelope;
use crate::error::NotesError;
use crate::host::{HostError, KvStore};

pub struct RemoteAdapter {
    store: Rc<dyn KvStore>,
    key: String,
    visibility: Visibility,
    shared_warned: Cell<bool>,
}

impl RemoteAdapter {
    #[must_use]
    pub fn new(store: Rc<dyn KvStore>, config: &NotesConfig) -> Self {
        Self { store, key: config.key.clone(), visibility: config.visibility, shared_warned: Cell::new(false) }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    fn shared(&self) -> bool {
        if self.visibility.is_shared() && !self.shared_warned.replace(true) {
            warn!(key = %self.key, "shared note slot: concurrent writers are last-write-wins");
        }
        self.visibility.is_shared()
    }

    /// Write `text` as the note, replacing whatever was stored.
    ///
    /// # Errors
    ///
    /// Host failures are returned as-is in meaning: limit violations as
    /// [`NotesError::HostQuotaOrRate`], faults as [`NotesError::TransientHost`].
    pub async fn save(&self, text: &str) -> Result<(), NotesError> {
        let envelope = NoteEnvelope::stamp(text);
        let value = envelope.to_json()?;
        let shared = self.shared();

        if let Err(e) = self.store.set(&self.key, &value, shared).await {
            warn!(key = %self.key, shared, error = %e, "remote save failed");
            return Err(e.into());
        }
        info!(key = %self.key, shared, bytes = value.len(), "note saved to host storage");
        Ok(())
    }

    /// Fetch the note. A key that was never written yields `""`.
    ///
    /// # Errors
    ///
    /// Returns [`NotesError::MalformedEnvelope`] when the stored value is not
    /// an envelope, and host failures as in [`RemoteAdapter::save`].
    pub async fn load(&self) -> Result<String, NotesError> {
        let shared = self.shared();
        let value = match self.store.get(&self.key, shared).await {
            Ok(value) => value,
            Err(HostError::NotFound(_)) => {
                debug!(key = %self.key, shared, "no stored note; loading empty");
                return Ok(String::new());
            }
            Err(e) => {
                warn!(key = %self.key, shared, error = %e, "remote load failed");
                return Err(e.into());
            }
        };

        let note = NoteEnvelope::parse(&value)?;
        info!(key = %self.key, shared, bytes = note.content.len(), "note loaded from host storage");
        Ok(note.content)
    }

    /// Remove the note slot. Clearing an empty slot succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`NotesError::HostRejected`] if the host has no delete
    /// operation, and other host failures as in [`RemoteAdapter::save`].
    pub async fn clear(&self) -> Result<(), NotesError> {
        let shared = self.shared();
        match self.store.delete(&self.key, shared).await {
            Ok(()) | Err(HostError::NotFound(_)) => {
                info!(key = %self.key, shared, "note slot cleared");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Keys in the same visibility scope starting with `prefix`.
    ///
    /// # Errors
    ///
    /// Returns [`NotesError::HostRejected`] if the host has no list
    /// operation, and other host failures as in [`RemoteAdapter::save`].
    pub async fn list_slots(&self, prefix: &str) -> Result<Vec<String>, NotesError> {
        Ok(self.store.list(prefix, self.shared()).await?)
    }
}

#[cfg(test)]
#[path = "remote_test.rs"]
mod tests;
