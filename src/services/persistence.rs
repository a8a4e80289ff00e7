//! Persistence service — the `save` / `load` pair the UI calls.
//!
//! DESIGN
//! ======
//! `NoteStore` picks its adapter once, from the environment's mode, and
//! never switches. Calls are serialized through a fair async lock so that
//! operations the user triggers in order also complete in order, even if the
//! UI fires them without awaiting the previous one.

use std::rc::Rc;

use tokio::sync::Mutex;
use tracing::info;

use super::local::{LocalAdapter, LocalLoad, LoadState};
use super::remote::RemoteAdapter;
use crate::config::NotesConfig;
use crate::error::NotesError;
use crate::mode::Mode;
use crate::state::Environment;

/// Result of a `load` that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Loaded {
    /// The note text. Empty when nothing was ever saved remotely.
    Content(String),
    /// The user dismissed the file chooser.
    Cancelled,
}

impl Loaded {
    /// The text, or `None` when the user cancelled.
    #[must_use]
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Content(text) => Some(text),
            Self::Cancelled => None,
        }
    }
}

impl From<LocalLoad> for Loaded {
    fn from(load: LocalLoad) -> Self {
        match load {
            LocalLoad::Content(text) => Self::Content(text),
            LocalLoad::Cancelled => Self::Cancelled,
        }
    }
}

enum Backend {
    Remote(RemoteAdapter),
    Local(LocalAdapter),
}

pub struct NoteStore {
    backend: Backend,
    op_lock: Mutex<()>,
}

impl NoteStore {
    /// Build the store for `env`, fixing its mode for the store's lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`NotesError::Config`] when `config` fails validation.
    pub fn from_environment(env: &Environment, config: &NotesConfig) -> Result<Self, NotesError> {
        config.validate()?;

        let backend = match (env.mode(), env.storage()) {
            (Mode::Remote, Some(storage)) => Backend::Remote(RemoteAdapter::new(Rc::clone(storage), config)),
            _ => Backend::Local(LocalAdapter::new(Rc::clone(env.files()), config)),
        };
        let store = Self { backend, op_lock: Mutex::new(()) };
        info!(mode = %store.mode(), "note store ready");
        Ok(store)
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        match self.backend {
            Backend::Remote(_) => Mode::Remote,
            Backend::Local(_) => Mode::Local,
        }
    }

    /// Persist `text` as the note.
    ///
    /// # Errors
    ///
    /// Propagates the active adapter's failure unchanged.
    pub async fn save(&self, text: &str) -> Result<(), NotesError> {
        let _guard = self.op_lock.lock().await;
        match &self.backend {
            Backend::Remote(remote) => remote.save(text).await,
            Backend::Local(local) => local.save(text).await.map(|_| ()),
        }
    }

    /// Load the note.
    ///
    /// # Errors
    ///
    /// Propagates the active adapter's failure unchanged. "Nothing stored"
    /// and "chooser dismissed" are not errors.
    pub async fn load(&self) -> Result<Loaded, NotesError> {
        let _guard = self.op_lock.lock().await;
        match &self.backend {
            Backend::Remote(remote) => remote.load().await.map(Loaded::Content),
            Backend::Local(local) => local.load().await.map(Loaded::from),
        }
    }

    /// The local adapter's load state; `None` in remote mode.
    #[must_use]
    pub fn local_load_state(&self) -> Option<LoadState> {
        match &self.backend {
            Backend::Local(local) => Some(local.load_state()),
            Backend::Remote(_) => None,
        }
    }

    /// The remote adapter, for slot management; `None` in local mode.
    #[must_use]
    pub fn remote_adapter(&self) -> Option<&RemoteAdapter> {
        match &self.backend {
            Backend::Remote(remote) => Some(remote),
            Backend::Local(_) => None,
        }
    }
}

#[cfg(test)]
#[path = "persistence_test.rs"]
mod tests;
