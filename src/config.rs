//! Note persistence configuration.
//!
//! Nothing here is read from the environment: the page that embeds the
//! store builds a `NotesConfig` in code and hands it to `NoteStore`.

use crate::error::NotesError;

pub const DEFAULT_NOTES_KEY: &str = "notes:data";
pub const DEFAULT_FILE_PREFIX: &str = "notes";

/// Visibility flag passed to the host key/value capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// Scoped to the current user.
    #[default]
    Personal,
    /// Visible to every user of the same key. Concurrent writers are
    /// last-write-wins; the store does no conflict detection.
    Shared,
}

impl Visibility {
    #[must_use]
    pub fn is_shared(self) -> bool {
        matches!(self, Self::Shared)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesConfig {
    /// Host storage key holding the single note slot.
    pub key: String,
    pub visibility: Visibility,
    /// Download filename prefix: `<prefix>-<epoch-millis>.json`.
    pub file_prefix: String,
    /// Pretty-print downloaded files.
    pub pretty_files: bool,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            key: DEFAULT_NOTES_KEY.to_owned(),
            visibility: Visibility::Personal,
            file_prefix: DEFAULT_FILE_PREFIX.to_owned(),
            pretty_files: true,
        }
    }
}

impl NotesConfig {
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    #[must_use]
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    #[must_use]
    pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_pretty_files(mut self, pretty: bool) -> Self {
        self.pretty_files = pretty;
        self
    }

    /// Check the fields this crate owns.
    ///
    /// Host-side limits on the key (length, characters) are enforced by the
    /// host and reported through its own errors, so only emptiness is
    /// checked here.
    ///
    /// # Errors
    ///
    /// Returns [`NotesError::Config`] for an empty key or an empty prefix,
    /// or a prefix containing a path separator.
    pub fn validate(&self) -> Result<(), NotesError> {
        if self.key.trim().is_empty() {
            return Err(NotesError::Config("key cannot be empty".into()));
        }
        let prefix = self.file_prefix.trim();
        if prefix.is_empty() {
            return Err(NotesError::Config("file_prefix cannot be empty".into()));
        }
        if prefix.contains(['/', '\\']) {
            return Err(NotesError::Config(format!("file_prefix must not contain path separators, got `{prefix}`")));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
