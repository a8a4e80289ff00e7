//! Directory-backed file capability for native hosts.
//!
//! DESIGN
//! ======
//! A "download" is an atomic write into the target directory: bytes go to a
//! hidden temp file which is renamed over the final name. The temp file is
//! held by a guard that deletes it if the write fails part-way, so a failed
//! save never leaves a handle or partial file behind.
//!
//! A name that is already taken gets a `-1`, `-2`, ... suffix before the
//! extension, the way browsers number repeated downloads, so two saves in
//! the same millisecond both survive.
//!
//! The "picker" is a chooser callback. Without one, the newest
//! `<prefix>-<millis>[-<n>].json` in the directory is picked, and an empty
//! directory behaves like a dismissed chooser. The prefix follows the most
//! recent note download, so a store with a custom prefix reads back what it
//! wrote.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use super::{FileIo, FileIoError};
use crate::config::{DEFAULT_FILE_PREFIX, NotesConfig};

type Chooser = Box<dyn Fn(&Path) -> Option<PathBuf>>;

pub struct DirectoryFiles {
    dir: PathBuf,
    prefix: RefCell<String>,
    chooser: Option<Chooser>,
}

impl DirectoryFiles {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), prefix: RefCell::new(DEFAULT_FILE_PREFIX.to_owned()), chooser: None }
    }

    /// Directory files whose default chooser looks for `config`'s prefix.
    #[must_use]
    pub fn for_config(dir: impl Into<PathBuf>, config: &NotesConfig) -> Self {
        Self::new(dir).with_prefix(config.file_prefix.trim())
    }

    /// Prefix the default chooser looks for.
    #[must_use]
    pub fn with_prefix(self, prefix: impl Into<String>) -> Self {
        *self.prefix.borrow_mut() = prefix.into();
        self
    }

    #[must_use]
    pub fn prefix(&self) -> String {
        self.prefix.borrow().clone()
    }

    /// Replace the default chooser. Returning `None` means "dismissed".
    #[must_use]
    pub fn with_chooser(mut self, chooser: impl Fn(&Path) -> Option<PathBuf> + 'static) -> Self {
        self.chooser = Some(Box::new(chooser));
        self
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn newest_download(&self) -> Result<Option<PathBuf>, FileIoError> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let prefix = self.prefix();
        let mut newest: Option<((u128, u32), PathBuf)> = None;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(stamp) = name.to_str().and_then(|n| download_stamp(n, &prefix)) else {
                continue;
            };
            if newest.as_ref().is_none_or(|(best, _)| stamp > *best) {
                newest = Some((stamp, entry.path()));
            }
        }
        Ok(newest.map(|(_, path)| path))
    }

    /// `filename`, or the first free `<stem>-<n><ext>` when it is taken.
    async fn free_path(&self, filename: &str) -> Result<PathBuf, FileIoError> {
        let candidate = self.dir.join(filename);
        if !fs::try_exists(&candidate).await? {
            return Ok(candidate);
        }
        let (stem, ext) = match filename.rsplit_once('.') {
            Some((stem, ext)) => (stem, format!(".{ext}")),
            None => (filename, String::new()),
        };
        let mut n: u32 = 1;
        loop {
            let candidate = self.dir.join(format!("{stem}-{n}{ext}"));
            if !fs::try_exists(&candidate).await? {
                return Ok(candidate);
            }
            n += 1;
        }
    }
}

#[async_trait::async_trait(?Send)]
impl FileIo for DirectoryFiles {
    async fn download(&self, filename: &str, bytes: Vec<u8>) -> Result<(), FileIoError> {
        if filename.is_empty() || filename.contains(['/', '\\']) || filename.starts_with('.') {
            return Err(FileIoError::Download(format!("refusing filename `{filename}`")));
        }
        fs::create_dir_all(&self.dir).await?;

        let final_path = self.free_path(filename).await?;
        let tmp = TempFile::new(self.dir.join(format!(".{filename}.tmp")));

        let mut file = fs::File::create(tmp.path()).await?;
        file.write_all(&bytes).await?;
        file.flush().await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(tmp.path(), &final_path).await?;
        tmp.disarm();

        if let Some(prefix) = note_prefix(filename) {
            *self.prefix.borrow_mut() = prefix.to_owned();
        }
        debug!(path = %final_path.display(), bytes = bytes.len(), "download written");
        Ok(())
    }

    async fn pick_text(&self) -> Result<Option<String>, FileIoError> {
        let chosen = match &self.chooser {
            Some(chooser) => chooser(&self.dir),
            None => self.newest_download().await?,
        };
        let Some(path) = chosen else {
            return Ok(None);
        };

        let bytes = fs::read(&path).await?;
        let text = String::from_utf8(bytes)
            .map_err(|_| FileIoError::Read(format!("`{}` is not valid UTF-8", path.display())))?;
        debug!(path = %path.display(), bytes = text.len(), "picked file read");
        Ok(Some(text))
    }
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Parses `<prefix>-<millis>[-<n>].json` into `(millis, n)`; `n` is 0 for
/// the unsuffixed name.
fn download_stamp(name: &str, prefix: &str) -> Option<(u128, u32)> {
    let rest = name.strip_prefix(prefix)?.strip_prefix('-')?.strip_suffix(".json")?;
    let (millis, seq) = match rest.split_once('-') {
        Some((millis, seq)) if all_digits(seq) => (millis, seq.parse().ok()?),
        Some(_) => return None,
        None => (rest, 0),
    };
    if !all_digits(millis) {
        return None;
    }
    Some((millis.parse().ok()?, seq))
}

/// The prefix of a `<prefix>-<millis>.json` note filename.
fn note_prefix(filename: &str) -> Option<&str> {
    let (prefix, millis) = filename.strip_suffix(".json")?.rsplit_once('-')?;
    (!prefix.is_empty() && all_digits(millis)).then_some(prefix)
}

/// Temp file removed on drop unless disarmed.
struct TempFile {
    path: PathBuf,
    armed: bool,
}

impl TempFile {
    fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(error = %e, path = %self.path.display(), "failed to remove temp download"),
        }
    }
}

#[cfg(test)]
#[path = "directory_test.rs"]
mod tests;
