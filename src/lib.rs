//! notestore — save and load a single text note wherever the page can keep it.
//!
//! SYSTEM CONTEXT
//! ==============
//! When the embedding page offers a host key/value storage capability the
//! note lives there under one key; otherwise it is downloaded as a JSON file
//! and read back through a file chooser. Callers only see `save(text)` and
//! `load()`; which backend runs is decided once per `Environment`.
//!
//! ```text
//! Environment ──► ModeDetector ──► NoteStore ─┬─► RemoteAdapter ──► KvStore
//!                                             └─► LocalAdapter  ──► FileIo
//! ```

pub mod config;
pub mod envelope;
pub mod error;
pub mod files;
pub mod host;
pub mod logging;
pub mod mode;
pub mod services;
pub mod state;

#[cfg(all(feature = "browser", target_arch = "wasm32"))]
pub mod browser;

pub use config::{NotesConfig, Visibility};
pub use envelope::{NoteEnvelope, ParsedNote};
pub use error::{ErrorCode, NotesError, NotesResult};
#[cfg(not(target_arch = "wasm32"))]
pub use files::DirectoryFiles;
pub use files::{FileIo, FileIoError};
pub use host::{HostError, HostReply, KvStore, MemoryKv, MemoryKvLimits};
pub use mode::{Mode, ModeDetector, detect_mode};
pub use services::local::{LoadState, LocalAdapter};
pub use services::persistence::{Loaded, NoteStore};
pub use services::remote::RemoteAdapter;
pub use state::Environment;
