//! Environment detection: which persistence backend this session uses.
//!
//! The presence of a host storage capability selects `Remote`; its absence
//! selects `Local`. Absence is a signal, not an error. Detection happens
//! once; the mode never changes for the rest of the session.

use std::cell::{Cell, OnceCell};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Host key/value storage.
    Remote,
    /// File download / upload.
    Local,
}

impl Mode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Local => "local",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify an environment by whether a storage capability was supplied.
#[must_use]
pub fn detect_mode<T: ?Sized>(storage: Option<&T>) -> Mode {
    if storage.is_some() { Mode::Remote } else { Mode::Local }
}

/// Runs a probe at most once and remembers its answer.
pub struct ModeDetector {
    probe: Cell<Option<Box<dyn FnOnce() -> Mode>>>,
    mode: OnceCell<Mode>,
    probes: Cell<usize>,
}

impl ModeDetector {
    #[must_use]
    pub fn new(probe: impl FnOnce() -> Mode + 'static) -> Self {
        Self { probe: Cell::new(Some(Box::new(probe))), mode: OnceCell::new(), probes: Cell::new(0) }
    }

    /// The session's mode, probing on first call only.
    pub fn mode(&self) -> Mode {
        *self.mode.get_or_init(|| {
            self.probes.set(self.probes.get() + 1);
            self.probe.take().map_or(Mode::Local, |probe| probe())
        })
    }

    /// Whether the probe has already run.
    #[must_use]
    pub fn is_detected(&self) -> bool {
        self.mode.get().is_some()
    }

    /// Times the probe ran: 0 before the first `mode()`, 1 after.
    #[must_use]
    pub fn probe_count(&self) -> usize {
        self.probes.get()
    }
}

#[cfg(test)]
#[path = "mode_test.rs"]
mod tests;
