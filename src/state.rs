//! Injected runtime capabilities.
//!
//! DESIGN
//! ======
//! `Environment` replaces ambient global probing: the embedder hands in the
//! host storage capability (or `None`) and the file capability, and the
//! store reads the mode from here. The mode is decided the first time it is
//! asked for and fixed afterwards.

use std::rc::Rc;

use crate::files::FileIo;
use crate::host::KvStore;
use crate::mode::{Mode, ModeDetector, detect_mode};

pub struct Environment {
    storage: Option<Rc<dyn KvStore>>,
    files: Rc<dyn FileIo>,
    detector: ModeDetector,
}

impl Environment {
    #[must_use]
    pub fn new(storage: Option<Rc<dyn KvStore>>, files: Rc<dyn FileIo>) -> Self {
        let probed = storage.clone();
        let detector = ModeDetector::new(move || detect_mode(probed.as_ref()));
        Self { storage, files, detector }
    }

    /// Environment without host storage.
    #[must_use]
    pub fn local(files: Rc<dyn FileIo>) -> Self {
        Self::new(None, files)
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.detector.mode()
    }

    #[must_use]
    pub fn detector(&self) -> &ModeDetector {
        &self.detector
    }

    #[must_use]
    pub fn storage(&self) -> Option<&Rc<dyn KvStore>> {
        self.storage.as_ref()
    }

    #[must_use]
    pub fn files(&self) -> &Rc<dyn FileIo> {
        &self.files
    }
}

#[cfg(test)]
pub mod test_helpers {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;
    use crate::files::FileIoError;

    /// In-memory file capability: records downloads and replays scripted
    /// picker results.
    #[derive(Default)]
    pub struct FakeFiles {
        pub downloads: RefCell<Vec<(String, Vec<u8>)>>,
        pub picks: RefCell<VecDeque<Result<Option<String>, FileIoError>>>,
        pub fail_download: RefCell<Option<String>>,
    }

    impl FakeFiles {
        #[must_use]
        pub fn new() -> Rc<Self> {
            Rc::new(Self::default())
        }

        /// Next `pick_text` returns `text`; `None` means dismissed.
        pub fn queue_pick(&self, text: Option<&str>) {
            self.picks.borrow_mut().push_back(Ok(text.map(str::to_owned)));
        }

        /// Next `pick_text` returns the last downloaded file.
        pub fn queue_last_download(&self) {
            let text = self
                .downloads
                .borrow()
                .last()
                .map(|(_, bytes)| String::from_utf8(bytes.clone()).unwrap());
            self.picks.borrow_mut().push_back(Ok(text));
        }

        pub fn last_download(&self) -> Option<(String, String)> {
            self.downloads
                .borrow()
                .last()
                .map(|(name, bytes)| (name.clone(), String::from_utf8(bytes.clone()).unwrap()))
        }
    }

    #[async_trait::async_trait(?Send)]
    impl FileIo for FakeFiles {
        async fn download(&self, filename: &str, bytes: Vec<u8>) -> Result<(), FileIoError> {
            if let Some(msg) = self.fail_download.borrow_mut().take() {
                return Err(FileIoError::Download(msg));
            }
            self.downloads.borrow_mut().push((filename.to_owned(), bytes));
            Ok(())
        }

        async fn pick_text(&self) -> Result<Option<String>, FileIoError> {
            self.picks.borrow_mut().pop_front().unwrap_or(Ok(None))
        }
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
