//! Local file capability: "download these bytes" and "let the user pick a
//! file and read it as text".
//!
//! In the browser this is a Blob download and a file chooser. Natively,
//! `DirectoryFiles` writes downloads into a directory and picks files through
//! an injectable chooser.

#[cfg(not(target_arch = "wasm32"))]
pub mod directory;

#[cfg(not(target_arch = "wasm32"))]
pub use directory::DirectoryFiles;

#[derive(Debug, thiserror::Error)]
pub enum FileIoError {
    #[error("file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("download failed: {0}")]
    Download(String),

    #[error("file read failed: {0}")]
    Read(String),
}

#[async_trait::async_trait(?Send)]
pub trait FileIo {
    /// Offer `bytes` to the user as a file named `filename`. Any temporary
    /// handle acquired for the transfer is released before this returns.
    async fn download(&self, filename: &str, bytes: Vec<u8>) -> Result<(), FileIoError>;

    /// Let the user choose a file and return its full text, or `None` when
    /// the chooser is dismissed. Waits on the user with no timeout.
    async fn pick_text(&self) -> Result<Option<String>, FileIoError>;
}
