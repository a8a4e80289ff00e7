//! `FileIo` for the page: Blob downloads and a hidden file input.

use tracing::debug;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use super::bridge;
use crate::files::{FileIo, FileIoError};

const NOTE_MIME: &str = "application/json";
const PICKER_ACCEPT: &str = ".json,application/json";

#[derive(Default)]
pub struct BrowserFiles;

/// Object URL revoked on drop.
struct ObjectUrl(String);

impl ObjectUrl {
    fn for_blob(blob: &Blob) -> Result<Self, FileIoError> {
        Url::create_object_url_with_blob(blob)
            .map(Self)
            .map_err(|e| FileIoError::Download(bridge::js_error_to_string(&e)))
    }
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        if let Err(e) = Url::revoke_object_url(&self.0) {
            debug!(error = %bridge::js_error_to_string(&e), "object URL revoke failed");
        }
    }
}

fn download_error(err: &JsValue) -> FileIoError {
    FileIoError::Download(bridge::js_error_to_string(err))
}

#[async_trait::async_trait(?Send)]
impl FileIo for BrowserFiles {
    async fn download(&self, filename: &str, bytes: Vec<u8>) -> Result<(), FileIoError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| FileIoError::Download("no document".into()))?;

        let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes.as_slice()));
        let options = BlobPropertyBag::new();
        options.set_type(NOTE_MIME);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options).map_err(|e| download_error(&e))?;
        let url = ObjectUrl::for_blob(&blob)?;

        let anchor: HtmlAnchorElement = document
            .create_element("a")
            .map_err(|e| download_error(&e))?
            .dyn_into()
            .map_err(|e| download_error(&e))?;
        anchor.set_href(&url.0);
        anchor.set_download(filename);
        anchor.click();
        Ok(())
    }

    async fn pick_text(&self) -> Result<Option<String>, FileIoError> {
        let value = bridge::await_promise(bridge::js_pick_text(PICKER_ACCEPT)).await.map_err(FileIoError::Read)?;
        Ok(value.as_string())
    }
}
