//! Browser bootstrap — wires the page's capabilities into a `NoteStore`.
//!
//! DESIGN
//! ======
//! This is the only place that looks at `window`. The page gets one store;
//! the environment is probed the first time it is asked for and the store
//! (and with it the mode) is reused for the rest of the page's life.
//!
//! The exported `saveNote` / `loadNote` / `notesMode` functions are the
//! surface the page's UI calls. Failures reject with `"<code>: <message>"`.

mod bridge;
pub mod files;
pub mod storage;

use std::cell::OnceCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

pub use files::BrowserFiles;
pub use storage::{BrowserKv, host_storage};

use crate::config::NotesConfig;
use crate::error::{ErrorCode, NotesError};
use crate::services::persistence::{Loaded, NoteStore};
use crate::state::Environment;

thread_local! {
    static PAGE_STORE: OnceCell<Rc<NoteStore>> = const { OnceCell::new() };
}

/// Environment built from what this page provides.
#[must_use]
pub fn page_environment() -> Environment {
    Environment::new(host_storage(), Rc::new(BrowserFiles))
}

/// The page-wide store. `config` is only used by the first call.
///
/// # Errors
///
/// Returns [`NotesError::Config`] when `config` fails validation.
pub fn page_store(config: &NotesConfig) -> Result<Rc<NoteStore>, NotesError> {
    PAGE_STORE.with(|cell| {
        if let Some(store) = cell.get() {
            return Ok(Rc::clone(store));
        }
        crate::logging::init();
        let store = Rc::new(NoteStore::from_environment(&page_environment(), config)?);
        Ok(Rc::clone(cell.get_or_init(|| store)))
    })
}

fn to_js(err: &NotesError) -> JsValue {
    JsValue::from_str(&format!("{}: {err}", err.error_code()))
}

fn default_store() -> Result<Rc<NoteStore>, JsValue> {
    page_store(&NotesConfig::default()).map_err(|e| to_js(&e))
}

#[wasm_bindgen(js_name = saveNote)]
pub async fn save_note(text: String) -> Result<(), JsValue> {
    let store = default_store()?;
    store.save(&text).await.map_err(|e| to_js(&e))
}

/// Resolves to the note text, or `null` when the user cancelled the chooser.
#[wasm_bindgen(js_name = loadNote)]
pub async fn load_note() -> Result<JsValue, JsValue> {
    let store = default_store()?;
    match store.load().await.map_err(|e| to_js(&e))? {
        Loaded::Content(text) => Ok(JsValue::from_str(&text)),
        Loaded::Cancelled => Ok(JsValue::NULL),
    }
}

#[wasm_bindgen(js_name = notesMode)]
pub fn notes_mode() -> Result<String, JsValue> {
    Ok(default_store()?.mode().as_str().to_owned())
}
