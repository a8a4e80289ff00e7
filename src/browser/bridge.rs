//! JS glue for the page's host storage object and the file chooser.
//!
//! The host storage API is reached through `window.storage` with
//! `set(key, value, shared)`, `get(key, shared)` and optionally
//! `delete(key, shared)` / `list(prefix, shared)`, all promise-returning.

use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

#[wasm_bindgen(inline_js = r#"
function hostStorage() {
  if (typeof window === 'undefined') {
    return null;
  }
  const s = window.storage;
  if (!s || typeof s.get !== 'function' || typeof s.set !== 'function') {
    return null;
  }
  return s;
}

function requireStorage() {
  const s = hostStorage();
  if (!s) {
    throw new Error('host storage unavailable');
  }
  return s;
}

export function jsHostStorageAvailable() {
  return hostStorage() !== null;
}

export async function jsHostSet(key, value, shared) {
  await requireStorage().set(key, value, shared);
  return null;
}

export async function jsHostGet(key, shared) {
  const result = await requireStorage().get(key, shared);
  if (result === null || result === undefined) {
    return null;
  }
  if (typeof result === 'string') {
    return result;
  }
  if (typeof result === 'object' && 'value' in result) {
    const value = result.value;
    if (value === null || value === undefined) {
      return null;
    }
    return typeof value === 'string' ? value : JSON.stringify(value);
  }
  return JSON.stringify(result);
}

export function jsHostHasOp(name) {
  const s = hostStorage();
  return !!s && typeof s[name] === 'function';
}

export async function jsHostDelete(key, shared) {
  await requireStorage().delete(key, shared);
  return null;
}

export async function jsHostList(prefix, shared) {
  const result = await requireStorage().list(prefix, shared);
  const keys = Array.isArray(result) ? result : (result && result.keys) || [];
  return keys.map((k) => (typeof k === 'string' ? k : k.key)).filter((k) => typeof k === 'string');
}

export function jsPickText(accept) {
  return new Promise((resolve, reject) => {
    const input = document.createElement('input');
    input.type = 'file';
    input.accept = accept;
    input.style.display = 'none';
    const finish = () => input.remove();
    input.addEventListener('change', async () => {
      const file = input.files && input.files[0];
      if (!file) {
        finish();
        resolve(null);
        return;
      }
      try {
        const text = await file.text();
        finish();
        resolve(text);
      } catch (err) {
        finish();
        reject(err);
      }
    });
    input.addEventListener('cancel', () => {
      finish();
      resolve(null);
    });
    document.body.appendChild(input);
    input.click();
  });
}
"#)]
extern "C" {
    #[wasm_bindgen(js_name = jsHostStorageAvailable)]
    pub fn js_host_storage_available() -> bool;
    #[wasm_bindgen(js_name = jsHostHasOp)]
    pub fn js_host_has_op(name: &str) -> bool;
    #[wasm_bindgen(js_name = jsHostSet)]
    pub fn js_host_set(key: &str, value: &str, shared: bool) -> Promise;
    #[wasm_bindgen(js_name = jsHostGet)]
    pub fn js_host_get(key: &str, shared: bool) -> Promise;
    #[wasm_bindgen(js_name = jsHostDelete)]
    pub fn js_host_delete(key: &str, shared: bool) -> Promise;
    #[wasm_bindgen(js_name = jsHostList)]
    pub fn js_host_list(prefix: &str, shared: bool) -> Promise;
    #[wasm_bindgen(js_name = jsPickText)]
    pub fn js_pick_text(accept: &str) -> Promise;
}

pub async fn await_promise(promise: Promise) -> Result<JsValue, String> {
    JsFuture::from(promise).await.map_err(|e| js_error_to_string(&e))
}

pub fn js_error_to_string(err: &JsValue) -> String {
    if let Some(text) = err.as_string() {
        return text;
    }
    if let Ok(message) = js_sys::Reflect::get(err, &JsValue::from_str("message")) {
        if let Some(text) = message.as_string() {
            return text;
        }
    }
    format!("{err:?}")
}
