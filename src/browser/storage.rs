//! `KvStore` over the page's `window.storage` object.

use std::rc::Rc;

use tracing::debug;
use wasm_bindgen::JsValue;

use super::bridge;
use crate::host::{HostError, HostReply, KvStore};

/// Handle to the host storage object. Only built once the probe has seen it.
pub struct BrowserKv;

/// The host storage capability, or `None` when the page has none.
#[must_use]
pub fn host_storage() -> Option<Rc<dyn KvStore>> {
    let available = bridge::js_host_storage_available();
    debug!(available, "probed window.storage");
    available.then(|| Rc::new(BrowserKv) as Rc<dyn KvStore>)
}

fn rejected(message: String) -> HostError {
    HostError::from_message(&message)
}

fn reply(value: JsValue) -> HostReply {
    if value.is_null() || value.is_undefined() {
        HostReply::Missing
    } else if let Some(text) = value.as_string() {
        HostReply::Text(text)
    } else {
        let text = js_sys::JSON::stringify(&value).ok().and_then(|s| s.as_string()).unwrap_or_default();
        HostReply::Other(text)
    }
}

#[async_trait::async_trait(?Send)]
impl KvStore for BrowserKv {
    async fn set(&self, key: &str, value: &str, shared: bool) -> Result<(), HostError> {
        bridge::await_promise(bridge::js_host_set(key, value, shared)).await.map_err(rejected)?;
        Ok(())
    }

    async fn get(&self, key: &str, shared: bool) -> Result<String, HostError> {
        let value = bridge::await_promise(bridge::js_host_get(key, shared)).await.map_err(rejected)?;
        reply(value).into_value(key)
    }

    async fn delete(&self, key: &str, shared: bool) -> Result<(), HostError> {
        if !bridge::js_host_has_op("delete") {
            return Err(HostError::Unsupported("delete"));
        }
        bridge::await_promise(bridge::js_host_delete(key, shared)).await.map_err(rejected)?;
        Ok(())
    }

    async fn list(&self, prefix: &str, shared: bool) -> Result<Vec<String>, HostError> {
        if !bridge::js_host_has_op("list") {
            return Err(HostError::Unsupported("list"));
        }
        let value = bridge::await_promise(bridge::js_host_list(prefix, shared)).await.map_err(rejected)?;
        let keys = js_sys::Array::from(&value)
            .iter()
            .filter_map(|k: JsValue| k.as_string())
            .collect();
        Ok(keys)
    }
}
