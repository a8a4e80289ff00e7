//! Host key/value storage capability.
//!
//! DESIGN
//! ======
//! The host page may provide an asynchronous key/value API. The core never
//! looks for it; whoever builds the `Environment` passes it in, or passes
//! nothing and the store falls back to local files. `MemoryKv` is an
//! in-process host with the same limits, used by native embedders and tests.
//!
//! Traits are `?Send`: the browser's host objects live on one thread and so
//! do the handles to them.

pub mod memory;

pub use memory::{MemoryKv, MemoryKvLimits};

/// Failure reported by a host capability.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// The key has never been written (or was deleted).
    #[error("key not found: {0}")]
    NotFound(String),

    /// Value too large or storage quota exhausted.
    #[error("{0}")]
    Quota(String),

    /// Request rate limit hit.
    #[error("{0}")]
    RateLimited(String),

    /// The key breaks the host's key rules.
    #[error("{0}")]
    InvalidKey(String),

    /// Network or host fault, or the request was abandoned.
    #[error("{0}")]
    Unavailable(String),

    /// The host does not implement an optional operation.
    #[error("operation not supported: {0}")]
    Unsupported(&'static str),
}

impl HostError {
    /// Classify a host rejection message. Hosts report failures as free
    /// text, so this keys on whole words and phrases their limit errors
    /// use; anything unrecognised is treated as a transient fault.
    #[must_use]
    pub fn from_message(message: &str) -> Self {
        let words: Vec<String> = message
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase)
            .collect();
        let normalized = format!(" {} ", words.join(" "));
        let has = |phrase: &str| normalized.contains(&format!(" {phrase} "));
        let owned = message.to_owned();

        if has("not found") || has("no such key") {
            Self::NotFound(owned)
        } else if has("rate limit") || has("rate limited") || has("too many requests") || has("throttled") {
            Self::RateLimited(owned)
        } else if has("quota") || has("too large") || has("exceeds") || has("exceeded") {
            Self::Quota(owned)
        } else if has("key") && (has("invalid") || has("must")) {
            Self::InvalidKey(owned)
        } else {
            Self::Unavailable(owned)
        }
    }
}

/// What a host `get` resolved to, before it is read as a stored value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostReply {
    /// `null` / `undefined`: nothing stored.
    Missing,
    /// A string value.
    Text(String),
    /// Any other shape, serialized as JSON text.
    Other(String),
}

impl HostReply {
    /// The stored value for `key`. Only an absent reply is `NotFound`;
    /// odd shapes are passed on as text so the envelope parser rejects them.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::NotFound`] for [`HostReply::Missing`].
    pub fn into_value(self, key: &str) -> Result<String, HostError> {
        match self {
            Self::Missing => Err(HostError::NotFound(key.to_owned())),
            Self::Text(text) | Self::Other(text) => Ok(text),
        }
    }
}

/// Asynchronous key/value storage supplied by the host.
///
/// `shared = false` scopes a key to the current user; `shared = true` makes
/// it visible to every user of the same key.
#[async_trait::async_trait(?Send)]
pub trait KvStore {
    /// Store `value` under `key`. A rejected write leaves the previous value
    /// untouched.
    async fn set(&self, key: &str, value: &str, shared: bool) -> Result<(), HostError>;

    /// Fetch the value under `key`, or `HostError::NotFound`.
    async fn get(&self, key: &str, shared: bool) -> Result<String, HostError>;

    async fn delete(&self, key: &str, shared: bool) -> Result<(), HostError> {
        let _ = (key, shared);
        Err(HostError::Unsupported("delete"))
    }

    async fn list(&self, prefix: &str, shared: bool) -> Result<Vec<String>, HostError> {
        let _ = (prefix, shared);
        Err(HostError::Unsupported("list"))
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
