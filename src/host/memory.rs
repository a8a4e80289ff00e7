//! In-process key/value host.
//!
//! DESIGN
//! ======
//! Mirrors the limits of the browser host storage API so the Remote path can
//! be exercised without a browser:
//! - keys: 1..=200 chars, no whitespace, slashes or quotes
//! - values: at most 5 MiB
//! - optional request budget over a sliding window (hourly by default)
//!
//! Personal and shared keys live in separate namespaces. Every check runs
//! before any mutation, so a rejected `set` never disturbs the stored value.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use super::{HostError, KvStore};

pub const MAX_KEY_CHARS: usize = 200;
pub const MAX_VALUE_BYTES: usize = 5 * 1024 * 1024;
const DEFAULT_REQUEST_WINDOW_SECS: u64 = 3600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryKvLimits {
    pub max_key_chars: usize,
    pub max_value_bytes: usize,
    /// Requests allowed per `request_window`; `None` disables the budget.
    pub requests_per_window: Option<usize>,
    pub request_window: Duration,
}

impl Default for MemoryKvLimits {
    fn default() -> Self {
        Self {
            max_key_chars: MAX_KEY_CHARS,
            max_value_bytes: MAX_VALUE_BYTES,
            requests_per_window: None,
            request_window: Duration::from_secs(DEFAULT_REQUEST_WINDOW_SECS),
        }
    }
}

#[derive(Default)]
struct MemoryKvInner {
    personal: BTreeMap<String, String>,
    shared: BTreeMap<String, String>,
    requests: VecDeque<Instant>,
    /// Faults returned by the next requests, oldest first.
    pending_faults: VecDeque<HostError>,
}

impl MemoryKvInner {
    fn namespace(&mut self, shared: bool) -> &mut BTreeMap<String, String> {
        if shared { &mut self.shared } else { &mut self.personal }
    }
}

#[derive(Default)]
pub struct MemoryKv {
    inner: Mutex<MemoryKvInner>,
    limits: MemoryKvLimits,
}

impl MemoryKv {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_limits(limits: MemoryKvLimits) -> Self {
        Self { inner: Mutex::new(MemoryKvInner::default()), limits }
    }

    #[must_use]
    pub fn limits(&self) -> MemoryKvLimits {
        self.limits
    }

    /// Make the next request fail with `err` before touching any data.
    pub fn fail_next(&self, err: HostError) {
        self.lock().pending_faults.push_back(err);
    }

    /// Raw stored value, bypassing limits and faults.
    #[must_use]
    pub fn peek(&self, key: &str, shared: bool) -> Option<String> {
        self.lock().namespace(shared).get(key).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        let inner = self.lock();
        inner.personal.len() + inner.shared.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryKvInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fault injection, then request budget, then key rules.
    fn admit_at(&self, inner: &mut MemoryKvInner, key: &str, now: Instant) -> Result<(), HostError> {
        if let Some(fault) = inner.pending_faults.pop_front() {
            return Err(fault);
        }
        if let Some(limit) = self.limits.requests_per_window {
            prune_window(&mut inner.requests, now, self.limits.request_window);
            if inner.requests.len() >= limit {
                return Err(HostError::RateLimited(format!(
                    "rate limit exceeded (max {limit} requests/{}s)",
                    self.limits.request_window.as_secs()
                )));
            }
            inner.requests.push_back(now);
        }
        check_key(key, self.limits.max_key_chars)
    }

    fn set_at(&self, key: &str, value: &str, shared: bool, now: Instant) -> Result<(), HostError> {
        let mut inner = self.lock();
        self.admit_at(&mut inner, key, now)?;
        if value.len() > self.limits.max_value_bytes {
            return Err(HostError::Quota(format!(
                "value is {} bytes; limit is {} bytes",
                value.len(),
                self.limits.max_value_bytes
            )));
        }
        inner.namespace(shared).insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn get_at(&self, key: &str, shared: bool, now: Instant) -> Result<String, HostError> {
        let mut inner = self.lock();
        self.admit_at(&mut inner, key, now)?;
        inner
            .namespace(shared)
            .get(key)
            .cloned()
            .ok_or_else(|| HostError::NotFound(key.to_owned()))
    }
}

#[async_trait::async_trait(?Send)]
impl KvStore for MemoryKv {
    async fn set(&self, key: &str, value: &str, shared: bool) -> Result<(), HostError> {
        self.set_at(key, value, shared, Instant::now())
    }

    async fn get(&self, key: &str, shared: bool) -> Result<String, HostError> {
        self.get_at(key, shared, Instant::now())
    }

    async fn delete(&self, key: &str, shared: bool) -> Result<(), HostError> {
        let mut inner = self.lock();
        self.admit_at(&mut inner, key, Instant::now())?;
        inner
            .namespace(shared)
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| HostError::NotFound(key.to_owned()))
    }

    async fn list(&self, prefix: &str, shared: bool) -> Result<Vec<String>, HostError> {
        let mut inner = self.lock();
        if let Some(fault) = inner.pending_faults.pop_front() {
            return Err(fault);
        }
        Ok(inner
            .namespace(shared)
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}

fn check_key(key: &str, max_chars: usize) -> Result<(), HostError> {
    if key.is_empty() {
        return Err(HostError::InvalidKey("key cannot be empty".into()));
    }
    let chars = key.chars().count();
    if chars > max_chars {
        return Err(HostError::InvalidKey(format!("key is {chars} chars; limit is {max_chars}")));
    }
    if let Some(bad) = key.chars().find(|c| c.is_whitespace() || matches!(c, '/' | '\\' | '\'' | '"')) {
        return Err(HostError::InvalidKey(format!("key contains forbidden character {bad:?}")));
    }
    Ok(())
}

fn prune_window(deque: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(&front) = deque.front() {
        if now.duration_since(front) > window {
            deque.pop_front();
        } else {
            break;
        }
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;
