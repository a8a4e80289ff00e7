//! Logging bootstrap.
//!
//! Native embedders get a `tracing_subscriber::fmt` subscriber; the browser
//! build routes panics to the console. Safe to call more than once.

/// Install logging for this process or page. Returns `true` when this call
/// installed a subscriber.
pub fn init() -> bool {
    #[cfg(all(feature = "browser", target_arch = "wasm32"))]
    {
        console_error_panic_hook::set_once();
        false
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        tracing_subscriber::fmt().try_init().is_ok()
    }
    #[cfg(all(not(feature = "browser"), target_arch = "wasm32"))]
    {
        false
    }
}

#[cfg(test)]
#[path = "logging_test.rs"]
mod tests;
