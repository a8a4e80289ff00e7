use super::*;

#[test]
fn init_is_idempotent() {
    let _ = init();
    assert!(!init());
    tracing::info!(bytes = 5, "logging ready");
}
