//! Shared fixtures for the `stylewatch` integration tests.

pub mod builders;
pub mod fake_backend;

use std::future::Future;
use std::time::Duration;

use tracing_subscriber::{fmt, EnvFilter};

const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Capture logs through the test writer; shown only for failing tests.
///
/// `STYLEWATCH_LOG=debug cargo test` raises the level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("STYLEWATCH_LOG")
        .unwrap_or_else(|_| EnvFilter::new("stylewatch=info"));

    // Several tests in one binary race to install it; the first one wins.
    let _ = fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Fail the test if `f` takes longer than five seconds.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(TEST_TIMEOUT, f).await {
        Ok(value) => value,
        Err(_) => panic!("test timed out after {TEST_TIMEOUT:?}"),
    }
}

/// Poll `check` every 10ms until it returns true, within the test timeout.
pub async fn wait_until(mut check: impl FnMut() -> bool) {
    with_timeout(async {
        while !check() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
}
