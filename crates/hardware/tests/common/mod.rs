//! Shared helpers for the integration tests.

/// Builders for configurations, hierarchies and trace text.
pub mod builder;


/// Routes library `tracing` output through the test harness's capture.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("cachesim_core=debug")
        .try_init();
}
