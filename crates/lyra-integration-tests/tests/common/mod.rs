//! Shared test harness for integration tests.

use std::sync::Arc;

use lyra_core::StoreConfig;
use lyra_engine::MemoryEngine;
use lyra_store::StoreHandle;
use tracing_subscriber::EnvFilter;

/// Install a compact subscriber so failing tests carry the store's
/// tracing output. Only the first caller wins; later calls are no-ops.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A store handle over a private in-memory engine, isolated from the
/// process-wide handle cache. Each call returns an independent store.
pub fn isolated_handle(id: &str) -> Arc<StoreHandle> {
    init_tracing();
    let config = StoreConfig::new(id);
    let engine = Box::new(MemoryEngine::open(&config));
    StoreHandle::with_engine(config, engine).expect("valid test config")
}
