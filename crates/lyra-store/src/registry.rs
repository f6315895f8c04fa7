//! Process-wide handle cache and the default store.
//!
//! Handles are cached by [`StoreConfig`] equality so that equal
//! configurations share one handle (and therefore one engine
//! connection and one listener registry). The default-configuration
//! handle is additionally pinned behind a single-initialization cell:
//! created lazily on first use, never torn down.

use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use lyra_core::StoreConfig;
use lyra_engine::MemoryEngine;
use tracing::debug;

use crate::error::StoreResult;
use crate::handle::StoreHandle;

static HANDLES: OnceLock<DashMap<StoreConfig, Arc<StoreHandle>>> = OnceLock::new();
static DEFAULT: OnceLock<Arc<StoreHandle>> = OnceLock::new();

fn handles() -> &'static DashMap<StoreConfig, Arc<StoreHandle>> {
    HANDLES.get_or_init(DashMap::new)
}

/// Open (or reuse) the handle for `config`.
///
/// Equal configurations short-circuit to the cached handle; anything
/// else constructs a fresh handle over a fresh engine connection.
/// Entries are never evicted — a stale handle for an abandoned
/// configuration simply stops being used.
pub(crate) fn open(config: StoreConfig) -> StoreResult<Arc<StoreHandle>> {
    config.validate()?;

    let map = handles();
    if let Some(existing) = map.get(&config) {
        return Ok(Arc::clone(&existing));
    }

    debug!(store_id = %config.id, "Creating store handle");
    let engine = Box::new(MemoryEngine::open(&config));
    let handle = Arc::new(StoreHandle::new(config.clone(), engine));

    // Two racing opens both construct; the entry API keeps exactly one.
    let entry = map.entry(config).or_insert(handle);
    Ok(Arc::clone(&entry))
}

/// The lazily-created default-configuration handle.
///
/// # Panics
///
/// Never in practice: the default configuration is valid by
/// construction.
pub(crate) fn default_handle() -> Arc<StoreHandle> {
    let handle = DEFAULT.get_or_init(|| {
        open(StoreConfig::default()).expect("default store configuration is valid")
    });
    Arc::clone(handle)
}
