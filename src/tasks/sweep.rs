//! Expiry Sweep Task
//!
//! Background task that periodically purges expired records from the store.
//! Reads only ever skip expired records; this task is what actually removes
//! them.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::Cache;

/// Spawns a background task that periodically purges expired records.
///
/// The task sleeps for the given interval between runs and holds the cache
/// write lock for the duration of each purge. Store failures are logged and
/// the next run tries again.
///
/// # Arguments
/// * `cache` - Arc<RwLock<Cache>> shared reference to the cache
/// * `sweep_interval_secs` - Interval in seconds between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(RwLock::new(Cache::new(store, 86_400.0)?));
/// let sweep_handle = spawn_sweep_task(cache.clone(), 60);
/// // Later, during shutdown:
/// sweep_handle.abort();
/// ```
pub fn spawn_sweep_task(cache: Arc<RwLock<Cache>>, sweep_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(sweep_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting expiry sweep task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let result = {
                let mut cache_guard = cache.write().await;
                cache_guard.purge_expired().await
            };

            match result {
                Ok(0) => debug!("Expiry sweep: no expired records found"),
                Ok(removed) => info!("Expiry sweep: removed {} expired records", removed),
                Err(e) => warn!("Expiry sweep failed: {}", e),
            }
        }
    })
}
