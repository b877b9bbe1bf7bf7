use rollcall_core::config::Config;
use rollcall_core::store::TabularStore;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

pub type SharedStore = Arc<dyn TabularStore + Send + Sync>;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: SharedStore,
    cell_locks: Arc<Mutex<HashMap<(u32, u32), Arc<Mutex<()>>>>>,
}

impl AppState {
    pub fn new(config: Config, store: SharedStore) -> Self {
        Self {
            config: Arc::new(config),
            store,
            cell_locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Lock serializing marks against one grid cell. Two submissions racing
    /// for the same (student, date) cell execute one after the other;
    /// disjoint cells proceed concurrently. In-process only: the store
    /// remains open to external writers.
    ///
    /// Entries nobody else holds are evicted on each call, so the map stays
    /// bounded by the number of in-flight marks rather than every cell ever
    /// marked over the process lifetime.
    pub async fn cell_lock(&self, row: u32, col: u32) -> Arc<Mutex<()>> {
        let mut locks = self.cell_locks.lock().await;
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        locks
            .entry((row, col))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    #[cfg(test)]
    async fn lock_map_len(&self) -> usize {
        self.cell_locks.lock().await.len()
    }
}
