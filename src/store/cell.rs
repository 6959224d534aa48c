use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::debug;

use super::Store;
use crate::config::Config;
use crate::error::Result;

type Opener = Box<dyn Fn() -> Result<Store> + Send + Sync>;

/// Lazily opened, shared handle to one `Store`.
///
/// Owned by the application root and handed out by reference. Concurrent
/// first calls to [`StoreCell::get`] block on each other, so the store is
/// opened exactly once; a failed open leaves the cell empty for a retry.
pub struct StoreCell {
    cell: OnceCell<Arc<Store>>,
    opener: Opener,
}

impl StoreCell {
    pub fn new(config: Config) -> Self {
        Self::with_opener(move || Store::open(&config))
    }

    pub fn with_opener(opener: impl Fn() -> Result<Store> + Send + Sync + 'static) -> Self {
        Self {
            cell: OnceCell::new(),
            opener: Box::new(opener),
        }
    }

    pub fn get(&self) -> Result<Arc<Store>> {
        self.cell
            .get_or_try_init(|| {
                debug!("opening shared store");
                (self.opener)().map(Arc::new)
            })
            .cloned()
    }

    pub fn is_open(&self) -> bool {
        self.cell.get().is_some()
    }
}
