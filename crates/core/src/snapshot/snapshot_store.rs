//! Atomically published snapshot state.
//!
//! The store holds at most one published snapshot behind an async RwLock.
//! Loading builds the snapshot fully off to the side while holding the
//! write lock, then publishes it in one step; concurrent lazy loads
//! collapse to a single load, and a failed load leaves the previously
//! published snapshot untouched.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info};
use tokio::sync::RwLock;

use super::PortfolioSnapshot;
use crate::errors::Result;
use crate::ingest::LoadReport;

/// A published snapshot together with its load diagnostics.
#[derive(Debug)]
pub struct LoadedSnapshot {
    pub snapshot: PortfolioSnapshot,
    pub report: LoadReport,
    pub loaded_at: DateTime<Utc>,
}

/// Shared, read-mostly home of the current snapshot.
#[derive(Default)]
pub struct SnapshotStore {
    inner: RwLock<Option<Arc<LoadedSnapshot>>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently published snapshot, if any.
    pub async fn current(&self) -> Option<Arc<LoadedSnapshot>> {
        self.inner.read().await.clone()
    }

    /// Returns the published snapshot, running `load` first if the store is
    /// empty. The write lock is held across the load so concurrent callers
    /// wait for one load instead of racing their own.
    pub async fn get_or_load<F>(&self, load: F) -> Result<Arc<LoadedSnapshot>>
    where
        F: FnOnce() -> Result<(PortfolioSnapshot, LoadReport)>,
    {
        if let Some(current) = self.inner.read().await.clone() {
            return Ok(current);
        }

        let mut guard = self.inner.write().await;
        if let Some(current) = guard.clone() {
            debug!("Snapshot already published by a concurrent load");
            return Ok(current);
        }

        let (snapshot, report) = load()?;
        let loaded = Arc::new(LoadedSnapshot {
            snapshot,
            report,
            loaded_at: Utc::now(),
        });
        info!(
            "Published snapshot: {} holdings, {} performance points, {} rows skipped",
            loaded.snapshot.holdings.len(),
            loaded.snapshot.performance.len(),
            loaded.report.total_skipped()
        );
        *guard = Some(loaded.clone());
        Ok(loaded)
    }
}
