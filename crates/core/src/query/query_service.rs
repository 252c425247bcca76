//! Query facade over the published snapshot.
//!
//! Every data accessor lazily loads the snapshot when none is published and
//! is otherwise side-effect-free. `health` only inspects the current state;
//! it never triggers a load and never fails.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::debug;

use crate::analytics::{
    allocation_by_market_cap, allocation_by_sector, assemble_summary, performance_returns,
    PortfolioSummary,
};
use crate::errors::{Error, Result};
use crate::ingest::SnapshotLoader;
use crate::snapshot::{LoadedSnapshot, SnapshotStore};
use crate::source::WorkbookSource;

use super::{
    AllocationBreakdown, HealthState, HealthStatus, HoldingView, MarketCapSlice, PerformanceData,
};

/// Read-only portfolio queries.
#[async_trait]
pub trait PortfolioQueryTrait: Send + Sync {
    /// All holdings, in sheet order.
    async fn holdings(&self) -> Result<Vec<HoldingView>>;

    /// Allocation partitions by sector and by market cap.
    async fn allocation(&self) -> Result<AllocationBreakdown>;

    /// Performance timeline plus period returns per series.
    async fn performance(&self) -> Result<PerformanceData>;

    /// Key metrics, highlight records, diversification and risk.
    async fn summary(&self) -> Result<PortfolioSummary>;

    /// Market-cap slices straight from the precomputed table.
    async fn market_cap_breakdown(&self) -> Result<Vec<MarketCapSlice>>;

    /// Readiness report; does not trigger a load.
    async fn health(&self) -> HealthStatus;
}

/// Facade implementation owning the loader and the published snapshot.
pub struct PortfolioQueryService {
    loader: SnapshotLoader,
    store: SnapshotStore,
}

impl PortfolioQueryService {
    pub fn new(source: Arc<dyn WorkbookSource>) -> Self {
        Self {
            loader: SnapshotLoader::new(source),
            store: SnapshotStore::new(),
        }
    }

    /// Loads the snapshot now if none is published. Hosts that prefer eager
    /// loading call this at startup; queries call it implicitly.
    pub async fn ensure_loaded(&self) -> Result<Arc<LoadedSnapshot>> {
        self.store.get_or_load(|| self.loader.load()).await
    }
}

#[async_trait]
impl PortfolioQueryTrait for PortfolioQueryService {
    async fn holdings(&self) -> Result<Vec<HoldingView>> {
        let loaded = self.ensure_loaded().await?;
        if !loaded.snapshot.has_holdings() {
            return Err(Error::data_unavailable("holdings"));
        }
        Ok(loaded.snapshot.holdings.iter().map(HoldingView::from).collect())
    }

    async fn allocation(&self) -> Result<AllocationBreakdown> {
        let loaded = self.ensure_loaded().await?;
        Ok(AllocationBreakdown {
            by_sector: allocation_by_sector(&loaded.snapshot),
            by_market_cap: allocation_by_market_cap(&loaded.snapshot),
        })
    }

    async fn performance(&self) -> Result<PerformanceData> {
        let loaded = self.ensure_loaded().await?;
        if !loaded.snapshot.has_performance() {
            return Err(Error::data_unavailable("performance"));
        }
        Ok(PerformanceData {
            timeline: loaded.snapshot.performance.clone(),
            returns: performance_returns(&loaded.snapshot.performance),
        })
    }

    async fn summary(&self) -> Result<PortfolioSummary> {
        let loaded = self.ensure_loaded().await?;
        if !loaded.snapshot.has_holdings() {
            return Err(Error::data_unavailable("portfolio"));
        }
        Ok(assemble_summary(&loaded.snapshot))
    }

    async fn market_cap_breakdown(&self) -> Result<Vec<MarketCapSlice>> {
        let loaded = self.ensure_loaded().await?;
        if loaded.snapshot.market_cap.is_empty() {
            return Err(Error::data_unavailable("market cap"));
        }
        Ok(loaded
            .snapshot
            .market_cap
            .iter()
            .map(MarketCapSlice::from)
            .collect())
    }

    async fn health(&self) -> HealthStatus {
        let loaded = self.store.current().await;
        let data_loaded = loaded
            .map(|l| l.snapshot.has_holdings() && l.snapshot.has_performance())
            .unwrap_or(false);
        debug!("Health check: data_loaded={}", data_loaded);
        HealthStatus {
            status: if data_loaded {
                HealthState::Healthy
            } else {
                HealthState::Degraded
            },
            data_loaded,
            timestamp: Utc::now(),
        }
    }
}
