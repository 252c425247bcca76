//! Derived portfolio metrics, computed as pure reads over a snapshot.

mod allocation;
mod performance;
mod risk;
mod summary;

pub use allocation::{allocation_by_market_cap, allocation_by_sector, AllocationBucket, AllocationMap};
pub use performance::{performance_returns, PeriodReturns, ReturnsBySeries};
pub use risk::{diversification_score, risk_level, RiskLevel};
pub use summary::{assemble_summary, PerformerHighlight, PortfolioSummary};

/// Resolves the precomputed-sheet-or-derive split shared by the aggregate
/// computations: use the precomputed table when it holds usable rows,
/// otherwise derive from holdings.
pub(crate) fn precomputed_or_derive<T>(precomputed: Option<T>, derive: impl FnOnce() -> T) -> T {
    match precomputed {
        Some(value) => value,
        None => derive(),
    }
}
