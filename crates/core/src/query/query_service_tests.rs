use std::fs;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use rust_decimal_macros::dec;

use crate::analytics::RiskLevel;
use crate::errors::Error;
use crate::ingest::loader_tests::{fixture_workbook, FakeWorkbook};
use crate::query::{HealthState, PortfolioQueryService, PortfolioQueryTrait};
use crate::source::CsvWorkbook;

#[tokio::test]
async fn queries_share_one_lazy_load() {
    let workbook = Arc::new(fixture_workbook());
    let service = PortfolioQueryService::new(workbook.clone());

    let holdings = service.holdings().await.unwrap();
    assert_eq!(holdings.len(), 2);
    let calls_after_first = workbook.calls.load(Ordering::SeqCst);

    service.allocation().await.unwrap();
    service.summary().await.unwrap();
    assert_eq!(workbook.calls.load(Ordering::SeqCst), calls_after_first);
}

#[tokio::test]
async fn concurrent_first_queries_load_once() {
    let workbook = Arc::new(fixture_workbook());
    let service = Arc::new(PortfolioQueryService::new(workbook.clone()));

    let a = {
        let service = service.clone();
        tokio::spawn(async move { service.holdings().await })
    };
    let b = {
        let service = service.clone();
        tokio::spawn(async move { service.performance().await })
    };
    a.await.unwrap().unwrap();
    b.await.unwrap().unwrap();

    // One load touches each of the six tables exactly once.
    assert_eq!(workbook.calls.load(Ordering::SeqCst), 6);
}

#[tokio::test]
async fn allocation_combines_both_partitions() {
    let service = PortfolioQueryService::new(Arc::new(fixture_workbook()));
    let breakdown = service.allocation().await.unwrap();

    assert_eq!(breakdown.by_sector["Energy"].percentage, dec!(45.9));
    // zero-value bucket filtered from the precomputed market-cap table
    assert_eq!(breakdown.by_market_cap.len(), 1);
    assert_eq!(breakdown.by_market_cap["Large Cap"].value, dec!(292050));
}

#[tokio::test]
async fn performance_returns_timeline_and_returns() {
    let service = PortfolioQueryService::new(Arc::new(fixture_workbook()));
    let data = service.performance().await.unwrap();

    assert_eq!(data.timeline.len(), 2);
    let portfolio = &data.returns["portfolio"];
    assert_eq!(portfolio.month1, dec!(5.0)); // (105000-100000)/100000
}

#[tokio::test]
async fn summary_prefers_precomputed_sheets() {
    let service = PortfolioQueryService::new(Arc::new(fixture_workbook()));
    let summary = service.summary().await.unwrap();

    assert_eq!(summary.total_value, dec!(292050.00));
    assert_eq!(summary.total_gain_loss_percent, dec!(9.18));
    assert_eq!(summary.top_performer.symbol, "INFY");
    assert_eq!(summary.top_performer.gain_percent, Some(dec!(8.98)));
    assert_eq!(summary.highest_value.value, Some(dec!(158025)));
    // two sectors, two holdings: base 4, no penalty
    assert_eq!(summary.diversification_score, dec!(4.0));
    assert_eq!(summary.risk_level, RiskLevel::Aggressive);
}

#[tokio::test]
async fn market_cap_breakdown_keeps_sheet_order_and_zero_rows() {
    let service = PortfolioQueryService::new(Arc::new(fixture_workbook()));
    let slices = service.market_cap_breakdown().await.unwrap();

    assert_eq!(slices.len(), 2);
    assert_eq!(slices[0].market_cap, "Large Cap");
    assert_eq!(slices[0].percentage, dec!(100.0));
    assert_eq!(slices[1].value, dec!(0));
}

#[tokio::test]
async fn health_reports_without_loading() {
    let workbook = Arc::new(fixture_workbook());
    let service = PortfolioQueryService::new(workbook.clone());

    let before = service.health().await;
    assert_eq!(before.status, HealthState::Degraded);
    assert!(!before.data_loaded);
    assert_eq!(workbook.calls.load(Ordering::SeqCst), 0);

    service.ensure_loaded().await.unwrap();
    let after = service.health().await;
    assert_eq!(after.status, HealthState::Healthy);
    assert!(after.data_loaded);
}

#[tokio::test]
async fn failed_load_surfaces_source_error_and_is_not_a_not_found() {
    let service = PortfolioQueryService::new(Arc::new(FakeWorkbook::new(vec![])));

    let err = service.holdings().await.unwrap_err();
    assert!(matches!(err, Error::Source(_)));
    assert!(!err.is_not_found());

    // the store stays empty, so health still reports degraded
    let health = service.health().await;
    assert_eq!(health.status, HealthState::Degraded);
}

#[tokio::test]
async fn end_to_end_over_a_csv_workbook() {
    let dir = tempfile::tempdir().unwrap();
    let write = |name: &str, content: &str| {
        fs::write(dir.path().join(format!("{}.csv", name)), content).unwrap();
    };

    write(
        "Holdings",
        "Symbol,Company Name,Quantity,Avg Price,Current Price,Sector,Market Cap,Value ₹,Gain/Loss ₹,Gain/Loss %\n\
         INFY,Infosys,100,1450,1580.5,Technology,Large Cap,\"₹158,050\",13050,0.09\n\
         HDFC,HDFC Bank,60,1650,1520,Banking,Large Cap,91200,-7800,-0.0788\n",
    );
    write(
        "Historical_Performance",
        "Date,Portfolio Value (₹),Nifty 50,Gold (₹/10g)\n\
         2024-01-31,240000,21500,61000\n\
         2024-02-29,249250,22000,62500\n",
    );
    write("Sector_Allocation", "Sector,Value (₹),Percentage\n");
    write("Market_Cap", "Market Cap,Value (₹),Percentage\n");
    write("Summary", "Metric,Value\n");
    write(
        "Top_Performers",
        "Metric,Symbol,Company Name,Performance\n",
    );

    let service =
        PortfolioQueryService::new(Arc::new(CsvWorkbook::new(dir.path().to_path_buf())));

    // all precomputed sheets empty: everything derives from holdings
    let summary = service.summary().await.unwrap();
    assert_eq!(summary.total_value, dec!(249250.00));
    assert_eq!(summary.total_invested, dec!(244000.00)); // 100*1450 + 60*1650
    assert_eq!(summary.total_gain_loss, dec!(5250.00));
    assert_eq!(summary.top_performer.symbol, "INFY");
    assert_eq!(summary.worst_performer.symbol, "HDFC");

    let breakdown = service.allocation().await.unwrap();
    let sum: rust_decimal::Decimal = breakdown
        .by_sector
        .values()
        .map(|b| b.percentage)
        .sum();
    assert!((sum - dec!(100)).abs() <= dec!(0.1));

    // no precomputed market-cap rows: the dedicated listing is unavailable
    let err = service.market_cap_breakdown().await.unwrap_err();
    assert!(err.is_not_found());
}
