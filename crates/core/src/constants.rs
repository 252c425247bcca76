/// Logical table names expected in the workbook.
pub const HOLDINGS_TABLE: &str = "Holdings";
pub const PERFORMANCE_TABLE: &str = "Historical_Performance";
pub const SECTOR_ALLOCATION_TABLE: &str = "Sector_Allocation";
pub const MARKET_CAP_TABLE: &str = "Market_Cap";
pub const SUMMARY_TABLE: &str = "Summary";
pub const TOP_PERFORMERS_TABLE: &str = "Top_Performers";

/// Metric keys of the precomputed Summary table.
pub const TOTAL_VALUE_METRIC: &str = "Total Portfolio Value";
pub const TOTAL_INVESTED_METRIC: &str = "Total Invested Amount";
pub const TOTAL_GAIN_LOSS_METRIC: &str = "Total Gain/Loss";
pub const TOTAL_GAIN_LOSS_PCT_METRIC: &str = "Total Gain/Loss %";

/// Role keys of the precomputed Top_Performers table.
pub const BEST_PERFORMER_ROLE: &str = "Best Performer";
pub const WORST_PERFORMER_ROLE: &str = "Worst Performer";
pub const HIGHEST_VALUE_ROLE: &str = "Highest Value";
pub const LOWEST_VALUE_ROLE: &str = "Lowest Value";

/// Sectors treated as high volatility when classifying portfolio risk.
pub const HIGH_RISK_SECTORS: [&str; 2] = ["Technology", "Small Cap Stocks"];

/// Decimal places for monetary display values
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Decimal places for percentage display values
pub const PERCENT_DECIMAL_PRECISION: u32 = 1;
