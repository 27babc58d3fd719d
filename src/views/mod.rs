//! Client-side derived state: everything computed locally from already
//! fetched payloads. Merging series for charts, filtering and sorting
//! tables, reducing summaries and assembling CSV exports — plain
//! synchronous transformations, no I/O.

pub mod chart;
pub mod export;
pub mod listing;
pub mod summary;

pub use chart::{chart_series, ChartData, ChartSource, SeriesPoint};
pub use listing::{
    filter_holdings, filter_transactions, sort_holdings, sort_transactions, HoldingSort,
    TransactionSort,
};
