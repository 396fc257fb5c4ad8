//! Per-category monthly totals: the cached data type, the maintainer that
//! keeps it in step with the expense table, and the statistics report.

mod maintainer;
mod monthly_stats;
mod statistics;

pub use maintainer::{adjust_monthly_stats, rebuild_monthly_stats};
pub use monthly_stats::{MonthKey, MonthlyStats};
pub use statistics::get_statistics_endpoint;

#[cfg(test)]
pub use maintainer::compute_monthly_stats;
