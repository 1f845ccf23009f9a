//! Ledger output structures for projections

use serde::{Deserialize, Serialize};

use super::metrics::SummaryMetrics;
use super::timeline::EventSchedule;

/// A single month of the cash and loan ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRow {
    /// 0-based month index from the project epoch
    pub month: u32,
    /// Calendar label such as `Mar-2025`
    pub month_label: String,

    // This month
    pub cash_outflow: f64,
    pub loan_drawdown: f64,

    // Running totals
    pub cumulative_cash: f64,
    pub cumulative_loan: f64,
    pub net_position: f64,
}

/// Complete projection result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionResult {
    pub project_name: String,

    /// Monthly ledger rows, contiguous from month 0
    pub rows: Vec<LedgerRow>,

    /// Events the ledger was built from
    pub schedule: EventSchedule,

    pub summary: SummaryMetrics,
}

impl ProjectionResult {
    pub fn row(&self, month: u32) -> Option<&LedgerRow> {
        self.rows.get(month as usize)
    }

    pub fn final_row(&self) -> Option<&LedgerRow> {
        self.rows.last()
    }

    /// Months the ledger spans
    pub fn total_months(&self) -> usize {
        self.rows.len()
    }

    /// Highest cumulative cash across all rows
    pub fn max_cumulative_cash(&self) -> Option<f64> {
        self.rows
            .iter()
            .map(|r| r.cumulative_cash)
            .fold(None, |acc, v| Some(acc.map_or(v, |a: f64| a.max(v))))
    }
}
