//! Tabular and JSON export of projection output

use csv::Writer;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::projection::{LedgerRow, SummaryMetrics};

/// Column headers, matching [`LedgerRow`] field names
pub const LEDGER_HEADERS: [&str; 7] = [
    "month",
    "month_label",
    "cash_outflow",
    "loan_drawdown",
    "cumulative_cash",
    "cumulative_loan",
    "net_position",
];

/// Write the ledger as CSV, one record per month
pub fn write_ledger_csv<W: Write>(writer: W, rows: &[LedgerRow]) -> Result<(), csv::Error> {
    let mut csv = Writer::from_writer(writer);
    csv.write_record(LEDGER_HEADERS)?;

    for row in rows {
        csv.write_record([
            row.month.to_string(),
            row.month_label.clone(),
            format!("{:.2}", row.cash_outflow),
            format!("{:.2}", row.loan_drawdown),
            format!("{:.2}", row.cumulative_cash),
            format!("{:.2}", row.cumulative_loan),
            format!("{:.2}", row.net_position),
        ])?;
    }

    csv.flush()?;
    Ok(())
}

/// Write the ledger CSV to a file path
pub fn write_ledger_csv_file<P: AsRef<Path>>(path: P, rows: &[LedgerRow]) -> Result<(), csv::Error> {
    let file = std::fs::File::create(path)?;
    write_ledger_csv(file, rows)
}

/// Default ledger file name: `<project name>_cashflow.csv`, or `project_cashflow.csv`
pub fn ledger_file_name(project_name: Option<&str>) -> PathBuf {
    let stem: String = project_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or("project")
        .chars()
        .map(|c| if std::path::is_separator(c) { '_' } else { c })
        .collect();
    PathBuf::from(format!("{}_cashflow.csv", stem))
}

/// Summary as pretty JSON; undefined ratios become `null`
pub fn summary_json(summary: &SummaryMetrics) -> serde_json::Result<String> {
    serde_json::to_string_pretty(summary)
}
