//! Property Feasibility - monthly cashflow projection for small property developments
//!
//! This library provides:
//! - Timeline building (settlement, construction drawdowns, sale months)
//! - Month-by-month cash and loan ledger projection
//! - Summary metrics (project cost, ROI on cost, cash-on-cash ROI, deal grade)
//! - CSV/JSON export of the ledger and summary
//! - Parallel comparison of several deals

pub mod error;
pub mod export;
pub mod project;
pub mod projection;
pub mod scenario;

// Re-export commonly used types
pub use error::{FeasibilityError, LoadError};
pub use project::{Development, ProjectParameters, SoftCosts, StagedBuild, Unit};
pub use projection::{LedgerRow, ProjectionConfig, ProjectionEngine, ProjectionResult, SummaryMetrics};
pub use scenario::ScenarioRunner;
