//! Timeline builder and ledger projector for single and multi-unit projects

mod state;
mod engine;
mod ledger;
mod metrics;
mod timeline;

pub use state::LedgerState;
pub use engine::{ProjectionEngine, ProjectionConfig, default_anchor_date, month_label};
pub use ledger::{LedgerRow, ProjectionResult};
pub use metrics::{DealGrade, GradeBand, Indicator, Ratio, SummaryMetrics, FAIL_BAND, GRADE_BANDS};
pub use timeline::{DrawScheduleEvent, EventSchedule, SaleEvent, SettlementEvent, Timeline};
