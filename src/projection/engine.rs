//! Ledger projector: walks the month range and applies scheduled events

use chrono::{Months, NaiveDate};
use log::{debug, info};

use super::ledger::{LedgerRow, ProjectionResult};
use super::metrics::SummaryMetrics;
use super::state::LedgerState;
use super::timeline::EventSchedule;
use crate::error::FeasibilityError;
use crate::project::{ProjectParameters, MAX_PROJECT_MONTHS};

/// Calendar date of month 0 when none is given
pub fn default_anchor_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 1).unwrap_or_default()
}

/// Configuration for a projection run
#[derive(Debug, Clone)]
pub struct ProjectionConfig {
    /// Calendar date of month 0, used only for month labels
    pub anchor_date: NaiveDate,

    /// Rows kept after the last event so post-sale balances can be read back.
    /// Must be at least 1; a run with 0 is rejected.
    pub post_sale_months: u32,
}

impl ProjectionConfig {
    pub fn validate(&self) -> Result<(), FeasibilityError> {
        if self.post_sale_months < 1 || self.post_sale_months > MAX_PROJECT_MONTHS {
            return Err(FeasibilityError::invalid(
                "post_sale_months",
                format!("must lie in [1, {}], got {}", MAX_PROJECT_MONTHS, self.post_sale_months),
            ));
        }
        Ok(())
    }
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            anchor_date: default_anchor_date(),
            post_sale_months: 1,
        }
    }
}

/// Main projection engine
#[derive(Debug, Clone, Default)]
pub struct ProjectionEngine {
    config: ProjectionConfig,
}

impl ProjectionEngine {
    /// Create a new projection engine with given config
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Run projection for a single project
    pub fn project(&self, params: &ProjectParameters) -> Result<ProjectionResult, FeasibilityError> {
        params.validate()?;
        self.config.validate()?;

        let schedule = EventSchedule::from_parameters(params);
        let horizon = schedule.last_event_month() + self.config.post_sale_months;

        // Labels are monotonic in the month, so the last one bounds them all
        month_label(self.config.anchor_date, horizon)?;

        let mut state = LedgerState::new();
        let mut rows = Vec::with_capacity(horizon as usize + 1);
        for month in 0..=horizon {
            let row = self.calculate_month(&schedule, &mut state, month)?;
            rows.push(row);
        }

        let total_project_cost = cost_before_first_sale(&schedule, &rows);
        let summary = SummaryMetrics::derive(
            total_project_cost,
            params.total_sale_value(),
            state.peak_cash,
        );

        info!(
            "Projected {}: {} months, cost {:.2}, profit {:.2}, grade {}",
            params.display_name(),
            rows.len(),
            summary.total_project_cost,
            summary.gross_profit,
            summary
                .deal_grade
                .map(|g| g.to_string())
                .unwrap_or_else(|| "undefined".to_string()),
        );

        Ok(ProjectionResult {
            project_name: params.display_name().to_string(),
            rows,
            schedule,
            summary,
        })
    }

    /// Apply settlement, drawdowns and sales for one month, in that order
    fn calculate_month(
        &self,
        schedule: &EventSchedule,
        state: &mut LedgerState,
        month: u32,
    ) -> Result<LedgerRow, FeasibilityError> {
        let mut cash_outflow = 0.0;
        let mut loan_drawdown = 0.0;

        if month == schedule.settlement.month {
            cash_outflow += schedule.settlement.cash;
            loan_drawdown += schedule.settlement.loan;
            debug!(
                "Month {}: settlement cash {:.2}, loan {:.2}",
                month, schedule.settlement.cash, schedule.settlement.loan
            );
        }

        let (equity, loan) = schedule.draws_in(month);
        if equity != 0.0 || loan != 0.0 {
            cash_outflow += equity;
            loan_drawdown += loan;
            debug!("Month {}: drawdown equity {:.2}, loan {:.2}", month, equity, loan);
        }

        let proceeds = schedule.proceeds_in(month);
        if proceeds != 0.0 {
            cash_outflow -= proceeds;
            debug!("Month {}: sale proceeds {:.2}", month, proceeds);
        }

        state.record(month, cash_outflow, loan_drawdown);

        Ok(LedgerRow {
            month,
            month_label: month_label(self.config.anchor_date, month)?,
            cash_outflow,
            loan_drawdown,
            cumulative_cash: state.cumulative_cash,
            cumulative_loan: state.cumulative_loan,
            net_position: state.net_position(),
        })
    }
}

/// `%b-%Y` label for `month` months after the anchor
pub fn month_label(anchor: NaiveDate, month: u32) -> Result<String, FeasibilityError> {
    anchor
        .checked_add_months(Months::new(month))
        .map(|date| date.format("%b-%Y").to_string())
        .ok_or_else(|| FeasibilityError::invalid("anchor_date", "month label out of calendar range"))
}

/// Cash plus loan at the row immediately preceding the earliest sale
fn cost_before_first_sale(schedule: &EventSchedule, rows: &[LedgerRow]) -> f64 {
    schedule
        .first_sale_month()
        .and_then(|month| month.checked_sub(1))
        .and_then(|month| rows.get(month as usize))
        .map(|row| row.cumulative_cash + row.cumulative_loan)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{Development, SoftCosts, StagedBuild, Unit};
    use crate::projection::DealGrade;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn scenario() -> ProjectParameters {
        let mut params = ProjectParameters::new(
            500_000.0,
            Development::Staged(StagedBuild {
                sale_price_per_unit: 750_000.0,
                unit_count: 2,
                floor_area: 200.0,
                cost_per_area: 2_000.0,
                contingency: 0.0,
                months_to_construction_start: 3,
                construction_duration: 9,
                draw_count: 5,
            }),
        );
        params.land_lvr = 0.7;
        params.construction_loan_portion = 0.7;
        params.months_to_settlement = 3;
        params
    }

    fn unit(label: &str, start: u32, duration: u32, sale: f64) -> Unit {
        Unit {
            label: label.to_string(),
            size: 120.0,
            rate: 2_000.0,
            contingency: 0.1,
            start_month: start,
            duration,
            sale_price: sale,
        }
    }

    fn project(params: &ProjectParameters) -> ProjectionResult {
        ProjectionEngine::default().project(params).unwrap()
    }

    #[test]
    fn test_worked_scenario() {
        let result = project(&scenario());

        assert_eq!(result.total_months(), 18);
        let settlement = result.row(3).unwrap();
        assert_abs_diff_eq!(settlement.cash_outflow, 150_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(settlement.loan_drawdown, 350_000.0, epsilon = 1e-6);

        for month in 6..=10 {
            let row = result.row(month).unwrap();
            assert_abs_diff_eq!(row.cash_outflow, 24_000.0, epsilon = 1e-6);
            assert_abs_diff_eq!(row.loan_drawdown, 56_000.0, epsilon = 1e-6);
        }
        assert_abs_diff_eq!(result.row(11).unwrap().cash_outflow, 0.0);

        let sale = result.row(16).unwrap();
        assert_abs_diff_eq!(sale.cash_outflow, -1_500_000.0, epsilon = 1e-6);

        let summary = &result.summary;
        assert_abs_diff_eq!(summary.total_project_cost, 900_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(summary.gross_profit, 600_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(summary.roi_on_cost.value().unwrap(), 66.667, epsilon = 1e-3);
        assert_abs_diff_eq!(summary.peak_cash_invested, 270_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(summary.cash_on_cash_roi.value().unwrap(), 222.222, epsilon = 1e-3);
        assert_abs_diff_eq!(summary.profit_margin.value().unwrap(), 40.0, epsilon = 1e-9);
        assert_eq!(summary.deal_grade, Some(DealGrade::APlus));
    }

    #[test]
    fn test_months_are_contiguous_and_labelled() {
        let result = project(&scenario());
        for (i, row) in result.rows.iter().enumerate() {
            assert_eq!(row.month as usize, i);
        }
        assert_eq!(result.rows[0].month_label, "Mar-2025");
        assert_eq!(result.rows[10].month_label, "Jan-2026");
        assert_eq!(result.final_row().unwrap().month, 17);
    }

    #[test]
    fn test_cumulative_fields_are_prefix_sums() {
        let mut params = scenario();
        params.soft_costs = SoftCosts {
            legal_fees: 2_000.0,
            consultants: 8_000.0,
            ..Default::default()
        };
        let result = project(&params);

        let mut cash = 0.0;
        let mut loan = 0.0;
        for row in &result.rows {
            cash += row.cash_outflow;
            loan += row.loan_drawdown;
            assert_relative_eq!(row.cumulative_cash, cash, epsilon = 1e-6);
            assert_relative_eq!(row.cumulative_loan, loan, epsilon = 1e-6);
            assert_relative_eq!(row.net_position, cash - loan, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_peak_is_max_cumulative_cash() {
        let result = project(&scenario());
        assert_relative_eq!(
            result.summary.peak_cash_invested,
            result.max_cumulative_cash().unwrap()
        );
        // The sale drives cumulative cash negative but never lowers the peak
        assert!(result.final_row().unwrap().cumulative_cash < 0.0);
    }

    #[test]
    fn test_projection_is_idempotent() {
        let params = scenario();
        let first = project(&params);
        let second = project(&params);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_degenerate_draws_collapse_onto_start() {
        let mut params = scenario();
        if let Development::Staged(build) = &mut params.development {
            build.construction_duration = 3;
            build.draw_count = 6;
        }
        let result = project(&params);

        let start = 3 + 3;
        let row = result.row(start).unwrap();
        assert_abs_diff_eq!(row.cash_outflow, 120_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(row.loan_drawdown, 280_000.0, epsilon = 1e-6);
        for month in [start + 1, start + 2, start + 3] {
            assert_abs_diff_eq!(result.row(month).unwrap().loan_drawdown, 0.0);
        }
        assert_eq!(result.total_months(), (start + 3 + 1 + 2) as usize);
    }

    #[test]
    fn test_invalid_land_cost_produces_no_ledger() {
        let mut params = scenario();
        params.land_cost = 0.0;
        let err = ProjectionEngine::default().project(&params).unwrap_err();
        assert!(matches!(err, FeasibilityError::InvalidParameter { ref field, .. } if field == "land_cost"));

        params.land_cost = -250_000.0;
        assert!(ProjectionEngine::default().project(&params).is_err());
    }

    #[test]
    fn test_multi_unit_cost_cut_before_first_sale() {
        let mut params = ProjectParameters::new(
            1_350_000.0,
            Development::Units(vec![unit("Unit 1", 3, 9, 850_000.0), unit("Unit 2", 6, 9, 900_000.0)]),
        );
        params.soft_costs = SoftCosts::lump(80_000.0);
        let result = project(&params);

        // Unit 1 sells at 13, unit 2 at 16
        assert_eq!(result.schedule.first_sale_month(), Some(13));
        assert_eq!(result.total_months(), 18);

        let before_sale = result.row(12).unwrap();
        assert_relative_eq!(
            result.summary.total_project_cost,
            before_sale.cumulative_cash + before_sale.cumulative_loan
        );

        // Month 13 carries unit 2's draw and unit 1's sale: 264,000 / 9 per month
        let overlap = result.row(13).unwrap();
        let per_month = 264_000.0 / 9.0;
        assert_abs_diff_eq!(overlap.cash_outflow, per_month * 0.3 - 850_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(overlap.loan_drawdown, per_month * 0.7, epsilon = 1e-6);

        // Unit 2 is still drawing after the first sale, so the final row differs
        let last = result.final_row().unwrap();
        assert!((last.cumulative_cash + last.cumulative_loan - result.summary.total_project_cost).abs() > 1.0);

        assert_relative_eq!(result.summary.total_sale_value, 1_750_000.0);
        assert_relative_eq!(
            result.summary.gross_profit,
            1_750_000.0 - result.summary.total_project_cost
        );
    }

    #[test]
    fn test_unit_draws_spread_over_duration() {
        let params = ProjectParameters::new(
            400_000.0,
            Development::Units(vec![unit("Only", 2, 4, 700_000.0)]),
        );
        let result = project(&params);

        // 120 m² × 2000 × 1.1 = 264,000 over 4 months
        for month in 2..6 {
            let row = result.row(month).unwrap();
            assert_abs_diff_eq!(row.cash_outflow + row.loan_drawdown, 66_000.0, epsilon = 1e-6);
            assert_abs_diff_eq!(row.loan_drawdown, 46_200.0, epsilon = 1e-6);
        }
        assert_eq!(result.total_months(), 2 + 4 + 1 + 2);
    }

    #[test]
    fn test_zero_cash_peak_reports_undefined_ratio() {
        let mut params = scenario();
        params.land_lvr = 1.0;
        params.construction_loan_portion = 1.0;
        let result = project(&params);

        assert_abs_diff_eq!(result.summary.peak_cash_invested, 0.0);
        assert!(matches!(
            result.summary.cash_on_cash_roi.value(),
            Err(FeasibilityError::UndefinedRatio { metric: "cash_on_cash_roi" })
        ));
        assert!(result.summary.roi_on_cost.is_defined());
        assert_eq!(result.rows.len(), 18);
    }

    #[test]
    fn test_anchor_date_drives_labels() {
        let config = ProjectionConfig {
            anchor_date: NaiveDate::from_ymd_opt(2024, 11, 15).unwrap(),
            ..Default::default()
        };
        let result = ProjectionEngine::new(config).project(&scenario()).unwrap();
        assert_eq!(result.rows[0].month_label, "Nov-2024");
        assert_eq!(result.rows[2].month_label, "Jan-2025");
    }

    #[test]
    fn test_settlement_and_first_draw_share_a_month() {
        let mut params = scenario();
        if let Development::Staged(build) = &mut params.development {
            build.months_to_construction_start = 0;
        }
        let result = project(&params);

        let row = result.row(3).unwrap();
        assert_abs_diff_eq!(row.cash_outflow, 150_000.0 + 24_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(row.loan_drawdown, 350_000.0 + 56_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(row.cumulative_cash, 174_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(row.net_position, 174_000.0 - 406_000.0, epsilon = 1e-6);

        // Sale at 3 + 0 + 9 + 1 = 13; cost is read at month 12
        assert_eq!(result.total_months(), 15);
        assert_abs_diff_eq!(result.summary.total_project_cost, 900_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_post_sale_months_below_one_is_rejected() {
        let config = ProjectionConfig {
            post_sale_months: 0,
            ..Default::default()
        };
        let err = ProjectionEngine::new(config).project(&scenario()).unwrap_err();
        assert!(matches!(err, FeasibilityError::InvalidParameter { ref field, .. } if field == "post_sale_months"));

        let config = ProjectionConfig {
            post_sale_months: 3,
            ..Default::default()
        };
        let result = ProjectionEngine::new(config).project(&scenario()).unwrap();
        assert_eq!(result.total_months(), 16 + 3 + 1);
    }

    #[test]
    fn test_out_of_range_anchor_fails_before_projection() {
        let config = ProjectionConfig {
            anchor_date: NaiveDate::from_ymd_opt(262_142, 12, 1).unwrap(),
            ..Default::default()
        };
        let err = ProjectionEngine::new(config).project(&scenario()).unwrap_err();
        assert!(matches!(err, FeasibilityError::InvalidParameter { ref field, .. } if field == "anchor_date"));
    }

    #[test]
    fn test_far_future_offsets_are_rejected_not_panicking() {
        let mut params = scenario();
        params.months_to_settlement = u32::MAX - 5;
        assert!(matches!(
            ProjectionEngine::default().project(&params),
            Err(FeasibilityError::InvalidParameter { .. })
        ));

        let mut late = unit("Late", 0, 1, 500_000.0);
        late.start_month = u32::MAX;
        let params = ProjectParameters::new(400_000.0, Development::Units(vec![late]));
        assert!(matches!(
            ProjectionEngine::default().project(&params),
            Err(FeasibilityError::InvalidParameter { .. })
        ));
    }
}
