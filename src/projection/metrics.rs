//! Summary metrics and deal grading

use serde::{Serialize, Serializer};
use std::fmt;

use crate::error::FeasibilityError;

/// Denominators smaller than this are treated as zero
const RATIO_EPSILON: f64 = 1e-9;

/// Letter classification of cash-on-cash ROI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DealGrade {
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
    D,
    F,
}

impl DealGrade {
    pub fn as_str(&self) -> &'static str {
        match self {
            DealGrade::APlus => "A+",
            DealGrade::A => "A",
            DealGrade::B => "B",
            DealGrade::C => "C",
            DealGrade::D => "D",
            DealGrade::F => "F",
        }
    }

    /// Grade a cash-on-cash ROI percentage against [`GRADE_BANDS`]
    pub fn from_cash_on_cash(roi_pct: f64) -> Self {
        grade_band(roi_pct).grade
    }

    /// Traffic-light indicator for display
    pub fn indicator(&self) -> Indicator {
        GRADE_BANDS
            .iter()
            .find(|band| band.grade == *self)
            .map(|band| band.indicator)
            .unwrap_or(FAIL_BAND.indicator)
    }
}

impl fmt::Display for DealGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display colour attached to a grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    Green,
    Yellow,
    Orange,
    Red,
    DeepRed,
}

/// Inclusive lower bound of a grade band (upper bound is the next band's lower bound)
#[derive(Debug, Clone, Copy)]
pub struct GradeBand {
    pub lower_bound: f64,
    pub grade: DealGrade,
    pub indicator: Indicator,
}

/// Bands scanned top-down; the first whose lower bound is met wins
pub const GRADE_BANDS: [GradeBand; 5] = [
    GradeBand { lower_bound: 80.0, grade: DealGrade::APlus, indicator: Indicator::Green },
    GradeBand { lower_bound: 60.0, grade: DealGrade::A, indicator: Indicator::Green },
    GradeBand { lower_bound: 40.0, grade: DealGrade::B, indicator: Indicator::Yellow },
    GradeBand { lower_bound: 20.0, grade: DealGrade::C, indicator: Indicator::Orange },
    GradeBand { lower_bound: 0.0, grade: DealGrade::D, indicator: Indicator::Red },
];

/// Anything strictly below zero
pub const FAIL_BAND: GradeBand = GradeBand {
    lower_bound: f64::NEG_INFINITY,
    grade: DealGrade::F,
    indicator: Indicator::DeepRed,
};

fn grade_band(roi_pct: f64) -> GradeBand {
    GRADE_BANDS
        .iter()
        .copied()
        .find(|band| roi_pct >= band.lower_bound)
        .unwrap_or(FAIL_BAND)
}

/// Percentage ratio that is undefined when its denominator is zero
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ratio {
    metric: &'static str,
    value: Option<f64>,
}

impl Ratio {
    /// `100 * numerator / denominator`, or undefined for a zero denominator
    pub fn percent(metric: &'static str, numerator: f64, denominator: f64) -> Self {
        let value = if denominator.abs() < RATIO_EPSILON {
            None
        } else {
            Some(100.0 * numerator / denominator)
        };
        Self { metric, value }
    }

    pub fn metric(&self) -> &'static str {
        self.metric
    }

    pub fn is_defined(&self) -> bool {
        self.value.is_some()
    }

    pub fn value(&self) -> Result<f64, FeasibilityError> {
        self.value.ok_or_else(|| FeasibilityError::undefined(self.metric))
    }

    pub fn as_option(&self) -> Option<f64> {
        self.value
    }
}

impl Serialize for Ratio {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

/// Profitability summary for one run, recomputed every time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryMetrics {
    /// Cash plus loan consumed up to the month before the first sale
    pub total_project_cost: f64,
    pub total_sale_value: f64,
    pub gross_profit: f64,
    pub roi_on_cost: Ratio,
    pub cash_on_cash_roi: Ratio,
    pub profit_margin: Ratio,
    pub peak_cash_invested: f64,
    /// Absent when cash-on-cash ROI is undefined
    pub deal_grade: Option<DealGrade>,
}

impl SummaryMetrics {
    pub fn derive(total_project_cost: f64, total_sale_value: f64, peak_cash_invested: f64) -> Self {
        let gross_profit = total_sale_value - total_project_cost;
        let cash_on_cash_roi = Ratio::percent("cash_on_cash_roi", gross_profit, peak_cash_invested);

        Self {
            total_project_cost,
            total_sale_value,
            gross_profit,
            roi_on_cost: Ratio::percent("roi_on_cost", gross_profit, total_project_cost),
            cash_on_cash_roi,
            profit_margin: Ratio::percent("profit_margin", gross_profit, total_sale_value),
            peak_cash_invested,
            deal_grade: cash_on_cash_roi.as_option().map(DealGrade::from_cash_on_cash),
        }
    }

    /// Grade, or `UndefinedRatio` when cash-on-cash ROI has no value
    pub fn grade(&self) -> Result<DealGrade, FeasibilityError> {
        self.cash_on_cash_roi.value().map(DealGrade::from_cash_on_cash)
    }

    /// Flat name/value mapping for display layers
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let ratio = |r: &Ratio| match r.as_option() {
            Some(v) => format!("{:.1}", v),
            None => "undefined".to_string(),
        };

        vec![
            ("total_sale_value", format!("{:.2}", self.total_sale_value)),
            ("total_project_cost", format!("{:.2}", self.total_project_cost)),
            ("gross_profit", format!("{:.2}", self.gross_profit)),
            ("roi_on_cost_pct", ratio(&self.roi_on_cost)),
            ("cash_on_cash_roi_pct", ratio(&self.cash_on_cash_roi)),
            ("profit_margin_pct", ratio(&self.profit_margin)),
            ("peak_cash_invested", format!("{:.2}", self.peak_cash_invested)),
            (
                "deal_grade",
                self.deal_grade
                    .map(|g| g.to_string())
                    .unwrap_or_else(|| "undefined".to_string()),
            ),
        ]
    }
}
