//! Project parameter structures and fail-fast validation

use serde::{Deserialize, Serialize};

use crate::error::FeasibilityError;

/// Latest month any event may fall in (100 years)
pub const MAX_PROJECT_MONTHS: u32 = 1200;

fn default_land_lvr() -> f64 {
    0.7
}

fn default_construction_loan_portion() -> f64 {
    0.7
}

/// Named soft-cost line items, all charged as cash at settlement
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoftCosts {
    pub stamp_duty: f64,
    pub legal_fees: f64,
    pub landscaping: f64,
    pub connections: f64,
    pub permits: f64,
    pub title_fees: f64,
    pub asset_protection_bond: f64,
    pub construction_insurance: f64,
    pub survey: f64,
    pub town_planning: f64,
    pub working_drawings: f64,
    pub consultants: f64,
    /// Lump figure for anything not itemised above
    pub other: f64,
}

impl SoftCosts {
    /// Soft costs given only as a single lump sum
    pub fn lump(amount: f64) -> Self {
        Self {
            other: amount,
            ..Default::default()
        }
    }

    /// Every line item with its name
    pub fn line_items(&self) -> [(&'static str, f64); 13] {
        [
            ("stamp_duty", self.stamp_duty),
            ("legal_fees", self.legal_fees),
            ("landscaping", self.landscaping),
            ("connections", self.connections),
            ("permits", self.permits),
            ("title_fees", self.title_fees),
            ("asset_protection_bond", self.asset_protection_bond),
            ("construction_insurance", self.construction_insurance),
            ("survey", self.survey),
            ("town_planning", self.town_planning),
            ("working_drawings", self.working_drawings),
            ("consultants", self.consultants),
            ("other", self.other),
        ]
    }

    pub fn total(&self) -> f64 {
        self.line_items().iter().map(|(_, amount)| amount).sum()
    }
}

/// One independently built and sold unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub label: String,
    /// Build size in m²
    pub size: f64,
    /// Build cost per m²
    pub rate: f64,
    /// Contingency as a fraction of base build cost
    #[serde(default)]
    pub contingency: f64,
    /// Month construction starts, counted from the project epoch
    pub start_month: u32,
    /// Build duration in months
    pub duration: u32,
    pub sale_price: f64,
}

impl Unit {
    /// Build cost including contingency
    pub fn construction_cost(&self) -> f64 {
        let base = self.size * self.rate;
        base + base * self.contingency
    }

    /// Month the sale proceeds land
    pub fn sale_month(&self) -> u32 {
        self.start_month.saturating_add(self.duration).saturating_add(1)
    }
}

/// Single build covering every unit on the site, funded by lump drawdowns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StagedBuild {
    pub sale_price_per_unit: f64,
    pub unit_count: u32,
    /// Total build size in m²
    pub floor_area: f64,
    pub cost_per_area: f64,
    #[serde(default)]
    pub contingency: f64,
    /// Months between settlement and construction start
    pub months_to_construction_start: u32,
    pub construction_duration: u32,
    pub draw_count: u32,
}

impl StagedBuild {
    /// Build cost including contingency
    pub fn construction_cost(&self) -> f64 {
        let base = self.floor_area * self.cost_per_area;
        base + base * self.contingency
    }

    pub fn total_sale_value(&self) -> f64 {
        self.sale_price_per_unit * self.unit_count as f64
    }
}

/// How the site gets built and sold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Development {
    Staged(StagedBuild),
    Units(Vec<Unit>),
}

/// Immutable input to one projection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectParameters {
    #[serde(default)]
    pub name: Option<String>,

    pub land_cost: f64,

    /// Fraction of the land price financed by the land loan
    #[serde(default = "default_land_lvr")]
    pub land_lvr: f64,

    /// Fraction of each construction draw financed by the construction loan
    #[serde(default = "default_construction_loan_portion")]
    pub construction_loan_portion: f64,

    #[serde(default)]
    pub months_to_settlement: u32,

    #[serde(default)]
    pub soft_costs: SoftCosts,

    pub development: Development,
}

impl ProjectParameters {
    pub fn new(land_cost: f64, development: Development) -> Self {
        Self {
            name: None,
            land_cost,
            land_lvr: default_land_lvr(),
            construction_loan_portion: default_construction_loan_portion(),
            months_to_settlement: 0,
            soft_costs: SoftCosts::default(),
            development,
        }
    }

    /// Display name, falling back to a placeholder
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unnamed Project")
    }

    /// Complement of the construction loan portion
    pub fn construction_equity_portion(&self) -> f64 {
        1.0 - self.construction_loan_portion
    }

    pub fn total_sale_value(&self) -> f64 {
        match &self.development {
            Development::Staged(build) => build.total_sale_value(),
            Development::Units(units) => units.iter().map(|u| u.sale_price).sum(),
        }
    }

    /// Reject anything a projection run cannot meaningfully consume
    pub fn validate(&self) -> Result<(), FeasibilityError> {
        positive("land_cost", self.land_cost)?;
        fraction("land_lvr", self.land_lvr)?;
        fraction("construction_loan_portion", self.construction_loan_portion)?;

        for (name, amount) in self.soft_costs.line_items() {
            non_negative(&format!("soft_costs.{}", name), amount)?;
        }

        within_horizon("months_to_settlement", u64::from(self.months_to_settlement))?;

        match &self.development {
            Development::Staged(build) => validate_staged(self.months_to_settlement, build),
            Development::Units(units) => {
                if units.is_empty() {
                    return Err(FeasibilityError::invalid(
                        "units",
                        "at least one unit is required",
                    ));
                }
                units
                    .iter()
                    .enumerate()
                    .try_for_each(|(i, unit)| validate_unit(i, unit))
            }
        }
    }
}

fn validate_staged(months_to_settlement: u32, build: &StagedBuild) -> Result<(), FeasibilityError> {
    positive("sale_price_per_unit", build.sale_price_per_unit)?;
    at_least_one("unit_count", build.unit_count)?;
    positive("floor_area", build.floor_area)?;
    positive("cost_per_area", build.cost_per_area)?;
    fraction("contingency", build.contingency)?;
    at_least_one("construction_duration", build.construction_duration)?;
    at_least_one("draw_count", build.draw_count)?;

    let sale_month = u64::from(months_to_settlement)
        + u64::from(build.months_to_construction_start)
        + u64::from(build.construction_duration)
        + 1;
    within_horizon("construction_duration", sale_month)
}

fn validate_unit(index: usize, unit: &Unit) -> Result<(), FeasibilityError> {
    let field = |name: &str| format!("units[{}].{}", index, name);
    positive(&field("size"), unit.size)?;
    positive(&field("rate"), unit.rate)?;
    fraction(&field("contingency"), unit.contingency)?;
    at_least_one(&field("duration"), unit.duration)?;
    positive(&field("sale_price"), unit.sale_price)?;

    let sale_month = u64::from(unit.start_month) + u64::from(unit.duration) + 1;
    within_horizon(&field("duration"), sale_month)
}

/// Event months are added as `u32`, so they are capped well short of overflow
fn within_horizon(field: &str, month: u64) -> Result<(), FeasibilityError> {
    if month <= u64::from(MAX_PROJECT_MONTHS) {
        Ok(())
    } else {
        Err(FeasibilityError::invalid(
            field,
            format!("puts an event at month {}, past the {} month limit", month, MAX_PROJECT_MONTHS),
        ))
    }
}

fn positive(field: &str, value: f64) -> Result<(), FeasibilityError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(FeasibilityError::invalid(field, format!("must be greater than 0, got {}", value)))
    }
}

fn non_negative(field: &str, value: f64) -> Result<(), FeasibilityError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(FeasibilityError::invalid(field, format!("must not be negative, got {}", value)))
    }
}

fn fraction(field: &str, value: f64) -> Result<(), FeasibilityError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(FeasibilityError::invalid(field, format!("must lie in [0, 1], got {}", value)))
    }
}

fn at_least_one(field: &str, value: u32) -> Result<(), FeasibilityError> {
    if value >= 1 {
        Ok(())
    } else {
        Err(FeasibilityError::invalid(field, "must be at least 1"))
    }
}
