//! Timeline builder: draw months, sale months and the dated event schedule

use serde::{Deserialize, Serialize};

use crate::project::{Development, ProjectParameters, StagedBuild, Unit};

/// Draw months and sale month for one build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    pub construction_start: u32,
    pub draw_months: Vec<u32>,
    pub sale_month: u32,
}

impl Timeline {
    /// Lump drawdowns every `duration / draw_count` months from construction start.
    ///
    /// The interval is floor-divided, so the last draw can land before the build
    /// finishes. When there are more draws than months every draw collapses onto
    /// the construction start month.
    pub fn staged(
        months_to_settlement: u32,
        months_to_construction_start: u32,
        construction_duration: u32,
        draw_count: u32,
    ) -> Self {
        let construction_start = months_to_settlement.saturating_add(months_to_construction_start);

        let draw_months = if draw_count >= 1 && construction_duration >= draw_count {
            let interval = construction_duration / draw_count;
            (0..draw_count)
                .map(|i| construction_start.saturating_add(i * interval))
                .collect()
        } else {
            log::warn!(
                "{} draws over {} months; collapsing onto month {}",
                draw_count,
                construction_duration,
                construction_start
            );
            vec![construction_start]
        };

        Self {
            construction_start,
            draw_months,
            sale_month: construction_start
                .saturating_add(construction_duration)
                .saturating_add(1),
        }
    }

    /// One drawdown per month for every month the build is active
    pub fn spread(start_month: u32, duration: u32) -> Self {
        Self {
            construction_start: start_month,
            draw_months: (start_month..start_month.saturating_add(duration)).collect(),
            sale_month: start_month.saturating_add(duration).saturating_add(1),
        }
    }

    pub fn draw_count(&self) -> usize {
        self.draw_months.len()
    }
}

/// Cash and loan charged when the land settles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementEvent {
    pub month: u32,
    /// Land equity plus every soft cost
    pub cash: f64,
    /// Land loan advance
    pub loan: f64,
}

/// One construction drawdown split into equity and loan portions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawScheduleEvent {
    pub month: u32,
    pub equity: f64,
    pub loan: f64,
}

/// Sale proceeds landing for one unit (or one staged build)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleEvent {
    pub month: u32,
    pub label: String,
    pub proceeds: f64,
}

/// Every dated event a projection run applies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSchedule {
    pub settlement: SettlementEvent,
    pub draws: Vec<DrawScheduleEvent>,
    pub sales: Vec<SaleEvent>,
}

impl EventSchedule {
    /// Build the schedule for a validated parameter set
    pub fn from_parameters(params: &ProjectParameters) -> Self {
        let settlement = SettlementEvent {
            month: params.months_to_settlement,
            cash: params.land_cost * (1.0 - params.land_lvr) + params.soft_costs.total(),
            loan: params.land_cost * params.land_lvr,
        };

        let loan_portion = params.construction_loan_portion;
        let mut draws = Vec::new();
        let mut sales = Vec::new();

        match &params.development {
            Development::Staged(build) => {
                let timeline = staged_timeline(params.months_to_settlement, build);
                push_draws(&mut draws, &timeline, build.construction_cost(), loan_portion);
                sales.push(SaleEvent {
                    month: timeline.sale_month,
                    label: format!("{} units", build.unit_count),
                    proceeds: build.total_sale_value(),
                });
            }
            Development::Units(units) => {
                for unit in units {
                    let timeline = unit_timeline(unit);
                    push_draws(&mut draws, &timeline, unit.construction_cost(), loan_portion);
                    sales.push(SaleEvent {
                        month: timeline.sale_month,
                        label: unit.label.clone(),
                        proceeds: unit.sale_price,
                    });
                }
            }
        }

        Self { settlement, draws, sales }
    }

    /// Earliest sale month; total project cost is read from the row before it
    pub fn first_sale_month(&self) -> Option<u32> {
        self.sales.iter().map(|s| s.month).min()
    }

    pub fn last_sale_month(&self) -> Option<u32> {
        self.sales.iter().map(|s| s.month).max()
    }

    /// Latest month carrying any event
    pub fn last_event_month(&self) -> u32 {
        let last_draw = self.draws.iter().map(|d| d.month).max().unwrap_or(0);
        self.last_sale_month()
            .unwrap_or(0)
            .max(last_draw)
            .max(self.settlement.month)
    }

    /// Summed (equity, loan) drawn in a month
    pub fn draws_in(&self, month: u32) -> (f64, f64) {
        self.draws
            .iter()
            .filter(|d| d.month == month)
            .fold((0.0, 0.0), |(equity, loan), d| (equity + d.equity, loan + d.loan))
    }

    /// Summed sale proceeds landing in a month
    pub fn proceeds_in(&self, month: u32) -> f64 {
        self.sales.iter().filter(|s| s.month == month).map(|s| s.proceeds).sum()
    }
}

fn staged_timeline(months_to_settlement: u32, build: &StagedBuild) -> Timeline {
    Timeline::staged(
        months_to_settlement,
        build.months_to_construction_start,
        build.construction_duration,
        build.draw_count,
    )
}

fn unit_timeline(unit: &Unit) -> Timeline {
    Timeline::spread(unit.start_month, unit.duration)
}

/// Divide a build cost evenly across its draw months
fn push_draws(draws: &mut Vec<DrawScheduleEvent>, timeline: &Timeline, cost: f64, loan_portion: f64) {
    let per_draw = cost / timeline.draw_count() as f64;
    draws.extend(timeline.draw_months.iter().map(|&month| DrawScheduleEvent {
        month,
        equity: per_draw * (1.0 - loan_portion),
        loan: per_draw * loan_portion,
    }));
}
