//! Illustrative wealth projection for the goal designer.
//!
//! Each year compounds the balance, adds savings, then subtracts one installment of every
//! active goal while the year sits inside the spending window. The reported balance is floored
//! at zero for charting; the success flag is driven by the unfloored balance.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::data::goals::{Goal, PriorityTier};

/// Longest projection accepted from configuration.
pub const MAX_HORIZON_YEARS: u32 = 200;

/// Fixed inputs to the projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanAssumptions {
    pub start_year: i32,
    pub starting_assets: f64,
    pub annual_savings: f64,
    pub annual_return: f64,
    /// Last year offset simulated; offsets run 0..=horizon_years.
    pub horizon_years: u32,
    /// First year offset (inclusive) in which goal costs are drawn.
    pub spend_window_start: u32,
    /// Last year offset (inclusive) in which goal costs are drawn.
    pub spend_window_end: u32,
    /// Each window year draws `cost / spend_installments` per active goal.
    pub spend_installments: u32,
}

impl Default for PlanAssumptions {
    fn default() -> Self {
        Self {
            start_year: 2025,
            starting_assets: 500_000.0,
            annual_savings: 25_000.0,
            annual_return: 0.06,
            horizon_years: 30,
            spend_window_start: 6,
            spend_window_end: 24,
            spend_installments: 20,
        }
    }
}

impl PlanAssumptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let amounts = [
            ("planning.starting_assets", self.starting_assets),
            ("planning.annual_savings", self.annual_savings),
            ("planning.annual_return", self.annual_return),
        ];
        for (field, value) in amounts {
            if !value.is_finite() {
                return Err(ConfigError::Invalid {
                    field,
                    message: format!("must be a finite number, got {value}"),
                });
            }
        }
        if self.annual_return <= -1.0 {
            return Err(ConfigError::Invalid {
                field: "planning.annual_return",
                message: "must be greater than -1".to_string(),
            });
        }
        if self.horizon_years > MAX_HORIZON_YEARS {
            return Err(ConfigError::Invalid {
                field: "planning.horizon_years",
                message: format!("must be at most {MAX_HORIZON_YEARS}"),
            });
        }
        if self.last_year().is_none() {
            return Err(ConfigError::Invalid {
                field: "planning.start_year",
                message: format!(
                    "start_year + horizon_years overflows ({} + {})",
                    self.start_year, self.horizon_years
                ),
            });
        }
        Ok(())
    }

    fn last_year(&self) -> Option<i32> {
        i32::try_from(self.horizon_years)
            .ok()
            .and_then(|h| self.start_year.checked_add(h))
    }

    fn in_spend_window(&self, offset: u32) -> bool {
        (self.spend_window_start..=self.spend_window_end).contains(&offset)
    }

    /// Balance after `horizon_years + 1` years of growth and savings with nothing spent.
    pub fn compound_only_final(&self) -> f64 {
        let mut assets = self.starting_assets;
        for _ in 0..=self.horizon_years {
            assets = assets * (1.0 + self.annual_return) + self.annual_savings;
        }
        assets
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearProjection {
    pub year: i32,
    /// Balance floored at zero.
    pub assets: f64,
    pub spend: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Allocation {
    pub needs: f64,
    pub wants: f64,
    pub dreams: f64,
}

impl Allocation {
    pub fn from_goals<'a>(goals: impl IntoIterator<Item = &'a Goal>) -> Self {
        let mut allocation = Self::default();
        for goal in goals {
            match goal.tier() {
                PriorityTier::Needs => allocation.needs += goal.cost,
                PriorityTier::Wants => allocation.wants += goal.cost,
                PriorityTier::Dreams => allocation.dreams += goal.cost,
            }
        }
        allocation
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationOutcome {
    pub years: Vec<YearProjection>,
    /// False iff the unfloored balance went below zero in any year.
    pub success: bool,
    /// First calendar year with a negative balance.
    pub shortfall_year: Option<i32>,
    pub final_wealth: f64,
    pub total_goal_cost: f64,
    pub allocation: Allocation,
}

impl SimulationOutcome {
    pub fn status_label(&self) -> &'static str {
        if self.success {
            "On Track"
        } else {
            "At Risk"
        }
    }
}

/// Run the projection over whichever of `goals` are active.
pub fn simulate_goals(goals: &[Goal], assumptions: &PlanAssumptions) -> SimulationOutcome {
    let active: Vec<&Goal> = goals.iter().filter(|g| g.active).collect();
    let installments = f64::from(assumptions.spend_installments.max(1));
    let per_year_spend: f64 = active.iter().map(|g| g.cost / installments).sum();

    let mut assets = assumptions.starting_assets;
    let capacity = assumptions.horizon_years.min(MAX_HORIZON_YEARS) as usize + 1;
    let mut years = Vec::with_capacity(capacity);
    let mut shortfall_year = None;
    let mut total_goal_cost = 0.0;

    for offset in 0..=assumptions.horizon_years {
        // Rows past the last representable calendar year are not produced.
        let Some(year) = i32::try_from(offset)
            .ok()
            .and_then(|o| assumptions.start_year.checked_add(o))
        else {
            break;
        };
        assets = assets * (1.0 + assumptions.annual_return) + assumptions.annual_savings;

        let spend = if assumptions.in_spend_window(offset) {
            per_year_spend
        } else {
            0.0
        };
        assets -= spend;

        // A NaN balance counts as a shortfall.
        if (assets.is_nan() || assets < 0.0) && shortfall_year.is_none() {
            shortfall_year = Some(year);
        }

        years.push(YearProjection {
            year,
            assets: assets.max(0.0),
            spend,
        });
        total_goal_cost += spend;
    }

    let final_wealth = years.last().map_or(0.0, |y| y.assets);

    SimulationOutcome {
        years,
        success: shortfall_year.is_none(),
        shortfall_year,
        final_wealth,
        total_goal_cost,
        allocation: Allocation::from_goals(active),
    }
}
