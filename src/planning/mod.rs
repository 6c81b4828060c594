pub mod insight;
pub mod simulation;

pub use insight::{plan_insight, InsightKind, PlanInsight};
pub use simulation::{
    simulate_goals, Allocation, PlanAssumptions, SimulationOutcome, YearProjection,
};
