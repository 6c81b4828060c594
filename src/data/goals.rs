//! Goal board for the wealth-projection view: default life goals, activation and priority edits.

use serde::{Deserialize, Serialize};

pub const MIN_PRIORITY: u8 = 1;
pub const MAX_PRIORITY: u8 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub name: String,
    pub cost: f64,
    pub priority: u8,
    pub active: bool,
    #[serde(default)]
    pub desc: String,
}

/// Allocation bucket a goal falls into by priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityTier {
    Needs,
    Wants,
    Dreams,
}

impl PriorityTier {
    pub fn for_priority(priority: u8) -> Self {
        if priority >= 7 {
            Self::Needs
        } else if priority >= 4 {
            Self::Wants
        } else {
            Self::Dreams
        }
    }
}

pub fn priority_label(priority: u8) -> &'static str {
    if priority >= 9 {
        "Non-Negotiable"
    } else if priority >= 7 {
        "High Priority"
    } else if priority >= 4 {
        "Nice to Have"
    } else {
        "Wishlist"
    }
}

impl Goal {
    pub fn tier(&self) -> PriorityTier {
        PriorityTier::for_priority(self.priority)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalBoard {
    pub goals: Vec<Goal>,
}

impl Default for GoalBoard {
    fn default() -> Self {
        Self {
            goals: default_goals(),
        }
    }
}

impl GoalBoard {
    /// Case-insensitive, matching [GoalBoard::with_active_ids].
    pub fn contains(&self, id: &str) -> bool {
        self.goals.iter().any(|g| g.id.eq_ignore_ascii_case(id))
    }

    /// Flip a goal's active flag. Returns the new state, or None for an unknown id.
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        let goal = self.goals.iter_mut().find(|g| g.id == id)?;
        goal.active = !goal.active;
        Some(goal.active)
    }

    /// Set priority, clamped to 1..=10. Returns the stored value, or None for an unknown id.
    pub fn set_priority(&mut self, id: &str, priority: i64) -> Option<u8> {
        let goal = self.goals.iter_mut().find(|g| g.id == id)?;
        let clamped = priority.clamp(MIN_PRIORITY as i64, MAX_PRIORITY as i64) as u8;
        goal.priority = clamped;
        Some(clamped)
    }

    /// Keep only goals whose id is listed as active; everything else is switched off.
    pub fn with_active_ids(mut self, ids: &[String]) -> Self {
        for goal in &mut self.goals {
            goal.active = ids.iter().any(|id| id.eq_ignore_ascii_case(&goal.id));
        }
        self
    }
}

fn goal(id: &str, name: &str, cost: f64, priority: u8, active: bool, desc: &str) -> Goal {
    Goal {
        id: id.to_string(),
        name: name.to_string(),
        cost,
        priority,
        active,
        desc: desc.to_string(),
    }
}

pub fn default_goals() -> Vec<Goal> {
    vec![
        goal(
            "retire",
            "Retirement Base",
            1_500_000.0,
            10,
            true,
            "Essential living expenses age 65+",
        ),
        goal(
            "college",
            "Kids' College",
            250_000.0,
            8,
            false,
            "4-year state university funding",
        ),
        goal(
            "home",
            "Dream Home Upgrade",
            400_000.0,
            5,
            false,
            "Renovation or new purchase in 5 years",
        ),
        goal(
            "travel",
            "Annual World Travel",
            150_000.0,
            3,
            false,
            "$15k/year for 10 years",
        ),
        goal(
            "wedding",
            "Luxury Wedding",
            50_000.0,
            2,
            false,
            "Support for children's wedding",
        ),
        goal(
            "boat",
            "Sailing Boat",
            120_000.0,
            1,
            false,
            "Purchase and maintenance",
        ),
    ]
}
