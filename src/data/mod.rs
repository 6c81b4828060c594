pub mod catalog;
pub mod goals;
pub mod validate;

pub use catalog::{load_catalog, Catalog, Category, Narrative, Vendor, DEFAULT_CATALOG_PATH};
pub use goals::{priority_label, Goal, GoalBoard, PriorityTier};
