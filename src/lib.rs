pub mod calendar;
pub mod deck;
pub mod error;
pub mod patterns;
pub mod phase;
pub mod plan;
pub mod profile;
pub mod spaced;
pub mod store;
pub mod strategy;
pub mod task;

pub use error::{PlanError, Result};
pub use plan::{CarryOver, PlanConfig, Planner, generate_plan};
pub use task::{StudyTask, Subject, TaskType};
