pub mod dates;
pub mod orchestrator;
pub mod planner;
pub mod topics;

pub use dates::{per_night_budget, TripDates, MAX_TRIP_DAYS};
pub use orchestrator::Orchestrator;
pub use planner::{PlanContext, PlanTopic, Planner, PlannerSpec};
