pub mod plan;
pub mod request;

pub use plan::{CompositePlan, Overview, DEFAULT_TOTAL_COST};
pub use request::TravelRequest;
