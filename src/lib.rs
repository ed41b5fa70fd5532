//! travel-planner: a multi-agent travel planner backed by an LLM
//!
//! A [`TravelRequest`] is sent through seven topic planners (overall plan,
//! transportation, accommodation, attractions, restaurants, itinerary and
//! local tips). Each planner renders a prompt, asks a [`TextGenerator`], and
//! keeps the reply if it parses as the JSON shape it expects. Otherwise it
//! falls back to static data, so a plan is always complete.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use travel_planner::{GenerationClient, Orchestrator, TravelRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GenerationClient::from_env()?;
//!     let orchestrator = Orchestrator::new(Arc::new(client));
//!
//!     let request = TravelRequest::new("Paris", "2024-06-01", "2024-06-04", 2)
//!         .with_budget("1200")
//!         .with_interests(["food"]);
//!
//!     let plan = orchestrator.create_plan(&request).await?;
//!     println!("{}", serde_json::to_string_pretty(&plan)?);
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod error;
pub mod server;
pub mod services;
pub mod types;

pub use crate::core::{
    per_night_budget, Orchestrator, PlanContext, PlanTopic, Planner, PlannerSpec, TripDates,
};
pub use error::{PlannerError, Result};
pub use services::generation_client::{
    GenerationClient, GenerationConfig, TextGenerator, EMPTY_JSON,
};
pub use services::plan_log::PlanLog;
pub use services::response_parser::{parse, strip_code_fences, ParseError, ResultShape};
pub use types::{CompositePlan, Overview, TravelRequest};

#[cfg(feature = "cli")]
pub mod cli;
