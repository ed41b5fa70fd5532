use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Budget used when neither the caller nor the planning agent supplies one.
pub const DEFAULT_TOTAL_COST: &str = "2500";

/// The merged travel plan returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositePlan {
    /// Destination exactly as requested
    pub destination: String,
    /// Trip length in days as reported by the planning agent
    pub duration: Value,
    /// Cost, party size and dates
    pub overview: Overview,
    /// Flights, car rental and local transit
    pub transportation: Value,
    /// One or more hotel recommendations
    pub accommodation: Value,
    /// Attractions to visit
    pub attractions: Value,
    /// Restaurants and dishes to try
    pub restaurants: Value,
    /// Day-by-day itinerary
    pub activities: Value,
    /// Practical tips for the destination
    pub local_tips: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_cost: Value,
    pub travelers: u32,
    pub start_date: String,
    pub end_date: String,
}

impl CompositePlan {
    /// Number of itinerary days in the plan.
    pub fn day_count(&self) -> usize {
        self.activities.as_array().map_or(0, Vec::len)
    }
}
