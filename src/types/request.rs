use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{
    core::dates::{TripDates, MAX_TRIP_DAYS},
    error::{PlannerError, Result},
};

/// A trip request as submitted by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelRequest {
    /// Destination city or region (e.g. "Paris")
    #[serde(default)]
    pub destination: String,
    /// First day of the trip, `YYYY-MM-DD`
    pub start_date: String,
    /// Last day of the trip, `YYYY-MM-DD`
    pub end_date: String,
    /// Number of people travelling
    #[serde(deserialize_with = "deserialize_travelers")]
    pub travelers: u32,
    /// Total budget for the trip, kept as text the way forms submit it
    #[serde(
        default,
        deserialize_with = "deserialize_budget",
        skip_serializing_if = "Option::is_none"
    )]
    pub budget: Option<String>,
    /// Interests in the order the traveller picked them
    #[serde(default)]
    pub interests: Vec<String>,
}

impl TravelRequest {
    pub fn new(
        destination: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
        travelers: u32,
    ) -> Self {
        Self {
            destination: destination.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
            travelers,
            budget: None,
            interests: Vec::new(),
        }
    }

    pub fn with_budget(mut self, budget: impl Into<String>) -> Self {
        self.budget = normalize_budget(budget.into());
        self
    }

    pub fn with_interests<I, S>(mut self, interests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.interests = interests.into_iter().map(Into::into).collect();
        self
    }

    /// Reject requests that must not reach any planner.
    pub fn validate(&self) -> Result<()> {
        if self.destination.trim().is_empty() {
            return Err(PlannerError::InvalidRequest(
                "Destination is required".to_string(),
            ));
        }
        if self.travelers == 0 {
            return Err(PlannerError::InvalidRequest(
                "At least one traveler is required".to_string(),
            ));
        }
        if let Some(days) = TripDates::from_request(self).span() {
            if days > MAX_TRIP_DAYS {
                return Err(PlannerError::InvalidRequest(format!(
                    "Trips are limited to {MAX_TRIP_DAYS} days, got {days}"
                )));
            }
        }
        Ok(())
    }

    /// Interests joined for a prompt, or `placeholder` when none were given.
    pub fn interests_or(&self, placeholder: &str) -> String {
        if self.interests.is_empty() {
            placeholder.to_string()
        } else {
            self.interests.join(", ")
        }
    }

    /// Budget as rendered into prompts.
    pub fn budget_label(&self) -> &str {
        self.budget.as_deref().unwrap_or("Not specified")
    }
}

fn normalize_budget(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// Web forms post numeric inputs as strings.
fn deserialize_travelers<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Value::deserialize(deserializer)? {
        Value::Number(number) => number
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| D::Error::custom(format!("invalid traveler count: {number}"))),
        Value::String(text) => text
            .trim()
            .parse::<u32>()
            .map_err(|_| D::Error::custom(format!("invalid traveler count: {text:?}"))),
        other => Err(D::Error::custom(format!(
            "expected a traveler count, found {other}"
        ))),
    }
}

fn deserialize_budget<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(normalize_budget(text)),
        Some(Value::Number(number)) => Ok(Some(number.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a budget string or number, found {other}"
        ))),
    }
}
