use chrono::NaiveDate;

use crate::types::TravelRequest;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Trip length assumed when the request dates cannot be parsed.
pub const DEFAULT_TRIP_DAYS: i64 = 3;
/// Night count assumed for lodging when the request dates cannot be parsed.
pub const DEFAULT_LODGING_NIGHTS: i64 = 1;
/// Nightly hotel budget used when none can be derived.
pub const DEFAULT_NIGHTLY_RATE: i64 = 150;
/// Longest date range a request may cover.
pub const MAX_TRIP_DAYS: i64 = 30;

/// Parsed date range of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripDates {
    span: Option<i64>,
}

impl TripDates {
    pub fn parse(start: &str, end: &str) -> Self {
        let span = match (
            NaiveDate::parse_from_str(start, DATE_FORMAT),
            NaiveDate::parse_from_str(end, DATE_FORMAT),
        ) {
            (Ok(start), Ok(end)) => Some((end - start).num_days()),
            _ => None,
        };
        Self { span }
    }

    pub fn from_request(request: &TravelRequest) -> Self {
        Self::parse(&request.start_date, &request.end_date)
    }

    /// `end - start` in whole days, `None` if either date is malformed.
    pub fn span(&self) -> Option<i64> {
        self.span
    }

    /// Days to plan for. Same-day and inverted ranges count as one day.
    pub fn trip_days(&self) -> i64 {
        match self.span {
            Some(days) => days.max(1),
            None => DEFAULT_TRIP_DAYS,
        }
    }

    /// Nights to split the lodging budget over.
    pub fn lodging_nights(&self) -> i64 {
        self.span.unwrap_or(DEFAULT_LODGING_NIGHTS)
    }
}

/// Whole-currency nightly budget: `floor(budget) / nights`, or the default rate
/// when the budget is missing or not a number, or `nights` is not positive.
pub fn per_night_budget(budget: Option<&str>, nights: i64) -> i64 {
    let total = budget
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .filter(|total| total.is_finite() && *total >= 0.0)
        .map(|total| total.floor() as i64);

    match total {
        Some(total) if nights > 0 => total / nights,
        _ => DEFAULT_NIGHTLY_RATE,
    }
}
