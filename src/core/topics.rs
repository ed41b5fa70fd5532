//! Prompt templates, expected shapes and fallbacks for the seven planners.

use serde_json::{json, Value};

use super::{
    dates::per_night_budget,
    planner::{PlanContext, PlanTopic, PlannerSpec},
};
use crate::{services::response_parser::ResultShape, types::DEFAULT_TOTAL_COST};

const JSON_ONLY: &str = "Return ONLY valid JSON, no markdown formatting.";
const JSON_ARRAY_ONLY: &str = "Return ONLY valid JSON array, no markdown formatting.";

pub const PLANNING: PlannerSpec = PlannerSpec {
    topic: PlanTopic::Planning,
    render_prompt: planning_prompt,
    shape: ResultShape::Mapping {
        any_of: &["duration", "overview", "bestTime", "tips"],
    },
    fallback: planning_fallback,
};

pub const TRANSPORTATION: PlannerSpec = PlannerSpec {
    topic: PlanTopic::Transportation,
    render_prompt: transportation_prompt,
    shape: ResultShape::Mapping {
        any_of: &["flights", "carRental", "localTransportation"],
    },
    fallback: transportation_fallback,
};

pub const ACCOMMODATION: PlannerSpec = PlannerSpec {
    topic: PlanTopic::Accommodation,
    render_prompt: accommodation_prompt,
    shape: ResultShape::Lodging,
    fallback: accommodation_fallback,
};

pub const ATTRACTIONS: PlannerSpec = PlannerSpec {
    topic: PlanTopic::Attractions,
    render_prompt: attractions_prompt,
    shape: ResultShape::Listing { key: "attractions" },
    fallback: attractions_fallback,
};

pub const RESTAURANTS: PlannerSpec = PlannerSpec {
    topic: PlanTopic::Restaurants,
    render_prompt: restaurants_prompt,
    shape: ResultShape::Listing { key: "restaurants" },
    fallback: restaurants_fallback,
};

pub const ITINERARY: PlannerSpec = PlannerSpec {
    topic: PlanTopic::Itinerary,
    render_prompt: itinerary_prompt,
    shape: ResultShape::Listing { key: "activities" },
    fallback: itinerary_fallback,
};

pub const LOCAL_TIPS: PlannerSpec = PlannerSpec {
    topic: PlanTopic::LocalTips,
    render_prompt: local_tips_prompt,
    shape: ResultShape::Listing { key: "localTips" },
    fallback: local_tips_fallback,
};

/// Spec for `topic`.
pub fn spec_for(topic: PlanTopic) -> PlannerSpec {
    match topic {
        PlanTopic::Planning => PLANNING,
        PlanTopic::Transportation => TRANSPORTATION,
        PlanTopic::Accommodation => ACCOMMODATION,
        PlanTopic::Attractions => ATTRACTIONS,
        PlanTopic::Restaurants => RESTAURANTS,
        PlanTopic::Itinerary => ITINERARY,
        PlanTopic::LocalTips => LOCAL_TIPS,
    }
}

fn planning_prompt(ctx: &PlanContext<'_>) -> String {
    let request = ctx.request;
    format!(
        "You are an expert travel planner. Create a comprehensive travel plan with the following details:\n\n\
         Destination: {}\n\
         Dates: {} to {}\n\
         Number of travelers: {}\n\
         Budget: ${}\n\
         Interests: {}\n\n\
         Provide a detailed plan in JSON format with:\n\
         - duration (number of days)\n\
         - overview (total estimated cost, key highlights)\n\
         - best time to visit\n\
         - general tips for the destination\n\n\
         {JSON_ONLY}",
        request.destination,
        request.start_date,
        request.end_date,
        request.travelers,
        request.budget_label(),
        request.interests_or("General tourism"),
    )
}

fn planning_fallback(ctx: &PlanContext<'_>) -> Value {
    json!({
        "duration": ctx.dates.trip_days(),
        "overview": {
            "totalCost": ctx.request.budget.as_deref().unwrap_or(DEFAULT_TOTAL_COST),
            "highlights": []
        },
        "bestTime": "Year-round",
        "tips": []
    })
}

fn transportation_prompt(ctx: &PlanContext<'_>) -> String {
    let request = ctx.request;
    format!(
        "You are a transportation booking expert. Find the best transportation options for:\n\n\
         Destination: {}\n\
         Dates: {} to {}\n\
         Number of travelers: {}\n\
         Budget: ${}\n\n\
         Provide recommendations in JSON format with:\n\
         - flights (outbound and return with estimated prices)\n\
         - carRental (type of car, daily rate, recommended company)\n\
         - localTransportation (public transit options, ride-sharing info)\n\n\
         {JSON_ONLY}",
        request.destination,
        request.start_date,
        request.end_date,
        request.travelers,
        request.budget_label(),
    )
}

fn transportation_fallback(ctx: &PlanContext<'_>) -> Value {
    json!({
        "flights": {
            "outbound": format!("Flight to {} - $450/person", ctx.request.destination),
            "return": "Return flight - $480/person"
        },
        "carRental": "Compact SUV - $65/day",
        "localTransportation": "Public transit and ride-sharing available"
    })
}

fn accommodation_prompt(ctx: &PlanContext<'_>) -> String {
    let request = ctx.request;
    let nightly = per_night_budget(request.budget.as_deref(), ctx.dates.lodging_nights());
    format!(
        "You are a hotel booking expert. Find the best accommodation for:\n\n\
         Destination: {}\n\
         Dates: {} to {}\n\
         Number of travelers: {}\n\
         Budget per night: ${}\n\
         Interests: {}\n\n\
         Recommend 4-5 hotels in JSON format with:\n\
         - hotel (name)\n\
         - location (area/neighborhood)\n\
         - pricePerNight (number)\n\
         - amenities (list of strings)\n\
         - description\n\
         - link (official website or Google Maps link)\n\n\
         {JSON_ONLY}",
        request.destination,
        request.start_date,
        request.end_date,
        request.travelers,
        nightly,
        request.interests_or("General"),
    )
}

fn accommodation_fallback(ctx: &PlanContext<'_>) -> Value {
    json!({
        "hotel": format!("Hotel in {}", ctx.request.destination),
        "location": "City Center",
        "pricePerNight": 189,
        "amenities": ["Free WiFi", "Breakfast", "Pool", "Gym"],
        "description": "Centrally located hotel"
    })
}

fn attractions_prompt(ctx: &PlanContext<'_>) -> String {
    let request = ctx.request;
    format!(
        "You are a local tourism expert. Find the best attractions and activities for:\n\n\
         Destination: {}\n\
         Duration: {} days\n\
         Interests: {}\n\n\
         Provide 5-8 must-visit places in JSON format as an array. Each attraction should have:\n\
         - name\n\
         - type (landmark, museum, park, etc.)\n\
         - duration (time to visit)\n\
         - cost (entry fee)\n\
         - bestTime (when to visit)\n\n\
         Include national parks, famous landmarks, and hidden gems.\n\
         {JSON_ARRAY_ONLY}",
        request.destination,
        ctx.dates.trip_days(),
        request.interests_or("General sightseeing"),
    )
}

fn attractions_fallback(ctx: &PlanContext<'_>) -> Value {
    json!([{
        "name": format!("Famous landmark in {}", ctx.request.destination),
        "type": "Landmark",
        "duration": "2-3 hours",
        "cost": "Free",
        "bestTime": "Morning"
    }])
}

fn restaurants_prompt(ctx: &PlanContext<'_>) -> String {
    let request = ctx.request;
    format!(
        "You are a local food expert. Recommend the best restaurants and local dishes for:\n\n\
         Destination: {}\n\
         Number of travelers: {}\n\
         Interests: {}\n\n\
         Provide 4-6 restaurant recommendations in JSON format as an array. Each should have:\n\
         - name\n\
         - cuisine\n\
         - specialty (what they're known for)\n\
         - priceRange ($, $$, or $$$)\n\
         - mustTry (specific dishes to order)\n\
         - link (official website link)\n\n\
         Include a mix of local favorites, famous spots, and hidden gems.\n\
         Also include famous local dishes/foods that are must-try.\n\
         {JSON_ARRAY_ONLY}",
        request.destination,
        request.travelers,
        request.interests_or("General"),
    )
}

fn restaurants_fallback(_ctx: &PlanContext<'_>) -> Value {
    json!([{
        "name": "Local Restaurant",
        "cuisine": "Local",
        "specialty": "Traditional dishes",
        "priceRange": "$$",
        "mustTry": "Local specialty"
    }])
}

fn itinerary_prompt(ctx: &PlanContext<'_>) -> String {
    format!(
        "You are an itinerary planning expert. Create a day-by-day schedule for:\n\n\
         Destination: {}\n\
         Duration: {} days\n\
         Attractions: {}\n\
         Restaurants: {}\n\n\
         Create a detailed daily itinerary in JSON format as an array. For each day provide:\n\
         - day (number)\n\
         - morning (activity/location)\n\
         - afternoon (activity/location)\n\
         - evening (activity/location including dinner recommendation)\n\n\
         Make it realistic with travel time and rest periods.\n\
         {JSON_ARRAY_ONLY}",
        ctx.request.destination,
        ctx.dates.trip_days(),
        Value::from(ctx.attractions().to_vec()),
        Value::from(ctx.restaurants().to_vec()),
    )
}

fn itinerary_fallback(ctx: &PlanContext<'_>) -> Value {
    let days = (1..=ctx.dates.trip_days())
        .map(|day| {
            json!({
                "day": day,
                "morning": "Explore local area",
                "afternoon": "Visit main attractions",
                "evening": "Dinner and relaxation"
            })
        })
        .collect::<Vec<_>>();
    Value::Array(days)
}

fn local_tips_prompt(ctx: &PlanContext<'_>) -> String {
    format!(
        "You are a local expert for {}. Provide essential tips for travelers:\n\n\
         Provide 6-8 important local tips as a JSON array of strings including:\n\
         - Local customs and etiquette\n\
         - Transportation tips\n\
         - Safety advice\n\
         - Money/currency tips\n\
         - Best times to visit attractions\n\
         - Local phrases or language tips\n\
         - What to pack\n\
         - Insider secrets\n\n\
         Return ONLY valid JSON array of tip strings, no markdown formatting.",
        ctx.request.destination,
    )
}

fn local_tips_fallback(ctx: &PlanContext<'_>) -> Value {
    json!([
        format!("Research local customs in {}", ctx.request.destination),
        "Book popular attractions in advance",
        "Learn a few local phrases",
        "Keep emergency contacts handy"
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TravelRequest;

    fn request() -> TravelRequest {
        TravelRequest::new("Paris", "2024-06-01", "2024-06-04", 2)
            .with_budget("900")
            .with_interests(["food", "art"])
    }

    #[test]
    fn test_spec_for_matches_topic() {
        for topic in PlanTopic::ALL {
            assert_eq!(spec_for(topic).topic, topic);
        }
    }

    #[test]
    fn test_planning_prompt_includes_request() {
        let request = request();
        let prompt = planning_prompt(&PlanContext::new(&request));
        assert!(prompt.contains("Destination: Paris"));
        assert!(prompt.contains("Dates: 2024-06-01 to 2024-06-04"));
        assert!(prompt.contains("Budget: $900"));
        assert!(prompt.contains("Interests: food, art"));
    }

    #[test]
    fn test_prompt_placeholders_without_interests() {
        let request = TravelRequest::new("Oslo", "2024-06-01", "2024-06-04", 1);
        let ctx = PlanContext::new(&request);
        assert!(planning_prompt(&ctx).contains("Interests: General tourism"));
        assert!(planning_prompt(&ctx).contains("Budget: $Not specified"));
        assert!(attractions_prompt(&ctx).contains("Interests: General sightseeing"));
        assert!(restaurants_prompt(&ctx).contains("Interests: General"));
    }

    #[test]
    fn test_accommodation_prompt_uses_nightly_budget() {
        let request = request();
        let prompt = accommodation_prompt(&PlanContext::new(&request));
        assert!(prompt.contains("Budget per night: $300"));

        let same_day = TravelRequest::new("Paris", "2024-06-01", "2024-06-01", 2).with_budget("900");
        let prompt = accommodation_prompt(&PlanContext::new(&same_day));
        assert!(prompt.contains("Budget per night: $150"));

        let malformed = TravelRequest::new("Paris", "June 1", "June 4", 2).with_budget("900");
        let prompt = accommodation_prompt(&PlanContext::new(&malformed));
        assert!(prompt.contains("Budget per night: $900"));
    }

    #[test]
    fn test_planning_fallback_defaults() {
        let request = TravelRequest::new("Paris", "bad", "dates", 2);
        let value = planning_fallback(&PlanContext::new(&request));
        assert_eq!(value["duration"], 3);
        assert_eq!(value["overview"]["totalCost"], DEFAULT_TOTAL_COST);
        assert_eq!(value["bestTime"], "Year-round");
        assert_eq!(value["tips"], json!([]));
    }

    #[test]
    fn test_itinerary_fallback_has_one_entry_per_day() {
        let request = request();
        let value = itinerary_fallback(&PlanContext::new(&request));
        let days = value.as_array().unwrap();
        assert_eq!(days.len(), 3);
        assert_eq!(days[0]["day"], 1);
        assert_eq!(days[2]["day"], 3);
        assert_eq!(days[1]["afternoon"], "Visit main attractions");
    }

    #[test]
    fn test_fallbacks_interpolate_destination() {
        let request = request();
        let ctx = PlanContext::new(&request);
        assert_eq!(
            transportation_fallback(&ctx)["flights"]["outbound"],
            "Flight to Paris - $450/person"
        );
        assert_eq!(accommodation_fallback(&ctx)["hotel"], "Hotel in Paris");
        assert_eq!(
            attractions_fallback(&ctx)[0]["name"],
            "Famous landmark in Paris"
        );
        assert_eq!(
            local_tips_fallback(&ctx)[0],
            "Research local customs in Paris"
        );
        assert_eq!(local_tips_fallback(&ctx).as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_every_fallback_satisfies_its_shape() {
        let request = request();
        let ctx = PlanContext::new(&request);
        for topic in PlanTopic::ALL {
            let spec = spec_for(topic);
            let fallback = (spec.fallback)(&ctx);
            assert!(
                spec.shape.accept(fallback).is_ok(),
                "{topic} fallback does not match its shape"
            );
        }
    }
}
