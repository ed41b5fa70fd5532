use std::{fmt, sync::Arc};

use serde_json::Value;
use tracing::debug;

use super::dates::TripDates;
use crate::{
    services::{
        generation_client::TextGenerator,
        response_parser::{parse, ParseError, ResultShape},
    },
    types::TravelRequest,
};

/// Attractions forwarded to the itinerary prompt.
pub const MAX_ITINERARY_ATTRACTIONS: usize = 10;
/// Restaurants forwarded to the itinerary prompt.
pub const MAX_ITINERARY_RESTAURANTS: usize = 5;

/// The seven topics a travel plan is assembled from, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlanTopic {
    Planning,
    Transportation,
    Accommodation,
    Attractions,
    Restaurants,
    Itinerary,
    LocalTips,
}

impl PlanTopic {
    pub const ALL: [PlanTopic; 7] = [
        PlanTopic::Planning,
        PlanTopic::Transportation,
        PlanTopic::Accommodation,
        PlanTopic::Attractions,
        PlanTopic::Restaurants,
        PlanTopic::Itinerary,
        PlanTopic::LocalTips,
    ];

    /// Persona the prompt is written for
    pub fn role(&self) -> &'static str {
        match self {
            PlanTopic::Planning => "Trip Planner",
            PlanTopic::Transportation => "Transportation Specialist",
            PlanTopic::Accommodation => "Accommodation Expert",
            PlanTopic::Attractions => "Attractions Guide",
            PlanTopic::Restaurants => "Food Expert",
            PlanTopic::Itinerary => "Itinerary Planner",
            PlanTopic::LocalTips => "Local Expert",
        }
    }

    /// 1-based position in the pipeline
    pub fn step(&self) -> usize {
        match self {
            PlanTopic::Planning => 1,
            PlanTopic::Transportation => 2,
            PlanTopic::Accommodation => 3,
            PlanTopic::Attractions => 4,
            PlanTopic::Restaurants => 5,
            PlanTopic::Itinerary => 6,
            PlanTopic::LocalTips => 7,
        }
    }

    pub fn activity(&self) -> &'static str {
        match self {
            PlanTopic::Planning => "Planning overall trip",
            PlanTopic::Transportation => "Finding transportation options",
            PlanTopic::Accommodation => "Finding accommodations",
            PlanTopic::Attractions => "Discovering attractions",
            PlanTopic::Restaurants => "Finding best restaurants",
            PlanTopic::Itinerary => "Creating daily itinerary",
            PlanTopic::LocalTips => "Gathering local tips",
        }
    }
}

impl fmt::Display for PlanTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.role())
    }
}

/// Everything a planner may read while building its prompt or fallback.
#[derive(Debug, Clone, Copy)]
pub struct PlanContext<'a> {
    pub request: &'a TravelRequest,
    pub dates: TripDates,
    attractions: &'a [Value],
    restaurants: &'a [Value],
}

impl<'a> PlanContext<'a> {
    pub fn new(request: &'a TravelRequest) -> Self {
        Self {
            request,
            dates: TripDates::from_request(request),
            attractions: &[],
            restaurants: &[],
        }
    }

    /// Attach upstream results, keeping only what the itinerary prompt uses.
    pub fn with_upstream(mut self, attractions: &'a [Value], restaurants: &'a [Value]) -> Self {
        self.attractions = &attractions[..attractions.len().min(MAX_ITINERARY_ATTRACTIONS)];
        self.restaurants = &restaurants[..restaurants.len().min(MAX_ITINERARY_RESTAURANTS)];
        self
    }

    pub fn attractions(&self) -> &'a [Value] {
        self.attractions
    }

    pub fn restaurants(&self) -> &'a [Value] {
        self.restaurants
    }
}

/// Static description of one planner: how to ask, what to accept, what to use instead.
#[derive(Clone, Copy)]
pub struct PlannerSpec {
    pub topic: PlanTopic,
    pub render_prompt: fn(&PlanContext<'_>) -> String,
    pub shape: ResultShape,
    pub fallback: fn(&PlanContext<'_>) -> Value,
}

impl fmt::Debug for PlannerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlannerSpec")
            .field("topic", &self.topic)
            .field("shape", &self.shape)
            .finish_non_exhaustive()
    }
}

/// A prompt/parse step bound to a generator. Holds no per-request state.
#[derive(Clone)]
pub struct Planner {
    spec: PlannerSpec,
    generator: Arc<dyn TextGenerator>,
}

impl fmt::Debug for Planner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Planner")
            .field("spec", &self.spec)
            .field("configured", &self.generator.is_configured())
            .finish()
    }
}

impl Planner {
    pub fn new(spec: PlannerSpec, generator: Arc<dyn TextGenerator>) -> Self {
        Self { spec, generator }
    }

    pub fn topic(&self) -> PlanTopic {
        self.spec.topic
    }

    pub fn prompt(&self, ctx: &PlanContext<'_>) -> String {
        (self.spec.render_prompt)(ctx)
    }

    pub fn fallback(&self, ctx: &PlanContext<'_>) -> Value {
        (self.spec.fallback)(ctx)
    }

    /// Decode and shape-check a raw reply.
    pub fn interpret(&self, raw: &str) -> Result<Value, ParseError> {
        self.spec.shape.accept(parse(raw)?)
    }

    /// Ask the generator and return its answer, or the fallback if it is unusable.
    pub async fn run(&self, ctx: &PlanContext<'_>) -> Value {
        let prompt = self.prompt(ctx);
        let raw = self.generator.generate(&prompt).await;

        match self.interpret(&raw) {
            Ok(value) => value,
            Err(err) => {
                debug!(
                    target: "travel_planner::planner",
                    topic = %self.spec.topic,
                    error = %err,
                    "using fallback result"
                );
                self.fallback(ctx)
            }
        }
    }
}
