use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use super::{
    planner::{PlanContext, PlanTopic, Planner},
    topics,
};
use crate::{
    error::Result,
    services::generation_client::TextGenerator,
    types::{CompositePlan, Overview, TravelRequest, DEFAULT_TOTAL_COST},
};

/// Runs the seven planners in order and merges their results.
///
/// Shared read-only between concurrent requests; every call to
/// [`Orchestrator::create_plan`] is independent.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    planning: Planner,
    transportation: Planner,
    accommodation: Planner,
    attractions: Planner,
    restaurants: Planner,
    itinerary: Planner,
    local_tips: Planner,
    ai_enabled: bool,
}

impl Orchestrator {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        let planner = |spec| Planner::new(spec, Arc::clone(&generator));
        let orchestrator = Self {
            planning: planner(topics::PLANNING),
            transportation: planner(topics::TRANSPORTATION),
            accommodation: planner(topics::ACCOMMODATION),
            attractions: planner(topics::ATTRACTIONS),
            restaurants: planner(topics::RESTAURANTS),
            itinerary: planner(topics::ITINERARY),
            local_tips: planner(topics::LOCAL_TIPS),
            ai_enabled: generator.is_configured(),
        };
        info!(ai_enabled = orchestrator.ai_enabled, "travel planner agents initialized");
        orchestrator
    }

    /// Whether planners talk to a live generation service
    pub fn ai_enabled(&self) -> bool {
        self.ai_enabled
    }

    pub fn agent_count(&self) -> usize {
        PlanTopic::ALL.len()
    }

    /// Build a complete plan. Fails only for requests that do not validate.
    pub async fn create_plan(&self, request: &TravelRequest) -> Result<CompositePlan> {
        request.validate()?;
        info!(destination = %request.destination, "creating travel plan");

        let ctx = PlanContext::new(request);

        let plan = self.step(&self.planning, &ctx).await;
        let transportation = self.step(&self.transportation, &ctx).await;
        let accommodation = self.step(&self.accommodation, &ctx).await;
        let attractions = self.step(&self.attractions, &ctx).await;
        let restaurants = self.step(&self.restaurants, &ctx).await;

        let itinerary_ctx = ctx.with_upstream(as_slice(&attractions), as_slice(&restaurants));
        let activities = self.step(&self.itinerary, &itinerary_ctx).await;

        let local_tips = self.step(&self.local_tips, &ctx).await;

        let total_cost = request
            .budget
            .clone()
            .map(Value::String)
            .or_else(|| plan.pointer("/overview/totalCost").cloned())
            .unwrap_or_else(|| Value::from(DEFAULT_TOTAL_COST));

        let composite = CompositePlan {
            destination: request.destination.clone(),
            duration: plan.get("duration").cloned().unwrap_or(Value::from(0)),
            overview: Overview {
                total_cost,
                travelers: request.travelers,
                start_date: request.start_date.clone(),
                end_date: request.end_date.clone(),
            },
            transportation,
            accommodation,
            attractions,
            restaurants,
            activities,
            local_tips,
        };

        info!(
            destination = %composite.destination,
            days = composite.day_count(),
            "travel plan completed"
        );
        Ok(composite)
    }

    async fn step(&self, planner: &Planner, ctx: &PlanContext<'_>) -> Value {
        let topic = planner.topic();
        info!(agent = %topic, "Agent {}: {}...", topic.step(), topic.activity());
        planner.run(ctx).await
    }
}

fn as_slice(value: &Value) -> &[Value] {
    value.as_array().map(Vec::as_slice).unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::generation_client::GenerationClient;

    #[test]
    fn test_agent_count() {
        let orchestrator = Orchestrator::new(Arc::new(GenerationClient::disabled()));
        assert_eq!(orchestrator.agent_count(), 7);
        assert!(!orchestrator.ai_enabled());
    }

    #[test]
    fn test_as_slice() {
        assert_eq!(as_slice(&serde_json::json!([1, 2])).len(), 2);
        assert!(as_slice(&serde_json::json!({"a": 1})).is_empty());
    }

    #[tokio::test]
    async fn test_caller_budget_wins_over_planning_total() {
        let orchestrator = Orchestrator::new(Arc::new(GenerationClient::disabled()));
        let request =
            TravelRequest::new("Paris", "2024-06-01", "2024-06-04", 2).with_budget("1200");
        let plan = orchestrator.create_plan(&request).await.unwrap();
        assert_eq!(plan.overview.total_cost, "1200");

        let request = TravelRequest::new("Paris", "2024-06-01", "2024-06-04", 2);
        let plan = orchestrator.create_plan(&request).await.unwrap();
        assert_eq!(plan.overview.total_cost, DEFAULT_TOTAL_COST);
    }
}
