// Plan catalog: the single source of truth for valid plan codes.
// Adding a plan means adding one entry here, never branching elsewhere.

use serde::Serialize;
use utoipa::ToSchema;

/// A purchasable product tier with a fixed price and delivery SLA
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlanDefinition {
    pub code: String,
    pub display_name: String,
    pub price: String,
    pub delivery_sla: String,
}

impl PlanDefinition {
    pub fn new(code: &str, display_name: &str, price: &str, delivery_sla: &str) -> Self {
        Self {
            code: code.to_string(),
            display_name: display_name.to_string(),
            price: price.to_string(),
            delivery_sla: delivery_sla.to_string(),
        }
    }
}

/// Immutable set of plan definitions, loaded once at process start
#[derive(Debug, Clone)]
pub struct PlanCatalog {
    plans: Vec<PlanDefinition>,
}

impl PlanCatalog {
    pub fn new(plans: Vec<PlanDefinition>) -> Self {
        Self { plans }
    }

    /// The current product catalog
    pub fn standard() -> Self {
        Self::new(vec![
            PlanDefinition::new("snap", "Song Snap", "$3.99", "2 hours"),
            PlanDefinition::new("snappack", "Snap Pack (3 songs)", "$9.99", "12 hours"),
            PlanDefinition::new("creator", "Creator Monthly", "$19.99/month", "priority queue"),
        ])
    }

    /// Look up a plan definition by code. Deterministic, no side effects.
    pub fn resolve(&self, code: &str) -> Option<&PlanDefinition> {
        self.plans.iter().find(|plan| plan.code == code)
    }

    /// All plan definitions, in catalog order
    pub fn plans(&self) -> &[PlanDefinition] {
        &self.plans
    }
}
