// Aggregate statistics over the order store.
// Computed from live counts at call time; no caching, operators use this
// for near-real-time monitoring.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::catalog::PlanCatalog;
use crate::error::ApiError;
use crate::orders::store::{OrderFilter, OrderStore};

/// Response DTO for GET /stats
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub total_orders: i64,
    pub fulfilled_orders: i64,
    pub pending_orders: i64,
    pub express_orders: i64,
    pub plan_breakdown: BTreeMap<String, i64>,
}

/// Derives order counts from the store via count queries
#[derive(Clone)]
pub struct StatsAggregator {
    store: Arc<dyn OrderStore>,
    catalog: Arc<PlanCatalog>,
}

impl StatsAggregator {
    pub fn new(store: Arc<dyn OrderStore>, catalog: Arc<PlanCatalog>) -> Self {
        Self { store, catalog }
    }

    /// Compute the current summary.
    ///
    /// `pending` is derived as `total - fulfilled` rather than counted
    /// independently, so `total == fulfilled + pending` cannot drift.
    pub async fn summarize(&self) -> Result<StatsSummary, ApiError> {
        let total = self.store.count_where(&OrderFilter::default()).await?;
        let fulfilled = self.store.count_where(&OrderFilter::fulfilled(true)).await?;
        let pending = total - fulfilled;
        let express = self.store.count_where(&OrderFilter::express(true)).await?;

        let mut plan_breakdown = BTreeMap::new();
        for plan in self.catalog.plans() {
            let count = self.store.count_where(&OrderFilter::plan(&plan.code)).await?;
            plan_breakdown.insert(plan.code.clone(), count);
        }

        Ok(StatsSummary {
            total_orders: total,
            fulfilled_orders: fulfilled,
            pending_orders: pending,
            express_orders: express,
            plan_breakdown,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::service::OrderService;
    use crate::orders::store::MemoryOrderStore;

    fn setup() -> (OrderService, StatsAggregator) {
        let store: Arc<dyn OrderStore> = Arc::new(MemoryOrderStore::new());
        let catalog = Arc::new(PlanCatalog::standard());
        let service = OrderService::new(store.clone(), catalog.clone(), "+1234567890".to_string());
        let stats = StatsAggregator::new(store, catalog);
        (service, stats)
    }

    #[tokio::test]
    async fn empty_store_summarizes_to_zeroes() {
        let (_, stats) = setup();

        let summary = stats.summarize().await.unwrap();

        assert_eq!(summary.total_orders, 0);
        assert_eq!(summary.fulfilled_orders, 0);
        assert_eq!(summary.pending_orders, 0);
        assert_eq!(summary.express_orders, 0);
        assert_eq!(summary.plan_breakdown.len(), 3);
        assert!(summary.plan_breakdown.values().all(|&count| count == 0));
    }

    #[tokio::test]
    async fn totals_and_breakdown_track_orders() {
        let (service, stats) = setup();
        let a = service.create("snap", true).await.unwrap();
        service.create("snap", false).await.unwrap();
        service.create("snappack", false).await.unwrap();
        service.fulfill(&a.order_id).await.unwrap();

        let summary = stats.summarize().await.unwrap();

        assert_eq!(summary.total_orders, 3);
        assert_eq!(summary.fulfilled_orders, 1);
        assert_eq!(summary.pending_orders, 2);
        assert_eq!(summary.express_orders, 1);
        assert_eq!(summary.plan_breakdown["snap"], 2);
        assert_eq!(summary.plan_breakdown["snappack"], 1);
        assert_eq!(summary.plan_breakdown["creator"], 0);
    }

    #[tokio::test]
    async fn total_equals_fulfilled_plus_pending_and_breakdown_sum() {
        let (service, stats) = setup();
        for plan in ["snap", "snappack", "creator", "snap"] {
            service.create(plan, false).await.unwrap();
        }

        let summary = stats.summarize().await.unwrap();

        assert_eq!(
            summary.total_orders,
            summary.fulfilled_orders + summary.pending_orders
        );
        let breakdown_sum: i64 = summary.plan_breakdown.values().sum();
        assert_eq!(breakdown_sum, summary.total_orders);
    }
}
