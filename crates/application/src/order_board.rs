use salesdesk_core::AppResult;
use salesdesk_domain::{ListQuery, OrderSummary};

use crate::ListQueryService;

/// Read-only view of the seller's orders.
#[derive(Clone)]
pub struct OrderBoard {
    lists: ListQueryService,
}

impl OrderBoard {
    /// Creates an order board reading through the list cache.
    #[must_use]
    pub fn new(lists: ListQueryService) -> Self {
        Self { lists }
    }

    /// Returns the seller's orders. An empty list means no orders yet.
    pub async fn list_orders(&self) -> AppResult<Vec<OrderSummary>> {
        self.lists
            .load(ListQuery::OrdersBySeller)
            .await?
            .iter()
            .map(OrderSummary::from_record)
            .collect()
    }
}
