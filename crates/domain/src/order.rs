use salesdesk_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::{ConfirmedEntity, EntityKind};

/// Fulfilment state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Placed, not yet fulfilled.
    #[serde(rename = "PENDIENTE")]
    Pending,
    /// Fulfilled.
    #[serde(rename = "COMPLETADO")]
    Completed,
    /// Cancelled before fulfilment.
    #[serde(rename = "CANCELADO")]
    Cancelled,
}

impl OrderStatus {
    /// Returns stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDIENTE",
            Self::Completed => "COMPLETADO",
            Self::Cancelled => "CANCELADO",
        }
    }
}

/// One product line of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    id: String,
    #[serde(alias = "cuantity")]
    quantity: u32,
    name: String,
}

impl OrderLine {
    /// Returns the product id.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the ordered quantity.
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Returns the product name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

/// Client snapshot embedded in an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderClient {
    id: String,
    name: String,
    last_name: String,
    email: String,
    #[serde(default)]
    phone: Option<String>,
}

impl OrderClient {
    /// Returns the client id.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns "name last-name".
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.last_name)
    }

    /// Returns the client email.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Returns the client phone, if recorded.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }
}

/// Read-only projection of an order shown in the seller's order list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    id: String,
    #[serde(rename = "order")]
    lines: Vec<OrderLine>,
    client: OrderClient,
    seller: String,
    total: f64,
    status: OrderStatus,
}

impl OrderSummary {
    /// Builds the projection from a confirmed order record.
    pub fn from_record(record: &ConfirmedEntity) -> AppResult<Self> {
        if record.entity() != EntityKind::Order {
            return Err(AppError::Validation(format!(
                "expected an order record, got '{}'",
                record.entity()
            )));
        }

        serde_json::from_value(record.data().clone()).map_err(|error| {
            AppError::Validation(format!(
                "order '{}' has an invalid payload: {error}",
                record.id()
            ))
        })
    }

    /// Returns the order id.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the product lines.
    #[must_use]
    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    /// Returns the client the order was placed for.
    #[must_use]
    pub fn client(&self) -> &OrderClient {
        &self.client
    }

    /// Returns the seller id.
    #[must_use]
    pub fn seller(&self) -> &str {
        self.seller.as_str()
    }

    /// Returns the order total.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Returns the fulfilment state.
    #[must_use]
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Returns the number of units across all lines, saturating at `u32::MAX`.
    #[must_use]
    pub fn unit_count(&self) -> u32 {
        self.lines
            .iter()
            .map(OrderLine::quantity)
            .fold(0u32, u32::saturating_add)
    }
}
