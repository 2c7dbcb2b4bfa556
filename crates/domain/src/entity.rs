use std::fmt::{Display, Formatter};
use std::str::FromStr;

use salesdesk_core::AppError;
use serde::{Deserialize, Serialize};

/// Record types handled by the data-entry screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Seller account.
    User,
    /// Customer owned by a seller.
    Client,
    /// Sellable product with stock.
    Product,
    /// Order placed for a client. Read-only in this application.
    Order,
}

impl EntityKind {
    /// Returns stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Client => "client",
            Self::Product => "product",
            Self::Order => "order",
        }
    }

    /// Returns the mutation that creates a record of this kind, if any.
    #[must_use]
    pub fn create_operation(&self) -> Option<MutationOperation> {
        match self {
            Self::User => Some(MutationOperation::CreateUser),
            Self::Client => Some(MutationOperation::CreateClient),
            Self::Product => Some(MutationOperation::CreateProduct),
            Self::Order => None,
        }
    }

    /// Returns the list query backing this kind's list view, if it has one.
    #[must_use]
    pub fn list_query(&self) -> Option<ListQuery> {
        match self {
            Self::User => None,
            Self::Client => Some(ListQuery::ClientsBySeller),
            Self::Product => Some(ListQuery::Products),
            Self::Order => Some(ListQuery::OrdersBySeller),
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "user" => Ok(Self::User),
            "client" => Ok(Self::Client),
            "product" => Ok(Self::Product),
            "order" => Ok(Self::Order),
            _ => Err(AppError::Validation(format!(
                "unknown entity kind '{value}'"
            ))),
        }
    }
}

/// Create mutations exposed by the remote data service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MutationOperation {
    /// Registers a new seller account.
    CreateUser,
    /// Creates a client for the current seller.
    CreateClient,
    /// Creates a product.
    CreateProduct,
}

impl MutationOperation {
    /// Returns the operation name sent to the remote side.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateUser => "create-user",
            Self::CreateClient => "create-client",
            Self::CreateProduct => "create-product",
        }
    }

    /// Returns the entity kind the mutation creates.
    #[must_use]
    pub fn entity(&self) -> EntityKind {
        match self {
            Self::CreateUser => EntityKind::User,
            Self::CreateClient => EntityKind::Client,
            Self::CreateProduct => EntityKind::Product,
        }
    }

    /// Returns the cached list a confirmed result must be merged into.
    #[must_use]
    pub fn merges_into(&self) -> Option<ListQuery> {
        match self {
            Self::CreateUser => None,
            Self::CreateClient => Some(ListQuery::ClientsBySeller),
            Self::CreateProduct => Some(ListQuery::Products),
        }
    }
}

impl Display for MutationOperation {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// List queries whose results are held in the client-side cache.
///
/// Each query doubles as the cache key of its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ListQuery {
    /// Clients owned by the signed-in seller.
    ClientsBySeller,
    /// Every product.
    Products,
    /// Orders placed by the signed-in seller.
    OrdersBySeller,
}

impl ListQuery {
    /// Returns the query name sent to the remote side.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClientsBySeller => "clients-by-seller",
            Self::Products => "products",
            Self::OrdersBySeller => "orders-by-seller",
        }
    }

    /// Returns the entity kind listed by the query.
    #[must_use]
    pub fn entity(&self) -> EntityKind {
        match self {
            Self::ClientsBySeller => EntityKind::Client,
            Self::Products => EntityKind::Product,
            Self::OrdersBySeller => EntityKind::Order,
        }
    }
}

impl Display for ListQuery {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Views a screen can navigate to after a successful submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NavigationTarget {
    /// Sign-in view.
    Login,
    /// Seller's client list.
    ClientList,
    /// Product list.
    ProductList,
}

impl NavigationTarget {
    /// Returns the route path of the view.
    #[must_use]
    pub fn path(&self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::ClientList => "/",
            Self::ProductList => "/products",
        }
    }
}

impl Display for NavigationTarget {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.path())
    }
}
