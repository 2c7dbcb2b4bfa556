//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_list_cache_store;
mod in_memory_remote_data_service;
mod tracing_navigator;

pub use in_memory_list_cache_store::InMemoryListCacheStore;
pub use in_memory_remote_data_service::InMemoryRemoteDataService;
pub use tracing_navigator::{NavigatorEvent, TracingNavigator};
