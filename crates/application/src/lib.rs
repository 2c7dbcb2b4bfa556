//! Application services and ports.

#![forbid(unsafe_code)]

mod data_service_ports;
mod form_session;
mod list_cache_updater;
mod list_query_service;
mod order_board;
mod submission_controller;
mod transient_notifier;

#[cfg(test)]
mod test_support;

pub use data_service_ports::{ListCacheStore, ListUpdate, Navigator, RemoteDataService};
pub use form_session::FormSession;
pub use list_cache_updater::{ListCacheUpdater, dedupe_by_id, merge};
pub use list_query_service::ListQueryService;
pub use order_board::OrderBoard;
pub use submission_controller::{
    DEFAULT_NOTICE_DELAY_MS, SubmissionConfig, SubmissionController, SubmissionState,
    SubmitOutcome, SuccessEffect,
};
pub use transient_notifier::{ExpiryAction, NoticeEvent, TransientMessage, TransientNotifier};
