//! Salesdesk console runtime.
//!
//! Drives the data-entry screens against in-memory adapters with a fixed
//! script and logs what a user would see.

#![forbid(unsafe_code)]

use std::env;
use std::sync::Arc;
use std::time::Duration;

use salesdesk_application::{
    DEFAULT_NOTICE_DELAY_MS, FormSession, ListQueryService, NoticeEvent, OrderBoard,
    SubmissionConfig, SubmissionController, SubmitOutcome,
};
use salesdesk_core::{AppError, AppResult};
use salesdesk_domain::{EntityKind, FieldInput, ListQuery};
use salesdesk_infrastructure::{
    InMemoryListCacheStore, InMemoryRemoteDataService, TracingNavigator,
};
use serde_json::json;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const TIMER_SLACK: Duration = Duration::from_millis(50);

#[derive(Debug, Clone)]
struct ConsoleConfig {
    notice_delay_ms: u64,
    seed_products: bool,
}

struct Runtime {
    remote: Arc<InMemoryRemoteDataService>,
    cache: Arc<InMemoryListCacheStore>,
    navigator: Arc<TracingNavigator>,
    lists: ListQueryService,
    submission: SubmissionConfig,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ConsoleConfig::load()?;
    let runtime = Runtime::build(&config)?;

    info!(
        notice_delay_ms = config.notice_delay_ms,
        seed_products = config.seed_products,
        "salesdesk-console started"
    );

    if config.seed_products {
        seed_products(&runtime.remote).await?;
    }
    let products = runtime.lists.load(ListQuery::Products).await?;
    info!(count = products.len(), "product list loaded");

    run_product_session(&runtime).await?;
    run_client_session(&runtime).await?;
    run_duplicate_user_session(&runtime).await?;
    show_orders(&runtime).await?;
    log_product_cache(&runtime).await?;

    info!(events = runtime.navigator.events().len(), "salesdesk-console finished");
    Ok(())
}

impl ConsoleConfig {
    fn load() -> AppResult<Self> {
        let notice_delay_ms = parse_env_u64("SALESDESK_NOTICE_DELAY_MS", DEFAULT_NOTICE_DELAY_MS)?;
        let seed_products = parse_env_bool("SALESDESK_SEED_PRODUCTS", true)?;

        if notice_delay_ms == 0 {
            return Err(AppError::Validation(
                "SALESDESK_NOTICE_DELAY_MS must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            notice_delay_ms,
            seed_products,
        })
    }
}

impl Runtime {
    fn build(config: &ConsoleConfig) -> AppResult<Self> {
        let remote = Arc::new(InMemoryRemoteDataService::new());
        let cache = Arc::new(InMemoryListCacheStore::new());
        let navigator = Arc::new(TracingNavigator::new());
        let lists = ListQueryService::new(remote.clone(), cache.clone());
        let submission = SubmissionConfig::new(Duration::from_millis(config.notice_delay_ms))?;

        Ok(Self {
            remote,
            cache,
            navigator,
            lists,
            submission,
        })
    }

    fn controller(&self) -> SubmissionController {
        let controller = SubmissionController::new(
            self.remote.clone(),
            self.cache.clone(),
            self.navigator.clone(),
            self.submission,
        );
        spawn_notice_logger(&controller);
        controller
    }

    async fn wait_for_timers(&self) {
        tokio::time::sleep(self.submission.notice_delay() + TIMER_SLACK).await;
    }
}

async fn seed_products(remote: &InMemoryRemoteDataService) -> AppResult<()> {
    for payload in [
        json!({"id": "p-100", "name": "Office chair", "stock": 8, "price": 89.0}),
        json!({"id": "p-101", "name": "Monitor arm", "stock": 20, "price": 45.5}),
    ] {
        remote.seed(EntityKind::Product, payload).await?;
    }
    Ok(())
}

async fn run_product_session(runtime: &Runtime) -> AppResult<()> {
    let controller = runtime.controller();
    let mut session = FormSession::new(EntityKind::Product)?;
    fill(
        &mut session,
        &[
            ("name", FieldInput::from("Standing desk")),
            ("stock", FieldInput::from(12)),
            ("price", FieldInput::from(349.9)),
        ],
    )?;

    let outcome = controller.submit(&session).await;
    log_outcome("product", &outcome, &controller);

    runtime.wait_for_timers().await;
    info!(
        state = controller.state().as_str(),
        screen = runtime.navigator.current().map(|target| target.path()),
        "product session settled"
    );
    Ok(())
}

async fn run_client_session(runtime: &Runtime) -> AppResult<()> {
    let controller = runtime.controller();
    let mut session = FormSession::new(EntityKind::Client)?;
    fill(
        &mut session,
        &[
            ("name", FieldInput::from("Luis")),
            ("lastName", FieldInput::from("Paz")),
            ("email", FieldInput::from("luis@acme.test")),
        ],
    )?;
    session.mark_all_touched();

    for error in session.visible_errors() {
        warn!(field = error.field(), message = error.message(), "field error shown");
    }

    let outcome = controller.submit(&session).await;
    log_outcome("client", &outcome, &controller);
    Ok(())
}

async fn run_duplicate_user_session(runtime: &Runtime) -> AppResult<()> {
    runtime
        .remote
        .seed(
            EntityKind::User,
            json!({"id": "u-1", "name": "Ana", "lastName": "Ruiz", "email": "ana@example.com"}),
        )
        .await?;

    let controller = runtime.controller();
    let mut session = FormSession::new(EntityKind::User)?;
    fill(
        &mut session,
        &[
            ("name", FieldInput::from("Ana")),
            ("lastName", FieldInput::from("Ruiz")),
            ("email", FieldInput::from("ana@example.com")),
            ("password", FieldInput::from("secret1")),
        ],
    )?;

    let outcome = controller.submit(&session).await;
    log_outcome("user", &outcome, &controller);

    runtime.wait_for_timers().await;
    info!(
        state = controller.state().as_str(),
        message = controller.message(),
        "user session settled"
    );
    Ok(())
}

async fn show_orders(runtime: &Runtime) -> AppResult<()> {
    let orders = OrderBoard::new(runtime.lists.clone()).list_orders().await?;
    if orders.is_empty() {
        info!("no orders yet");
    }
    for order in &orders {
        info!(
            id = order.id(),
            client = %order.client().full_name(),
            status = order.status().as_str(),
            units = order.unit_count(),
            total = order.total(),
            "order"
        );
    }
    Ok(())
}

async fn log_product_cache(runtime: &Runtime) -> AppResult<()> {
    let cached = runtime.lists.load(ListQuery::Products).await?;
    for product in &cached {
        info!(
            id = %product.id(),
            payload = %product.data(),
            "cached product"
        );
    }
    Ok(())
}

fn fill(session: &mut FormSession, values: &[(&str, FieldInput)]) -> AppResult<()> {
    for (field, value) in values {
        session.set_value(field, value.clone())?;
    }
    Ok(())
}

fn log_outcome(screen: &str, outcome: &SubmitOutcome, controller: &SubmissionController) {
    match outcome {
        SubmitOutcome::Invalid(errors) => {
            warn!(screen, invalid_fields = errors.len(), "submit blocked")
        }
        SubmitOutcome::Ignored(state) => {
            warn!(screen, state = state.as_str(), "submit ignored")
        }
        SubmitOutcome::Succeeded(confirmed) => info!(
            screen,
            id = %confirmed.id(),
            message = controller.message(),
            "submit succeeded"
        ),
        SubmitOutcome::Failed(error) => warn!(
            screen,
            error = %error,
            message = controller.message(),
            "submit failed"
        ),
    }
}

fn spawn_notice_logger(controller: &SubmissionController) {
    let mut notices = controller.subscribe_notices();
    tokio::spawn(async move {
        loop {
            match notices.recv().await {
                Ok(NoticeEvent::Shown(text)) => info!(text = %text, "notice shown"),
                Ok(NoticeEvent::Cleared) => info!("notice cleared"),
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "notice log lagged"),
                Err(RecvError::Closed) => break,
            }
        }
    });
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn parse_env_u64(name: &str, default: u64) -> AppResult<u64> {
    match env::var(name) {
        Ok(value) => value.parse::<u64>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        Err(_) => Ok(default),
    }
}

fn parse_env_bool(name: &str, default: bool) -> AppResult<bool> {
    match env::var(name) {
        Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(AppError::Validation(format!(
                "invalid {name} value '{value}': expected a boolean"
            ))),
        },
        Err(_) => Ok(default),
    }
}
