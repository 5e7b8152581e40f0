//! # Server Configuration
//!
//! Router assembly, shared state and the listener loop for the Shiftboard API.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderValue,
    middleware::{self, Next},
    response::Response,
    routing::{get, patch, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::MockUserDirectory;
use crate::billing::{BillingGateway, MockBillingGateway};
use crate::clock::Clock;
use crate::config::AppConfig;
use crate::handlers;
use crate::repositories::{InMemoryRepository, RecordRepository, Records};
use crate::service::ShiftboardService;
use crate::telemetry::{TRACE_ID_HEADER, TraceContext, with_trace_context};

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub service: Arc<ShiftboardService>,
    pub billing: Arc<dyn BillingGateway>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Wires the in-memory repository and the mock providers from `config`.
    pub fn build(
        config: AppConfig,
        clock: Arc<dyn Clock>,
        records: Records,
    ) -> anyhow::Result<Self> {
        let repository: Arc<dyn RecordRepository> = Arc::new(InMemoryRepository::with_records(
            config.repository_config(),
            Arc::clone(&clock),
            records,
        ));
        let directory = Arc::new(MockUserDirectory::new(
            Arc::clone(&repository),
            config.dev_user_id,
            config.auth_publishable_key.as_deref(),
        ));
        let portal_url = config
            .billing_portal_url()
            .context("billing portal url is invalid")?;
        let billing = Arc::new(MockBillingGateway::new(
            portal_url,
            config.billing_publishable_key.as_deref(),
            config.simulated_latency,
        ));

        Ok(Self {
            config: Arc::new(config),
            service: Arc::new(ShiftboardService::new(repository, directory)),
            billing,
            clock,
        })
    }
}

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.config)
    }
}

/// Creates and configures the Axum application router
pub fn create_app(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http().make_span_with(|request: &Request| {
        tracing::info_span!(
            "http.request",
            method = %request.method(),
            uri = %request.uri(),
            version = ?request.version()
        )
    });

    Router::new()
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        .route("/api/schedule", get(handlers::schedule::get_schedule))
        .route("/api/shifts", post(handlers::shifts::add_shift))
        .route("/api/shifts/publish", post(handlers::shifts::publish_shifts))
        .route("/api/company", get(handlers::company::get_company_data))
        .route(
            "/api/company/{id}",
            get(handlers::company::get_company_info).patch(handlers::company::update_company_info),
        )
        .route(
            "/api/users/{id}",
            get(handlers::users::get_user_profile).patch(handlers::users::update_user_profile),
        )
        .route("/api/team", get(handlers::team::get_managed_team))
        .route("/api/job-roles", post(handlers::job_roles::add_job_role))
        .route(
            "/api/job-roles/{id}",
            patch(handlers::job_roles::edit_job_role).delete(handlers::job_roles::delete_job_role),
        )
        .route("/api/employees", post(handlers::employees::add_employee))
        .route("/api/employees/{id}", patch(handlers::employees::edit_employee))
        .route("/api/auth/session", get(handlers::auth::get_session))
        .route("/api/auth/sign-in", post(handlers::auth::sign_in))
        .route("/api/auth/sign-out", post(handlers::auth::sign_out))
        .route("/api/billing/checkout", post(handlers::billing::create_checkout_session))
        .route("/api/billing/portal", post(handlers::billing::customer_portal))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn(propagate_trace_id))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
}

/// Runs the request inside a [`TraceContext`] and echoes its id back.
async fn propagate_trace_id(request: Request, next: Next) -> Response {
    let context = TraceContext::from_header(
        request
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok()),
    );
    let trace_id = context.trace_id.clone();

    let mut response = with_trace_context(context, next.run(request)).await;
    if let Ok(value) = HeaderValue::from_str(&trace_id) {
        response.headers_mut().insert(TRACE_ID_HEADER, value);
    }
    response
}

/// Starts the server with the given state
pub async fn run_server(state: AppState) -> anyhow::Result<()> {
    let addr = state
        .config
        .bind_addr()
        .context("invalid server address")?;
    let profile = state.config.profile.clone();
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, %profile, "Server listening");

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::healthz,
        crate::handlers::schedule::get_schedule,
        crate::handlers::shifts::add_shift,
        crate::handlers::shifts::publish_shifts,
        crate::handlers::company::get_company_data,
        crate::handlers::company::get_company_info,
        crate::handlers::company::update_company_info,
        crate::handlers::users::get_user_profile,
        crate::handlers::users::update_user_profile,
        crate::handlers::team::get_managed_team,
        crate::handlers::job_roles::add_job_role,
        crate::handlers::job_roles::edit_job_role,
        crate::handlers::job_roles::delete_job_role,
        crate::handlers::employees::add_employee,
        crate::handlers::employees::edit_employee,
        crate::handlers::auth::get_session,
        crate::handlers::auth::sign_in,
        crate::handlers::auth::sign_out,
        crate::handlers::billing::create_checkout_session,
        crate::handlers::billing::customer_portal,
    ),
    components(
        schemas(
            crate::models::ServiceInfo,
            crate::models::Company,
            crate::models::CompanyPatch,
            crate::models::Employee,
            crate::models::EmployeeDraft,
            crate::models::EmployeePatch,
            crate::models::ProfileUpdate,
            crate::models::PermissionRole,
            crate::models::Location,
            crate::models::JobRole,
            crate::models::NewJobRole,
            crate::models::JobRolePatch,
            crate::models::Department,
            crate::models::Shift,
            crate::models::NewShift,
            crate::models::ShiftStatus,
            crate::models::PublishOutcome,
            crate::schedule::FilterOptions,
            crate::schedule::ScheduleGrid,
            crate::schedule::ScheduleRow,
            crate::schedule::PublishReadiness,
            crate::service::ScheduleData,
            crate::service::StaffEntry,
            crate::service::CompanyData,
            crate::service::UserProfile,
            crate::service::TeamMember,
            crate::billing::CheckoutSession,
            crate::billing::PortalSession,
            crate::handlers::HealthResponse,
            crate::handlers::auth::SessionResponse,
            crate::handlers::billing::CheckoutRequest,
            crate::error::ApiError,
        )
    ),
    tags(
        (name = "root", description = "Service metadata"),
        (name = "schedule", description = "Weekly schedule and shifts"),
        (name = "company", description = "Company, staff and job roles"),
        (name = "users", description = "Profiles and the managed team"),
        (name = "auth", description = "Mock identity provider session"),
        (name = "billing", description = "Mock payment provider"),
    ),
    info(
        title = "Shiftboard API",
        description = "Employee scheduling back end",
        version = env!("CARGO_PKG_VERSION"),
    )
)]
pub struct ApiDoc;
