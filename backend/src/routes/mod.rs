//! Route definitions for the Health & Sanitation Inspection Platform

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Public certificate verification (for numbers printed on premises)
        .route(
            "/certificates/verify/:certificate_number",
            get(handlers::verify_certificate),
        )
        // Protected routes - establishment registry
        .nest("/establishments", establishment_routes())
        // Protected routes - checklist templates
        .nest("/checklist-templates", checklist_routes())
        // Protected routes - inspection lifecycle
        .nest("/inspections", inspection_routes())
        // Protected routes - violation tracking
        .nest("/violations", violation_routes())
        // Protected routes - certificate lifecycle
        .nest("/certificates", certificate_routes())
        // Protected routes - dispatch schedule
        .nest("/schedule", schedule_routes())
        // Protected routes - reporting
        .nest("/reports", reporting_routes())
}

/// Establishment registry routes (protected)
fn establishment_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_establishments).post(handlers::register_establishment),
        )
        .route(
            "/:establishment_id",
            get(handlers::get_establishment).put(handlers::update_establishment),
        )
        .route(
            "/:establishment_id/reassess-risk",
            post(handlers::reassess_establishment_risk),
        )
        .route(
            "/:establishment_id/suspend",
            post(handlers::suspend_establishment),
        )
        .route(
            "/:establishment_id/reinstate",
            post(handlers::reinstate_establishment),
        )
        .route(
            "/:establishment_id/violations",
            get(handlers::get_establishment_violations),
        )
        .route(
            "/:establishment_id/certificates",
            get(handlers::get_establishment_certificates),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Checklist template routes (protected)
fn checklist_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_checklist_templates).post(handlers::create_checklist_template),
        )
        .route("/:template_id", get(handlers::get_checklist_template))
        .route(
            "/:template_id/revise",
            post(handlers::revise_checklist_template),
        )
        .route(
            "/:template_id/archive",
            post(handlers::archive_checklist_template),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Inspection lifecycle routes (protected)
fn inspection_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_inspections).post(handlers::schedule_inspection),
        )
        .route("/:inspection_id", get(handlers::get_inspection))
        .route("/:inspection_id/start", post(handlers::start_inspection))
        .route(
            "/:inspection_id/responses",
            put(handlers::record_inspection_responses),
        )
        .route(
            "/:inspection_id/complete",
            post(handlers::complete_inspection),
        )
        .route("/:inspection_id/cancel", post(handlers::cancel_inspection))
        .route(
            "/:inspection_id/violations",
            get(handlers::get_inspection_violations),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Violation tracking routes (protected)
fn violation_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::report_violation))
        .route(
            "/:violation_id/corrective-action",
            post(handlers::begin_corrective_action),
        )
        .route("/:violation_id/resolve", post(handlers::resolve_violation))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Certificate lifecycle routes (protected)
fn certificate_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::issue_certificate))
        .route(
            "/:certificate_id/revoke",
            post(handlers::revoke_certificate),
        )
        .route(
            "/:certificate_id/suspend",
            post(handlers::suspend_certificate),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Dispatch schedule routes (protected)
fn schedule_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_prioritized_schedule))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Reporting routes (protected)
fn reporting_routes() -> Router<AppState> {
    Router::new()
        .route("/monthly-summary", get(handlers::get_monthly_summary))
        .route(
            "/inspection-register",
            get(handlers::export_inspection_register),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}
