//! HTTP handlers for establishment registry endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::compliance::ComplianceService;
use crate::services::establishment::{
    EstablishmentFilter, EstablishmentService, RegisterEstablishmentInput, RiskReassessment,
    UpdateEstablishmentInput,
};
use crate::services::violation::ViolationService;
use crate::AppState;
use shared::{
    Certificate, ComplianceStatus, Establishment, PaginatedResponse, Pagination, RiskCategory,
    Violation,
};

/// Register a new establishment
pub async fn register_establishment(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<RegisterEstablishmentInput>,
) -> AppResult<Json<Establishment>> {
    let service = EstablishmentService::new(state.db);
    let establishment = service.register(input, current_user.0.user_id).await?;
    Ok(Json(establishment))
}

/// Query parameters for listing establishments
#[derive(Debug, Deserialize)]
pub struct ListEstablishmentsQuery {
    pub compliance_status: Option<ComplianceStatus>,
    pub risk_category: Option<RiskCategory>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// List establishments with optional filters
pub async fn list_establishments(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<ListEstablishmentsQuery>,
) -> AppResult<Json<PaginatedResponse<Establishment>>> {
    let service = EstablishmentService::new(state.db);
    let filter = EstablishmentFilter {
        compliance_status: query.compliance_status,
        risk_category: query.risk_category,
    };
    let default_pagination = Pagination::default();
    let pagination = Pagination {
        page: query.page.unwrap_or(default_pagination.page),
        per_page: query.per_page.unwrap_or(default_pagination.per_page),
    };
    let establishments = service.list(&filter, &pagination).await?;
    Ok(Json(establishments))
}

/// Get an establishment by ID
pub async fn get_establishment(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(establishment_id): Path<Uuid>,
) -> AppResult<Json<Establishment>> {
    let service = EstablishmentService::new(state.db);
    let establishment = service.get(establishment_id).await?;
    Ok(Json(establishment))
}

/// Update an establishment's descriptive fields
pub async fn update_establishment(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(establishment_id): Path<Uuid>,
    Json(input): Json<UpdateEstablishmentInput>,
) -> AppResult<Json<Establishment>> {
    let service = EstablishmentService::new(state.db);
    let establishment = service.update(establishment_id, input).await?;
    Ok(Json(establishment))
}

/// Re-run risk scoring over the establishment's history
pub async fn reassess_establishment_risk(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(establishment_id): Path<Uuid>,
) -> AppResult<Json<RiskReassessment>> {
    let service = EstablishmentService::new(state.db);
    let reassessment = service.reassess_risk(establishment_id).await?;
    Ok(Json(reassessment))
}

/// Place an administrative hold on an establishment
pub async fn suspend_establishment(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(establishment_id): Path<Uuid>,
) -> AppResult<Json<Establishment>> {
    let service = ComplianceService::new(state.db, state.compliance_rule.clone());
    let establishment = service.suspend(establishment_id).await?;
    Ok(Json(establishment))
}

/// Lift an administrative hold; status is recomputed from the rule
pub async fn reinstate_establishment(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(establishment_id): Path<Uuid>,
) -> AppResult<Json<Establishment>> {
    let service = ComplianceService::new(state.db, state.compliance_rule.clone());
    let establishment = service.reinstate(establishment_id).await?;
    Ok(Json(establishment))
}

/// Query parameters for listing an establishment's violations
#[derive(Debug, Deserialize)]
pub struct EstablishmentViolationsQuery {
    pub unresolved_only: Option<bool>,
}

/// List violations for an establishment
pub async fn get_establishment_violations(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(establishment_id): Path<Uuid>,
    Query(query): Query<EstablishmentViolationsQuery>,
) -> AppResult<Json<Vec<Violation>>> {
    let service = ViolationService::new(
        state.db,
        state.events.clone(),
        state.compliance_rule.clone(),
    );
    let violations = service
        .list_for_establishment(establishment_id, query.unresolved_only.unwrap_or(false))
        .await?;
    Ok(Json(violations))
}

/// List certificates issued to an establishment
pub async fn get_establishment_certificates(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(establishment_id): Path<Uuid>,
) -> AppResult<Json<Vec<Certificate>>> {
    let service = crate::services::certificate::CertificateService::new(
        state.db,
        state.events.clone(),
        state.compliance_rule.clone(),
    );
    let certificates = service.list_for_establishment(establishment_id).await?;
    Ok(Json(certificates))
}
