//! HTTP handlers for violation tracking endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::violation::{ReportViolationInput, ResolveViolationInput, ViolationService};
use crate::AppState;
use shared::Violation;

/// Report a violation against an inspection
pub async fn report_violation(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<ReportViolationInput>,
) -> AppResult<Json<Violation>> {
    let service = ViolationService::new(
        state.db,
        state.events.clone(),
        state.compliance_rule.clone(),
    );
    let violation = service.report(input, current_user.0.user_id).await?;
    Ok(Json(violation))
}

/// Mark corrective action as underway (open -> in_progress)
pub async fn begin_corrective_action(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(violation_id): Path<Uuid>,
) -> AppResult<Json<Violation>> {
    let service = ViolationService::new(
        state.db,
        state.events.clone(),
        state.compliance_rule.clone(),
    );
    let violation = service.begin_corrective_action(violation_id).await?;
    Ok(Json(violation))
}

/// Resolve a violation (open/in_progress -> resolved)
pub async fn resolve_violation(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(violation_id): Path<Uuid>,
    Json(input): Json<ResolveViolationInput>,
) -> AppResult<Json<Violation>> {
    let service = ViolationService::new(
        state.db,
        state.events.clone(),
        state.compliance_rule.clone(),
    );
    let violation = service
        .resolve(violation_id, current_user.0.user_id, input)
        .await?;
    Ok(Json(violation))
}

/// List violations recorded against an inspection
pub async fn get_inspection_violations(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(inspection_id): Path<Uuid>,
) -> AppResult<Json<Vec<Violation>>> {
    let service = ViolationService::new(
        state.db,
        state.events.clone(),
        state.compliance_rule.clone(),
    );
    let violations = service.list_for_inspection(inspection_id).await?;
    Ok(Json(violations))
}
