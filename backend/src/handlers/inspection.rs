//! HTTP handlers for inspection lifecycle endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::inspection::{
    CompleteInspectionInput, CompletedInspection, InspectionDetail, InspectionFilter,
    InspectionService, ResponseInput, ScheduleInspectionInput,
};
use crate::AppState;
use shared::{ChecklistResponse, Inspection};

/// Schedule a new inspection
pub async fn schedule_inspection(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<ScheduleInspectionInput>,
) -> AppResult<Json<Inspection>> {
    let service = InspectionService::new(state.db, state.events.clone());
    let inspection = service.schedule(input, current_user.0.user_id).await?;
    Ok(Json(inspection))
}

/// List inspections with optional filters
pub async fn list_inspections(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(filter): Query<InspectionFilter>,
) -> AppResult<Json<Vec<Inspection>>> {
    let service = InspectionService::new(state.db, state.events.clone());
    let inspections = service.list(&filter).await?;
    Ok(Json(inspections))
}

/// Get an inspection with its recorded responses
pub async fn get_inspection(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(inspection_id): Path<Uuid>,
) -> AppResult<Json<InspectionDetail>> {
    let service = InspectionService::new(state.db, state.events.clone());
    let detail = service.get_detail(inspection_id).await?;
    Ok(Json(detail))
}

/// Start an inspection (pending -> in_progress)
pub async fn start_inspection(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(inspection_id): Path<Uuid>,
) -> AppResult<Json<Inspection>> {
    let service = InspectionService::new(state.db, state.events.clone());
    let inspection = service.start(inspection_id).await?;
    Ok(Json(inspection))
}

/// Record or overwrite checklist responses
pub async fn record_inspection_responses(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(inspection_id): Path<Uuid>,
    Json(responses): Json<Vec<ResponseInput>>,
) -> AppResult<Json<Vec<ChecklistResponse>>> {
    let service = InspectionService::new(state.db, state.events.clone());
    let stored = service.record_responses(inspection_id, responses).await?;
    Ok(Json(stored))
}

/// Complete an inspection (in_progress -> completed), triggering scoring
pub async fn complete_inspection(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(inspection_id): Path<Uuid>,
    Json(input): Json<CompleteInspectionInput>,
) -> AppResult<Json<CompletedInspection>> {
    let service = InspectionService::new(state.db, state.events.clone());
    let completed = service.complete(inspection_id, input).await?;
    Ok(Json(completed))
}

/// Cancel an inspection (pending/in_progress -> cancelled)
pub async fn cancel_inspection(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(inspection_id): Path<Uuid>,
) -> AppResult<Json<Inspection>> {
    let service = InspectionService::new(state.db, state.events.clone());
    let inspection = service.cancel(inspection_id).await?;
    Ok(Json(inspection))
}
