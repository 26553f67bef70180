//! HTTP handlers for checklist template endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::checklist::{
    ChecklistService, CreateTemplateInput, ReviseTemplateInput, TemplateWithItems,
};
use crate::AppState;
use shared::{ChecklistTemplate, InspectionType};

/// Create a new checklist template (version 1)
pub async fn create_checklist_template(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateTemplateInput>,
) -> AppResult<Json<TemplateWithItems>> {
    let service = ChecklistService::new(state.db);
    let template = service
        .create_template(input, current_user.0.user_id)
        .await?;
    Ok(Json(template))
}

/// Query parameters for listing templates
#[derive(Debug, Deserialize)]
pub struct ListTemplatesQuery {
    pub active_only: Option<bool>,
    pub inspection_type: Option<InspectionType>,
}

/// List checklist templates
pub async fn list_checklist_templates(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<ListTemplatesQuery>,
) -> AppResult<Json<Vec<ChecklistTemplate>>> {
    let service = ChecklistService::new(state.db);
    let templates = service
        .list_templates(query.active_only.unwrap_or(false), query.inspection_type)
        .await?;
    Ok(Json(templates))
}

/// Get a checklist template with its items
pub async fn get_checklist_template(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(template_id): Path<Uuid>,
) -> AppResult<Json<TemplateWithItems>> {
    let service = ChecklistService::new(state.db);
    let template = service.get_template(template_id).await?;
    Ok(Json(template))
}

/// Revise an active template into its next version
pub async fn revise_checklist_template(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(template_id): Path<Uuid>,
    Json(input): Json<ReviseTemplateInput>,
) -> AppResult<Json<TemplateWithItems>> {
    let service = ChecklistService::new(state.db);
    let template = service
        .revise_template(template_id, input, current_user.0.user_id)
        .await?;
    Ok(Json(template))
}

/// Archive a checklist template
pub async fn archive_checklist_template(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(template_id): Path<Uuid>,
) -> AppResult<Json<ChecklistTemplate>> {
    let service = ChecklistService::new(state.db);
    let template = service.archive_template(template_id).await?;
    Ok(Json(template))
}
