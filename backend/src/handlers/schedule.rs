//! HTTP handlers for the prioritized dispatch schedule

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::prioritization::{PrioritizedInspection, ScheduleService};
use crate::AppState;

/// Query parameters for the dispatch schedule
#[derive(Debug, Deserialize)]
pub struct ScheduleQuery {
    /// Defaults to today
    pub date: Option<NaiveDate>,
}

/// Pending inspections due on or before the date, most urgent first
pub async fn get_prioritized_schedule(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<ScheduleQuery>,
) -> AppResult<Json<Vec<PrioritizedInspection>>> {
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let service = ScheduleService::new(state.db);
    let schedule = service.prioritize(date).await?;
    Ok(Json(schedule))
}
