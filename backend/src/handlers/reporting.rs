//! HTTP handlers for reporting endpoints

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::reporting::{MonthlySummary, ReportingService};
use crate::AppState;
use shared::DateRange;

/// Query parameters for the monthly summary
#[derive(Debug, Deserialize)]
pub struct MonthlySummaryQuery {
    pub year: i32,
    pub month: u32,
}

/// Monthly activity summary
pub async fn get_monthly_summary(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<MonthlySummaryQuery>,
) -> AppResult<Json<MonthlySummary>> {
    let service = ReportingService::new(state.db);
    let summary = service.monthly_summary(query.year, query.month).await?;
    Ok(Json(summary))
}

/// Query parameters for the register export
#[derive(Debug, Deserialize)]
pub struct RegisterExportQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Export the inspection register for a date range as CSV
pub async fn export_inspection_register(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<RegisterExportQuery>,
) -> AppResult<impl IntoResponse> {
    let service = ReportingService::new(state.db);
    let csv = service
        .export_inspection_register(&DateRange {
            start: query.start,
            end: query.end,
        })
        .await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"inspection-register.csv\"",
            ),
        ],
        csv,
    ))
}
