//! Reporting service for monthly summaries and register export

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use shared::DateRange;

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    db: PgPool,
}

/// Inspection counts for a period
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct InspectionCounts {
    pub total: i64,
    pub pending: i64,
    pub in_progress: i64,
    pub completed: i64,
    pub cancelled: i64,
    pub average_score: Option<Decimal>,
}

/// Violation counts by severity for a period
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ViolationCounts {
    pub minor: i64,
    pub major: i64,
    pub critical: i64,
}

/// Monthly activity summary
#[derive(Debug, Serialize)]
pub struct MonthlySummary {
    pub year: i32,
    pub month: u32,
    pub inspections: InspectionCounts,
    pub violations: ViolationCounts,
    pub certificates_issued: i64,
}

/// Row of the exported inspection register
#[derive(Debug, sqlx::FromRow)]
struct RegisterRow {
    reference_number: String,
    establishment_reference: String,
    establishment_name: String,
    inspection_type: String,
    scheduled_date: NaiveDate,
    status: String,
    score_percentage: Option<Decimal>,
    overall_rating: Option<String>,
}

impl ReportingService {
    /// Create a new ReportingService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Activity summary for the inspections scheduled in a calendar month
    pub async fn monthly_summary(&self, year: i32, month: u32) -> AppResult<MonthlySummary> {
        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| AppError::Validation {
            field: "month".to_string(),
            message: format!("{}-{} is not a valid calendar month", year, month),
            message_th: "เดือนไม่ถูกต้อง".to_string(),
        })?;
        let end = start
            .checked_add_months(Months::new(1))
            .ok_or_else(|| AppError::Internal("Month arithmetic overflow".to_string()))?;

        let inspections = sqlx::query_as::<_, InspectionCounts>(
            r#"
            SELECT COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE status = 'pending') AS pending,
                   COUNT(*) FILTER (WHERE status = 'in_progress') AS in_progress,
                   COUNT(*) FILTER (WHERE status = 'completed') AS completed,
                   COUNT(*) FILTER (WHERE status = 'cancelled') AS cancelled,
                   AVG(score_percentage) FILTER (WHERE status = 'completed') AS average_score
            FROM inspections
            WHERE scheduled_date >= $1 AND scheduled_date < $2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.db)
        .await?;

        let violations = sqlx::query_as::<_, ViolationCounts>(
            r#"
            SELECT COUNT(*) FILTER (WHERE severity = 'minor') AS minor,
                   COUNT(*) FILTER (WHERE severity = 'major') AS major,
                   COUNT(*) FILTER (WHERE severity = 'critical') AS critical
            FROM violations
            WHERE created_at::date >= $1 AND created_at::date < $2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.db)
        .await?;

        let certificates_issued: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM certificates WHERE issue_date >= $1 AND issue_date < $2",
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.db)
        .await?;

        Ok(MonthlySummary {
            year,
            month,
            inspections,
            violations,
            certificates_issued,
        })
    }

    /// Export the inspection register for a date range as CSV
    pub async fn export_inspection_register(&self, range: &DateRange) -> AppResult<Vec<u8>> {
        if range.end < range.start {
            return Err(AppError::Validation {
                field: "end".to_string(),
                message: "End date must not precede start date".to_string(),
                message_th: "วันสิ้นสุดต้องไม่อยู่ก่อนวันเริ่มต้น".to_string(),
            });
        }

        let rows = sqlx::query_as::<_, RegisterRow>(
            r#"
            SELECT i.reference_number,
                   e.reference_number AS establishment_reference,
                   e.name AS establishment_name,
                   i.inspection_type, i.scheduled_date, i.status,
                   i.score_percentage, i.overall_rating
            FROM inspections i
            JOIN establishments e ON e.id = i.establishment_id
            WHERE i.scheduled_date BETWEEN $1 AND $2
            ORDER BY i.scheduled_date ASC, i.reference_number ASC
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.db)
        .await?;

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record([
                "reference_number",
                "establishment_reference",
                "establishment_name",
                "inspection_type",
                "scheduled_date",
                "status",
                "score_percentage",
                "overall_rating",
            ])
            .map_err(|e| AppError::Internal(e.to_string()))?;

        for row in rows {
            writer
                .write_record([
                    row.reference_number.as_str(),
                    row.establishment_reference.as_str(),
                    row.establishment_name.as_str(),
                    row.inspection_type.as_str(),
                    &row.scheduled_date.to_string(),
                    row.status.as_str(),
                    &row
                        .score_percentage
                        .map(|s| s.to_string())
                        .unwrap_or_default(),
                    row.overall_rating.as_deref().unwrap_or(""),
                ])
                .map_err(|e| AppError::Internal(e.to_string()))?;
        }

        writer
            .into_inner()
            .map_err(|e| AppError::Internal(e.to_string()))
    }
}
