//! Dispatch prioritization service
//!
//! Read-only: orders the day's pending inspections (including overdue
//! ones) for dispatch. The fetch is insertion-ordered and the sort is
//! stable, so two equally urgent inspections never swap places between
//! calls.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;
use shared::{
    urgency_rank, ComplianceStatus, InspectionPriority, InspectionType, RiskCategory,
};

/// Schedule service producing the prioritized dispatch list
#[derive(Clone)]
pub struct ScheduleService {
    db: PgPool,
}

/// Database row for a dispatch candidate
#[derive(Debug, sqlx::FromRow)]
struct DispatchRow {
    id: Uuid,
    reference_number: String,
    establishment_id: Uuid,
    establishment_name: String,
    risk_category: RiskCategory,
    compliance_status: ComplianceStatus,
    inspection_type: InspectionType,
    priority: InspectionPriority,
    scheduled_date: NaiveDate,
}

/// Pending inspection with its computed urgency rank
#[derive(Debug, Clone, Serialize)]
pub struct PrioritizedInspection {
    pub inspection_id: Uuid,
    pub reference_number: String,
    pub establishment_id: Uuid,
    pub establishment_name: String,
    pub risk_category: RiskCategory,
    pub compliance_status: ComplianceStatus,
    pub inspection_type: InspectionType,
    pub priority: InspectionPriority,
    pub scheduled_date: NaiveDate,
    pub urgency_rank: u8,
}

impl ScheduleService {
    /// Create a new ScheduleService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Pending inspections due on or before `date`, most urgent first.
    /// Ties break by scheduled date, then insertion order.
    pub async fn prioritize(&self, date: NaiveDate) -> AppResult<Vec<PrioritizedInspection>> {
        let rows = sqlx::query_as::<_, DispatchRow>(
            r#"
            SELECT i.id, i.reference_number, i.establishment_id,
                   e.name AS establishment_name, e.risk_category, e.compliance_status,
                   i.inspection_type, i.priority, i.scheduled_date
            FROM inspections i
            JOIN establishments e ON e.id = i.establishment_id
            WHERE i.status = 'pending' AND i.scheduled_date <= $1
            ORDER BY i.created_at ASC
            "#,
        )
        .bind(date)
        .fetch_all(&self.db)
        .await?;

        let mut prioritized: Vec<PrioritizedInspection> = rows
            .into_iter()
            .map(|row| {
                let rank = urgency_rank(row.risk_category, row.priority, row.compliance_status);
                PrioritizedInspection {
                    inspection_id: row.id,
                    reference_number: row.reference_number,
                    establishment_id: row.establishment_id,
                    establishment_name: row.establishment_name,
                    risk_category: row.risk_category,
                    compliance_status: row.compliance_status,
                    inspection_type: row.inspection_type,
                    priority: row.priority,
                    scheduled_date: row.scheduled_date,
                    urgency_rank: rank,
                }
            })
            .collect();

        // Stable sort over the insertion-ordered fetch
        prioritized.sort_by_key(|p| (p.urgency_rank, p.scheduled_date));

        Ok(prioritized)
    }
}
