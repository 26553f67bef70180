//! Inspection lifecycle service
//!
//! Owns the pending -> in_progress -> completed/cancelled state machine.
//! Every transition is a conditional UPDATE inside a transaction: a caller
//! losing a race observes zero affected rows and gets an InvalidTransition
//! with the state it lost to. Completed and cancelled are terminal.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::HashSet;
use uuid::Uuid;

use crate::error::{is_unique_violation, AppError, AppResult};
use crate::events::{EventDispatcher, INSPECTION_COMPLETED};
use crate::services::sequence::{self, MAX_ALLOCATION_ATTEMPTS};
use shared::{
    score_responses, ChecklistItem, ChecklistResponse, ChecklistScore, Inspection,
    InspectionPriority, InspectionRating, InspectionStatus, InspectionType, ResponseValue,
    SequenceScope,
};

const INSPECTION_COLUMNS: &str = "id, reference_number, establishment_id, checklist_template_id, \
     inspection_type, inspector_id, scheduled_date, priority, status, actual_start_datetime, \
     actual_end_datetime, score_percentage, overall_rating, inspector_notes, created_by, \
     created_at, updated_at";

const RESPONSE_COLUMNS: &str =
    "id, inspection_id, checklist_item_id, response, notes, evidence_url, created_at, updated_at";

/// Inspection service owning the lifecycle state machine
#[derive(Clone)]
pub struct InspectionService {
    db: PgPool,
    events: EventDispatcher,
}

/// Input for scheduling an inspection
#[derive(Debug, Deserialize)]
pub struct ScheduleInspectionInput {
    pub establishment_id: Uuid,
    pub inspection_type: InspectionType,
    pub scheduled_date: NaiveDate,
    pub priority: Option<InspectionPriority>,
    pub inspector_id: Option<Uuid>,
}

/// One checklist response to record or overwrite
#[derive(Debug, Deserialize)]
pub struct ResponseInput {
    pub checklist_item_id: Uuid,
    pub response: ResponseValue,
    pub notes: Option<String>,
    pub evidence_url: Option<String>,
}

/// Input for completing an inspection
#[derive(Debug, Deserialize)]
pub struct CompleteInspectionInput {
    /// Explicit inspector override; the scored rating applies when absent
    pub overall_rating: Option<InspectionRating>,
    pub inspector_notes: Option<String>,
}

/// Filters for listing inspections
#[derive(Debug, Default, Deserialize)]
pub struct InspectionFilter {
    pub establishment_id: Option<Uuid>,
    pub status: Option<InspectionStatus>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Inspection with its recorded checklist responses
#[derive(Debug, Serialize)]
pub struct InspectionDetail {
    #[serde(flatten)]
    pub inspection: Inspection,
    pub responses: Vec<ChecklistResponse>,
}

/// Completed inspection with its computed score
#[derive(Debug, Serialize)]
pub struct CompletedInspection {
    pub inspection: Inspection,
    pub score: ChecklistScore,
}

impl InspectionService {
    /// Create a new InspectionService instance
    pub fn new(db: PgPool, events: EventDispatcher) -> Self {
        Self { db, events }
    }

    /// Schedule an inspection in state pending, pinning the active
    /// checklist template version for the inspection type
    pub async fn schedule(
        &self,
        input: ScheduleInspectionInput,
        acting_user: Uuid,
    ) -> AppResult<Inspection> {
        let establishment_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM establishments WHERE id = $1)")
                .bind(input.establishment_id)
                .fetch_one(&self.db)
                .await?;
        if !establishment_exists {
            return Err(AppError::NotFound("Establishment".to_string()));
        }

        let template_id: Uuid = sqlx::query_scalar(
            r#"
            SELECT id FROM checklist_templates
            WHERE inspection_type = $1 AND status = 'active'
            ORDER BY version DESC
            LIMIT 1
            "#,
        )
        .bind(input.inspection_type)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Active checklist template for inspection type {}",
                input.inspection_type.as_str()
            ))
        })?;

        let priority = input.priority.unwrap_or(InspectionPriority::Medium);

        for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
            let mut tx = self.db.begin().await?;

            let reference_number =
                sequence::next_reference(&mut tx, SequenceScope::Inspection, input.scheduled_date)
                    .await?;

            let inserted = sqlx::query_as::<_, Inspection>(&format!(
                r#"
                INSERT INTO inspections (
                    reference_number, establishment_id, checklist_template_id,
                    inspection_type, inspector_id, scheduled_date, priority, status, created_by
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, 'pending', $8)
                RETURNING {INSPECTION_COLUMNS}
                "#
            ))
            .bind(&reference_number)
            .bind(input.establishment_id)
            .bind(template_id)
            .bind(input.inspection_type)
            .bind(input.inspector_id)
            .bind(input.scheduled_date)
            .bind(priority)
            .bind(acting_user)
            .fetch_one(&mut *tx)
            .await;

            match inserted {
                Ok(inspection) => {
                    tx.commit().await?;
                    return Ok(inspection);
                }
                Err(e) if is_unique_violation(&e) => {
                    tx.rollback().await?;
                    tracing::warn!(
                        "Reference number collision for inspection (attempt {}/{})",
                        attempt,
                        MAX_ALLOCATION_ATTEMPTS
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::SequenceExhausted {
            scope: "inspection",
            period: SequenceScope::Inspection.period_key(input.scheduled_date),
        })
    }

    /// Start an inspection: pending -> in_progress
    pub async fn start(&self, inspection_id: Uuid) -> AppResult<Inspection> {
        let updated = sqlx::query_as::<_, Inspection>(&format!(
            r#"
            UPDATE inspections
            SET status = 'in_progress', actual_start_datetime = NOW(), updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING {INSPECTION_COLUMNS}
            "#
        ))
        .bind(inspection_id)
        .fetch_optional(&self.db)
        .await?;

        match updated {
            Some(inspection) => Ok(inspection),
            None => Err(self.transition_failure(inspection_id, "start").await),
        }
    }

    /// Record (or overwrite) checklist responses while in_progress.
    ///
    /// Recording never auto-starts an inspection: responses against a
    /// pending inspection are rejected and the caller must start it
    /// explicitly first.
    pub async fn record_responses(
        &self,
        inspection_id: Uuid,
        responses: Vec<ResponseInput>,
    ) -> AppResult<Vec<ChecklistResponse>> {
        if responses.is_empty() {
            return Err(AppError::Validation {
                field: "responses".to_string(),
                message: "At least one response is required".to_string(),
                message_th: "ต้องมีคำตอบอย่างน้อยหนึ่งรายการ".to_string(),
            });
        }

        let mut tx = self.db.begin().await?;

        let inspection: Option<(InspectionStatus, Uuid)> = sqlx::query_as(
            "SELECT status, checklist_template_id FROM inspections WHERE id = $1 FOR UPDATE",
        )
        .bind(inspection_id)
        .fetch_optional(&mut *tx)
        .await?;

        let (status, template_id) =
            inspection.ok_or_else(|| AppError::NotFound("Inspection".to_string()))?;

        if status != InspectionStatus::InProgress {
            return Err(AppError::InvalidTransition {
                entity: "Inspection",
                id: inspection_id.to_string(),
                current: status.as_str().to_string(),
                attempted: "record responses",
            });
        }

        let valid_items: HashSet<Uuid> =
            sqlx::query_scalar("SELECT id FROM checklist_items WHERE template_id = $1")
                .bind(template_id)
                .fetch_all(&mut *tx)
                .await?
                .into_iter()
                .collect();

        for response in &responses {
            if !valid_items.contains(&response.checklist_item_id) {
                return Err(AppError::Validation {
                    field: "checklist_item_id".to_string(),
                    message: format!(
                        "Item {} does not belong to the checklist version pinned by this inspection",
                        response.checklist_item_id
                    ),
                    message_th: "รายการตรวจไม่อยู่ในแบบรายการตรวจของการตรวจนี้".to_string(),
                });
            }
        }

        let mut stored = Vec::with_capacity(responses.len());
        for response in &responses {
            let row = sqlx::query_as::<_, ChecklistResponse>(&format!(
                r#"
                INSERT INTO inspection_checklist_responses (
                    inspection_id, checklist_item_id, response, notes, evidence_url
                )
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (inspection_id, checklist_item_id) DO UPDATE SET
                    response = EXCLUDED.response,
                    notes = EXCLUDED.notes,
                    evidence_url = EXCLUDED.evidence_url,
                    updated_at = NOW()
                RETURNING {RESPONSE_COLUMNS}
                "#
            ))
            .bind(inspection_id)
            .bind(response.checklist_item_id)
            .bind(response.response)
            .bind(&response.notes)
            .bind(&response.evidence_url)
            .fetch_one(&mut *tx)
            .await?;
            stored.push(row);
        }

        tx.commit().await?;

        Ok(stored)
    }

    /// Complete an inspection: in_progress -> completed.
    ///
    /// Completion triggers scoring against the pinned template: the
    /// computed percentage is always stored, and the engine's rating
    /// applies unless the inspector supplied an override. Certificates are
    /// never issued here; completion is only their precondition.
    pub async fn complete(
        &self,
        inspection_id: Uuid,
        input: CompleteInspectionInput,
    ) -> AppResult<CompletedInspection> {
        let mut tx = self.db.begin().await?;

        let current: Option<(InspectionStatus, Uuid)> = sqlx::query_as(
            "SELECT status, checklist_template_id FROM inspections WHERE id = $1 FOR UPDATE",
        )
        .bind(inspection_id)
        .fetch_optional(&mut *tx)
        .await?;

        let (status, template_id) =
            current.ok_or_else(|| AppError::NotFound("Inspection".to_string()))?;

        if status != InspectionStatus::InProgress {
            return Err(AppError::InvalidTransition {
                entity: "Inspection",
                id: inspection_id.to_string(),
                current: status.as_str().to_string(),
                attempted: "complete",
            });
        }

        let items = sqlx::query_as::<_, ChecklistItem>(
            r#"
            SELECT id, template_id, category, requirement, requirement_th, is_mandatory,
                   points_possible, display_order
            FROM checklist_items
            WHERE template_id = $1
            ORDER BY display_order ASC
            "#,
        )
        .bind(template_id)
        .fetch_all(&mut *tx)
        .await?;

        let recorded: Vec<(Uuid, ResponseValue)> = sqlx::query_as(
            r#"
            SELECT checklist_item_id, response
            FROM inspection_checklist_responses
            WHERE inspection_id = $1
            "#,
        )
        .bind(inspection_id)
        .fetch_all(&mut *tx)
        .await?;

        let score = score_responses(&items, &recorded);
        let overall_rating = input.overall_rating.unwrap_or(score.rating);

        let inspection = sqlx::query_as::<_, Inspection>(&format!(
            r#"
            UPDATE inspections
            SET status = 'completed', actual_end_datetime = NOW(), score_percentage = $2,
                overall_rating = $3, inspector_notes = $4, updated_at = NOW()
            WHERE id = $1 AND status = 'in_progress'
            RETURNING {INSPECTION_COLUMNS}
            "#
        ))
        .bind(inspection_id)
        .bind(score.percentage)
        .bind(overall_rating)
        .bind(&input.inspector_notes)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        self.events
            .emit(INSPECTION_COMPLETED, inspection.id, inspection.status.as_str());

        Ok(CompletedInspection { inspection, score })
    }

    /// Cancel an inspection: pending or in_progress -> cancelled
    pub async fn cancel(&self, inspection_id: Uuid) -> AppResult<Inspection> {
        let updated = sqlx::query_as::<_, Inspection>(&format!(
            r#"
            UPDATE inspections
            SET status = 'cancelled', updated_at = NOW()
            WHERE id = $1 AND status IN ('pending', 'in_progress')
            RETURNING {INSPECTION_COLUMNS}
            "#
        ))
        .bind(inspection_id)
        .fetch_optional(&self.db)
        .await?;

        match updated {
            Some(inspection) => Ok(inspection),
            None => Err(self.transition_failure(inspection_id, "cancel").await),
        }
    }

    /// Get an inspection with its recorded responses
    pub async fn get_detail(&self, inspection_id: Uuid) -> AppResult<InspectionDetail> {
        let inspection = sqlx::query_as::<_, Inspection>(&format!(
            "SELECT {INSPECTION_COLUMNS} FROM inspections WHERE id = $1"
        ))
        .bind(inspection_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Inspection".to_string()))?;

        let responses = sqlx::query_as::<_, ChecklistResponse>(&format!(
            r#"
            SELECT {RESPONSE_COLUMNS} FROM inspection_checklist_responses
            WHERE inspection_id = $1
            ORDER BY created_at ASC
            "#
        ))
        .bind(inspection_id)
        .fetch_all(&self.db)
        .await?;

        Ok(InspectionDetail {
            inspection,
            responses,
        })
    }

    /// List inspections with optional filters
    pub async fn list(&self, filter: &InspectionFilter) -> AppResult<Vec<Inspection>> {
        let inspections = sqlx::query_as::<_, Inspection>(&format!(
            r#"
            SELECT {INSPECTION_COLUMNS} FROM inspections
            WHERE ($1::uuid IS NULL OR establishment_id = $1)
              AND ($2::varchar IS NULL OR status = $2)
              AND ($3::date IS NULL OR scheduled_date >= $3)
              AND ($4::date IS NULL OR scheduled_date <= $4)
            ORDER BY scheduled_date DESC, created_at DESC
            "#
        ))
        .bind(filter.establishment_id)
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.from)
        .bind(filter.to)
        .fetch_all(&self.db)
        .await?;

        Ok(inspections)
    }

    /// Diagnose a failed conditional transition: missing row vs. wrong state
    async fn transition_failure(&self, inspection_id: Uuid, attempted: &'static str) -> AppError {
        match sqlx::query_scalar::<_, InspectionStatus>(
            "SELECT status FROM inspections WHERE id = $1",
        )
        .bind(inspection_id)
        .fetch_optional(&self.db)
        .await
        {
            Ok(Some(status)) => AppError::InvalidTransition {
                entity: "Inspection",
                id: inspection_id.to_string(),
                current: status.as_str().to_string(),
                attempted,
            },
            Ok(None) => AppError::NotFound("Inspection".to_string()),
            Err(e) => e.into(),
        }
    }
}
