//! Violation tracking service
//!
//! Violations drive the establishment's compliance status: every report
//! and resolution resyncs the status inside the same transaction, so a
//! reader never sees a resolved violation next to a stale non_compliant
//! flag.

use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::events::{EventDispatcher, VIOLATION_REPORTED};
use crate::services::compliance::ComplianceService;
use shared::{ComplianceRule, Violation, ViolationSeverity, ViolationStatus};

const VIOLATION_COLUMNS: &str = "id, inspection_id, establishment_id, category, severity, status, \
     description, corrective_action_deadline, reported_by, resolved_by, resolution_date, \
     resolution_notes, created_at, updated_at";

/// Violation service for reporting and resolving violations
#[derive(Clone)]
pub struct ViolationService {
    db: PgPool,
    events: EventDispatcher,
    compliance: ComplianceService,
}

/// Input for reporting a violation
#[derive(Debug, Deserialize)]
pub struct ReportViolationInput {
    pub inspection_id: Uuid,
    pub establishment_id: Uuid,
    pub category: String,
    pub severity: ViolationSeverity,
    pub description: String,
    pub corrective_action_deadline: Option<chrono::NaiveDate>,
}

/// Input for resolving a violation
#[derive(Debug, Default, Deserialize)]
pub struct ResolveViolationInput {
    pub resolution_notes: Option<String>,
}

impl ViolationService {
    /// Create a new ViolationService instance
    pub fn new(db: PgPool, events: EventDispatcher, rule: ComplianceRule) -> Self {
        let compliance = ComplianceService::new(db.clone(), rule);
        Self {
            db,
            events,
            compliance,
        }
    }

    /// Report a violation discovered during or after an inspection
    pub async fn report(
        &self,
        input: ReportViolationInput,
        acting_user: Uuid,
    ) -> AppResult<Violation> {
        for (field, value) in [
            ("category", &input.category),
            ("description", &input.description),
        ] {
            if shared::validate_required_text(value).is_err() {
                return Err(AppError::Validation {
                    field: field.to_string(),
                    message: format!("{} is required", field),
                    message_th: format!("ต้องระบุ {}", field),
                });
            }
        }

        let establishment_id: Uuid =
            sqlx::query_scalar("SELECT establishment_id FROM inspections WHERE id = $1")
                .bind(input.inspection_id)
                .fetch_optional(&self.db)
                .await?
                .ok_or_else(|| AppError::NotFound("Inspection".to_string()))?;

        if establishment_id != input.establishment_id {
            return Err(AppError::Validation {
                field: "establishment_id".to_string(),
                message: "Establishment does not match the inspection".to_string(),
                message_th: "สถานประกอบการไม่ตรงกับการตรวจ".to_string(),
            });
        }

        let mut tx = self.db.begin().await?;

        let violation = sqlx::query_as::<_, Violation>(&format!(
            r#"
            INSERT INTO violations (
                inspection_id, establishment_id, category, severity, status,
                description, corrective_action_deadline, reported_by
            )
            VALUES ($1, $2, $3, $4, 'open', $5, $6, $7)
            RETURNING {VIOLATION_COLUMNS}
            "#
        ))
        .bind(input.inspection_id)
        .bind(establishment_id)
        .bind(&input.category)
        .bind(input.severity)
        .bind(&input.description)
        .bind(input.corrective_action_deadline)
        .bind(acting_user)
        .fetch_one(&mut *tx)
        .await?;

        self.compliance.resync(&mut tx, establishment_id).await?;

        tx.commit().await?;

        self.events
            .emit(VIOLATION_REPORTED, violation.id, violation.status.as_str());

        Ok(violation)
    }

    /// Mark corrective action as underway: open -> in_progress.
    /// The violation stays unresolved, so compliance is unaffected.
    pub async fn begin_corrective_action(&self, violation_id: Uuid) -> AppResult<Violation> {
        let updated = sqlx::query_as::<_, Violation>(&format!(
            r#"
            UPDATE violations
            SET status = 'in_progress', updated_at = NOW()
            WHERE id = $1 AND status = 'open'
            RETURNING {VIOLATION_COLUMNS}
            "#
        ))
        .bind(violation_id)
        .fetch_optional(&self.db)
        .await?;

        match updated {
            Some(violation) => Ok(violation),
            None => Err(self.state_failure(violation_id, "corrective action").await),
        }
    }

    /// Resolve a violation: open/in_progress -> resolved.
    /// Resolving an already-resolved violation fails with InvalidState.
    pub async fn resolve(
        &self,
        violation_id: Uuid,
        acting_user: Uuid,
        input: ResolveViolationInput,
    ) -> AppResult<Violation> {
        let mut tx = self.db.begin().await?;

        let violation = sqlx::query_as::<_, Violation>(&format!(
            r#"
            UPDATE violations
            SET status = 'resolved', resolved_by = $2, resolution_date = NOW(),
                resolution_notes = $3, updated_at = NOW()
            WHERE id = $1 AND status IN ('open', 'in_progress')
            RETURNING {VIOLATION_COLUMNS}
            "#
        ))
        .bind(violation_id)
        .bind(acting_user)
        .bind(&input.resolution_notes)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(violation) = violation else {
            return Err(self.state_failure(violation_id, "resolution").await);
        };

        self.compliance
            .resync(&mut tx, violation.establishment_id)
            .await?;

        tx.commit().await?;

        Ok(violation)
    }

    /// List violations for an establishment
    pub async fn list_for_establishment(
        &self,
        establishment_id: Uuid,
        unresolved_only: bool,
    ) -> AppResult<Vec<Violation>> {
        let violations = sqlx::query_as::<_, Violation>(&format!(
            r#"
            SELECT {VIOLATION_COLUMNS} FROM violations
            WHERE establishment_id = $1
              AND ($2 = false OR status IN ('open', 'in_progress'))
            ORDER BY created_at DESC
            "#
        ))
        .bind(establishment_id)
        .bind(unresolved_only)
        .fetch_all(&self.db)
        .await?;

        Ok(violations)
    }

    /// List violations recorded against an inspection
    pub async fn list_for_inspection(&self, inspection_id: Uuid) -> AppResult<Vec<Violation>> {
        let violations = sqlx::query_as::<_, Violation>(&format!(
            r#"
            SELECT {VIOLATION_COLUMNS} FROM violations
            WHERE inspection_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(inspection_id)
        .fetch_all(&self.db)
        .await?;

        Ok(violations)
    }

    async fn state_failure(&self, violation_id: Uuid, attempted: &str) -> AppError {
        match sqlx::query_scalar::<_, ViolationStatus>(
            "SELECT status FROM violations WHERE id = $1",
        )
        .bind(violation_id)
        .fetch_optional(&self.db)
        .await
        {
            Ok(Some(status)) => AppError::InvalidState {
                entity: "Violation",
                id: violation_id.to_string(),
                message: format!(
                    "{} not permitted while status is {}",
                    attempted,
                    status.as_str()
                ),
            },
            Ok(None) => AppError::NotFound("Violation".to_string()),
            Err(e) => e.into(),
        }
    }
}
