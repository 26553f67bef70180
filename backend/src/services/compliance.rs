//! Compliance status synchronization
//!
//! Single writer: `establishments.compliance_status` is updated here and
//! nowhere else. Mutating services (violations, certificates) call
//! `resync` inside their own transaction so readers never observe a
//! mutation without its recomputed status.

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::{ComplianceRule, ComplianceStatus, Establishment, ViolationSeverity};

/// Compliance service owning the derived status and administrative holds
#[derive(Clone)]
pub struct ComplianceService {
    db: PgPool,
    rule: ComplianceRule,
}

impl ComplianceService {
    /// Create a new ComplianceService instance
    pub fn new(db: PgPool, rule: ComplianceRule) -> Self {
        Self { db, rule }
    }

    /// Recompute the establishment's compliance status from its unresolved
    /// violations, inside the caller's transaction.
    ///
    /// Idempotent: with no intervening mutation a second call writes the
    /// same status. Suspended establishments are an administrative hold and
    /// are left untouched until reinstated.
    pub async fn resync(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        establishment_id: Uuid,
    ) -> AppResult<ComplianceStatus> {
        let current: ComplianceStatus = sqlx::query_scalar(
            "SELECT compliance_status FROM establishments WHERE id = $1 FOR UPDATE",
        )
        .bind(establishment_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Establishment".to_string()))?;

        if current == ComplianceStatus::Suspended {
            return Ok(ComplianceStatus::Suspended);
        }

        let next = self.computed_status(tx, establishment_id).await?;

        sqlx::query(
            "UPDATE establishments SET compliance_status = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(establishment_id)
        .bind(next)
        .execute(&mut **tx)
        .await?;

        Ok(next)
    }

    /// Place an administrative hold on an establishment
    pub async fn suspend(&self, establishment_id: Uuid) -> AppResult<Establishment> {
        let establishment = sqlx::query_as::<_, Establishment>(
            r#"
            UPDATE establishments
            SET compliance_status = 'suspended', updated_at = NOW()
            WHERE id = $1 AND compliance_status != 'suspended'
            RETURNING id, reference_number, name, establishment_type, owner_name, address,
                      district, phone, risk_category, compliance_status, created_by,
                      created_at, updated_at
            "#,
        )
        .bind(establishment_id)
        .fetch_optional(&self.db)
        .await?;

        match establishment {
            Some(establishment) => Ok(establishment),
            None => Err(self.hold_failure(establishment_id, "already suspended").await),
        }
    }

    /// Lift the administrative hold; the status is recomputed from the
    /// rule, not blindly reset to compliant.
    pub async fn reinstate(&self, establishment_id: Uuid) -> AppResult<Establishment> {
        let mut tx = self.db.begin().await?;

        let current: ComplianceStatus = sqlx::query_scalar(
            "SELECT compliance_status FROM establishments WHERE id = $1 FOR UPDATE",
        )
        .bind(establishment_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Establishment".to_string()))?;

        if current != ComplianceStatus::Suspended {
            return Err(AppError::InvalidState {
                entity: "Establishment",
                id: establishment_id.to_string(),
                message: "not suspended".to_string(),
            });
        }

        let next = self.computed_status(&mut tx, establishment_id).await?;

        let establishment = sqlx::query_as::<_, Establishment>(
            r#"
            UPDATE establishments
            SET compliance_status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, reference_number, name, establishment_type, owner_name, address,
                      district, phone, risk_category, compliance_status, created_by,
                      created_at, updated_at
            "#,
        )
        .bind(establishment_id)
        .bind(next)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(establishment)
    }

    /// Rule outcome for the establishment's current unresolved violations
    async fn computed_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        establishment_id: Uuid,
    ) -> AppResult<ComplianceStatus> {
        let unresolved: Vec<ViolationSeverity> = sqlx::query_scalar(
            r#"
            SELECT severity FROM violations
            WHERE establishment_id = $1 AND status IN ('open', 'in_progress')
            "#,
        )
        .bind(establishment_id)
        .fetch_all(&mut **tx)
        .await?;

        Ok(self.rule.status_for(&unresolved))
    }

    async fn hold_failure(&self, establishment_id: Uuid, message: &str) -> AppError {
        match sqlx::query_scalar::<_, ComplianceStatus>(
            "SELECT compliance_status FROM establishments WHERE id = $1",
        )
        .bind(establishment_id)
        .fetch_optional(&self.db)
        .await
        {
            Ok(Some(_)) => AppError::InvalidState {
                entity: "Establishment",
                id: establishment_id.to_string(),
                message: message.to_string(),
            },
            Ok(None) => AppError::NotFound("Establishment".to_string()),
            Err(e) => e.into(),
        }
    }
}
