//! Establishment registry service
//!
//! Registration allocates the EST- reference number; risk reassessment
//! runs the pluggable scorer over the establishment's inspection and
//! violation history. Compliance status is never written here — that is
//! the synchronizer's job.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{is_unique_violation, AppError, AppResult};
use crate::services::sequence::{self, MAX_ALLOCATION_ATTEMPTS};
use shared::{
    ComplianceStatus, Establishment, EstablishmentHistory, EstablishmentType,
    HeuristicRiskScorer, PaginatedResponse, Pagination, PaginationMeta, RiskAssessment,
    RiskCategory, RiskScorer, SequenceScope,
};

const ESTABLISHMENT_COLUMNS: &str = "id, reference_number, name, establishment_type, owner_name, \
     address, district, phone, risk_category, compliance_status, created_by, created_at, updated_at";

/// Establishment service for the registry and risk assessment
#[derive(Clone)]
pub struct EstablishmentService {
    db: PgPool,
    scorer: Arc<dyn RiskScorer + Send + Sync>,
}

/// Input for registering an establishment
#[derive(Debug, Deserialize)]
pub struct RegisterEstablishmentInput {
    pub name: String,
    pub establishment_type: EstablishmentType,
    pub owner_name: String,
    pub address: String,
    pub district: Option<String>,
    pub phone: Option<String>,
    pub risk_category: Option<RiskCategory>,
}

/// Input for updating descriptive fields
#[derive(Debug, Deserialize)]
pub struct UpdateEstablishmentInput {
    pub name: Option<String>,
    pub owner_name: Option<String>,
    pub address: Option<String>,
    pub district: Option<String>,
    pub phone: Option<String>,
}

/// Filters for listing establishments
#[derive(Debug, Default, Deserialize)]
pub struct EstablishmentFilter {
    pub compliance_status: Option<ComplianceStatus>,
    pub risk_category: Option<RiskCategory>,
}

/// Result of a risk reassessment
#[derive(Debug, Serialize)]
pub struct RiskReassessment {
    pub establishment: Establishment,
    pub assessment: RiskAssessment,
}

impl EstablishmentService {
    /// Create a new EstablishmentService with the default heuristic scorer
    pub fn new(db: PgPool) -> Self {
        Self::with_scorer(db, Arc::new(HeuristicRiskScorer))
    }

    /// Create a service backed by a custom risk scorer
    pub fn with_scorer(db: PgPool, scorer: Arc<dyn RiskScorer + Send + Sync>) -> Self {
        Self { db, scorer }
    }

    /// Register a new establishment in status pending
    pub async fn register(
        &self,
        input: RegisterEstablishmentInput,
        acting_user: Uuid,
    ) -> AppResult<Establishment> {
        for (field, value) in [
            ("name", &input.name),
            ("owner_name", &input.owner_name),
            ("address", &input.address),
        ] {
            if shared::validate_required_text(value).is_err() {
                return Err(AppError::Validation {
                    field: field.to_string(),
                    message: format!("{} is required", field),
                    message_th: format!("ต้องระบุ {}", field),
                });
            }
        }

        let risk_category = input.risk_category.unwrap_or(RiskCategory::Medium);
        let today = Utc::now().date_naive();

        for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
            let mut tx = self.db.begin().await?;

            let reference_number =
                sequence::next_reference(&mut tx, SequenceScope::Establishment, today).await?;

            let inserted = sqlx::query_as::<_, Establishment>(&format!(
                r#"
                INSERT INTO establishments (
                    reference_number, name, establishment_type, owner_name, address,
                    district, phone, risk_category, compliance_status, created_by
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'pending', $9)
                RETURNING {ESTABLISHMENT_COLUMNS}
                "#
            ))
            .bind(&reference_number)
            .bind(&input.name)
            .bind(input.establishment_type)
            .bind(&input.owner_name)
            .bind(&input.address)
            .bind(&input.district)
            .bind(&input.phone)
            .bind(risk_category)
            .bind(acting_user)
            .fetch_one(&mut *tx)
            .await;

            match inserted {
                Ok(establishment) => {
                    tx.commit().await?;
                    return Ok(establishment);
                }
                Err(e) if is_unique_violation(&e) => {
                    tx.rollback().await?;
                    tracing::warn!(
                        "Reference number collision for establishment (attempt {}/{})",
                        attempt,
                        MAX_ALLOCATION_ATTEMPTS
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::SequenceExhausted {
            scope: "establishment",
            period: SequenceScope::Establishment.period_key(today),
        })
    }

    /// Get an establishment by ID
    pub async fn get(&self, establishment_id: Uuid) -> AppResult<Establishment> {
        let establishment = sqlx::query_as::<_, Establishment>(&format!(
            "SELECT {ESTABLISHMENT_COLUMNS} FROM establishments WHERE id = $1"
        ))
        .bind(establishment_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Establishment".to_string()))?;

        Ok(establishment)
    }

    /// List establishments with optional status/risk filters
    pub async fn list(
        &self,
        filter: &EstablishmentFilter,
        pagination: &Pagination,
    ) -> AppResult<PaginatedResponse<Establishment>> {
        let total_items: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM establishments
            WHERE ($1::varchar IS NULL OR compliance_status = $1)
              AND ($2::varchar IS NULL OR risk_category = $2)
            "#,
        )
        .bind(filter.compliance_status.map(|s| s.as_str()))
        .bind(filter.risk_category.map(|r| r.as_str()))
        .fetch_one(&self.db)
        .await?;

        let establishments = sqlx::query_as::<_, Establishment>(&format!(
            r#"
            SELECT {ESTABLISHMENT_COLUMNS} FROM establishments
            WHERE ($1::varchar IS NULL OR compliance_status = $1)
              AND ($2::varchar IS NULL OR risk_category = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(filter.compliance_status.map(|s| s.as_str()))
        .bind(filter.risk_category.map(|r| r.as_str()))
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        let total_pages = if pagination.per_page == 0 {
            0
        } else {
            (total_items as u64).div_ceil(pagination.per_page as u64) as u32
        };

        Ok(PaginatedResponse {
            data: establishments,
            pagination: PaginationMeta {
                page: pagination.page,
                per_page: pagination.per_page,
                total_items: total_items as u64,
                total_pages,
            },
        })
    }

    /// Update descriptive fields of an establishment
    pub async fn update(
        &self,
        establishment_id: Uuid,
        input: UpdateEstablishmentInput,
    ) -> AppResult<Establishment> {
        if let Some(ref name) = input.name {
            if shared::validate_required_text(name).is_err() {
                return Err(AppError::Validation {
                    field: "name".to_string(),
                    message: "Name cannot be empty".to_string(),
                    message_th: "ชื่อสถานประกอบการไม่สามารถว่างได้".to_string(),
                });
            }
        }

        let establishment = sqlx::query_as::<_, Establishment>(&format!(
            r#"
            UPDATE establishments SET
                name = COALESCE($2, name),
                owner_name = COALESCE($3, owner_name),
                address = COALESCE($4, address),
                district = COALESCE($5, district),
                phone = COALESCE($6, phone),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {ESTABLISHMENT_COLUMNS}
            "#
        ))
        .bind(establishment_id)
        .bind(&input.name)
        .bind(&input.owner_name)
        .bind(&input.address)
        .bind(&input.district)
        .bind(&input.phone)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Establishment".to_string()))?;

        Ok(establishment)
    }

    /// Re-run the risk scorer over the establishment's history and persist
    /// the resulting category
    pub async fn reassess_risk(&self, establishment_id: Uuid) -> AppResult<RiskReassessment> {
        let establishment = self.get(establishment_id).await?;

        let history = self.gather_history(&establishment).await?;
        let assessment = self.scorer.score(&history);

        let establishment = sqlx::query_as::<_, Establishment>(&format!(
            r#"
            UPDATE establishments SET risk_category = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {ESTABLISHMENT_COLUMNS}
            "#
        ))
        .bind(establishment_id)
        .bind(assessment.category)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(
            "Risk for establishment {} reassessed to {} ({} points)",
            establishment.reference_number,
            assessment.category.as_str(),
            assessment.points
        );

        Ok(RiskReassessment {
            establishment,
            assessment,
        })
    }

    async fn gather_history(
        &self,
        establishment: &Establishment,
    ) -> AppResult<EstablishmentHistory> {
        let (completed_inspections, average_score): (i64, Option<Decimal>) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FILTER (WHERE status = 'completed'),
                   AVG(score_percentage) FILTER (WHERE status = 'completed')
            FROM inspections
            WHERE establishment_id = $1
            "#,
        )
        .bind(establishment.id)
        .fetch_one(&self.db)
        .await?;

        let last_completed: Option<chrono::DateTime<Utc>> = sqlx::query_scalar(
            r#"
            SELECT MAX(actual_end_datetime) FROM inspections
            WHERE establishment_id = $1 AND status = 'completed'
            "#,
        )
        .bind(establishment.id)
        .fetch_one(&self.db)
        .await?;

        let (unresolved_minor, unresolved_major, unresolved_critical): (i64, i64, i64) =
            sqlx::query_as(
                r#"
                SELECT COUNT(*) FILTER (WHERE severity = 'minor'),
                       COUNT(*) FILTER (WHERE severity = 'major'),
                       COUNT(*) FILTER (WHERE severity = 'critical')
                FROM violations
                WHERE establishment_id = $1 AND status IN ('open', 'in_progress')
                "#,
            )
            .bind(establishment.id)
            .fetch_one(&self.db)
            .await?;

        Ok(EstablishmentHistory {
            establishment_type: establishment.establishment_type,
            completed_inspections,
            average_score,
            unresolved_minor,
            unresolved_major,
            unresolved_critical,
            days_since_last_inspection: last_completed
                .map(|at| (Utc::now() - at).num_days()),
        })
    }
}
