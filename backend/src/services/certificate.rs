//! Certificate lifecycle service
//!
//! Certificates are issued only from completed inspections, at most one
//! valid certificate per inspection. Expiry is derived at verification
//! time from the stored expiry date; it is never written back, so no
//! background job is required.

use chrono::{Months, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{is_unique_violation, violated_constraint, AppError, AppResult};
use crate::events::{EventDispatcher, CERTIFICATE_ISSUED, CERTIFICATE_REVOKED};
use crate::services::compliance::ComplianceService;
use crate::services::sequence::{self, MAX_ALLOCATION_ATTEMPTS};
use shared::{
    derive_certificate_status, Certificate, CertificateStatus, CertificateType, ComplianceRule,
    DerivedCertificateStatus, InspectionStatus, SequenceScope,
};

const CERTIFICATE_COLUMNS: &str = "id, certificate_number, establishment_id, inspection_id, \
     certificate_type, issue_date, expiry_date, status, issued_by, remarks, revoked_at, \
     revoked_by, revocation_reason, created_at, updated_at";

/// Name of the partial unique index guarding one valid certificate per
/// inspection; used to tell a duplicate apart from a number collision.
const ONE_VALID_PER_INSPECTION: &str = "certificates_one_valid_per_inspection";

/// Certificate service for issuance, revocation and verification
#[derive(Clone)]
pub struct CertificateService {
    db: PgPool,
    events: EventDispatcher,
    compliance: ComplianceService,
}

/// Input for issuing a certificate
#[derive(Debug, Deserialize)]
pub struct IssueCertificateInput {
    pub certificate_type: CertificateType,
    pub validity_months: u32,
    pub remarks: Option<String>,
}

/// Read-only verification result with the status derived at call time
#[derive(Debug, Serialize)]
pub struct VerificationResult {
    pub certificate: Certificate,
    pub derived_status: DerivedCertificateStatus,
}

impl CertificateService {
    /// Create a new CertificateService instance
    pub fn new(db: PgPool, events: EventDispatcher, rule: ComplianceRule) -> Self {
        let compliance = ComplianceService::new(db.clone(), rule);
        Self {
            db,
            events,
            compliance,
        }
    }

    /// Issue a certificate for a completed inspection.
    ///
    /// A certificate never overrides the compliance rule: the synchronizer
    /// runs in the same transaction and an unresolved critical violation
    /// keeps the establishment non_compliant.
    pub async fn issue(
        &self,
        inspection_id: Uuid,
        input: IssueCertificateInput,
        acting_user: Uuid,
    ) -> AppResult<Certificate> {
        if shared::validate_validity_months(input.validity_months).is_err() {
            return Err(AppError::Validation {
                field: "validity_months".to_string(),
                message: format!(
                    "Validity must be between {} and {} months",
                    shared::MIN_VALIDITY_MONTHS,
                    shared::MAX_VALIDITY_MONTHS
                ),
                message_th: "อายุใบรับรองอยู่นอกช่วงที่กำหนด".to_string(),
            });
        }

        let inspection: Option<(InspectionStatus, Uuid)> = sqlx::query_as(
            "SELECT status, establishment_id FROM inspections WHERE id = $1",
        )
        .bind(inspection_id)
        .fetch_optional(&self.db)
        .await?;

        let (status, establishment_id) =
            inspection.ok_or_else(|| AppError::NotFound("Inspection".to_string()))?;

        if status != InspectionStatus::Completed {
            return Err(AppError::InvalidTransition {
                entity: "Inspection",
                id: inspection_id.to_string(),
                current: status.as_str().to_string(),
                attempted: "issue certificate",
            });
        }

        // Checked by lookup here and enforced by the partial unique index
        // below; the index decides races between concurrent issuers.
        let already_issued: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM certificates WHERE inspection_id = $1 AND status = 'valid')",
        )
        .bind(inspection_id)
        .fetch_one(&self.db)
        .await?;
        if already_issued {
            return Err(self.duplicate_certificate(inspection_id));
        }

        let today = Utc::now().date_naive();
        let expiry_date = today
            .checked_add_months(Months::new(input.validity_months))
            .ok_or_else(|| AppError::Internal("Expiry date out of range".to_string()))?;

        for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
            let mut tx = self.db.begin().await?;

            let certificate_number =
                sequence::next_reference(&mut tx, SequenceScope::Certificate, today).await?;

            let inserted = sqlx::query_as::<_, Certificate>(&format!(
                r#"
                INSERT INTO certificates (
                    certificate_number, establishment_id, inspection_id, certificate_type,
                    issue_date, expiry_date, status, issued_by, remarks
                )
                VALUES ($1, $2, $3, $4, $5, $6, 'valid', $7, $8)
                RETURNING {CERTIFICATE_COLUMNS}
                "#
            ))
            .bind(&certificate_number)
            .bind(establishment_id)
            .bind(inspection_id)
            .bind(input.certificate_type)
            .bind(today)
            .bind(expiry_date)
            .bind(acting_user)
            .bind(&input.remarks)
            .fetch_one(&mut *tx)
            .await;

            match inserted {
                Ok(certificate) => {
                    self.compliance.resync(&mut tx, establishment_id).await?;
                    tx.commit().await?;

                    self.events.emit(
                        CERTIFICATE_ISSUED,
                        certificate.id,
                        certificate.status.as_str(),
                    );

                    return Ok(certificate);
                }
                Err(e) if violated_constraint(&e) == Some(ONE_VALID_PER_INSPECTION) => {
                    tx.rollback().await?;
                    return Err(self.duplicate_certificate(inspection_id));
                }
                Err(e) if is_unique_violation(&e) => {
                    tx.rollback().await?;
                    tracing::warn!(
                        "Certificate number collision (attempt {}/{})",
                        attempt,
                        MAX_ALLOCATION_ATTEMPTS
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::SequenceExhausted {
            scope: "certificate",
            period: SequenceScope::Certificate.period_key(today),
        })
    }

    /// Revoke a certificate: valid -> revoked only. Already revoked,
    /// suspended or date-expired certificates fail with InvalidState.
    pub async fn revoke(
        &self,
        certificate_id: Uuid,
        acting_user: Uuid,
        reason: String,
    ) -> AppResult<Certificate> {
        if shared::validate_required_text(&reason).is_err() {
            return Err(AppError::Validation {
                field: "reason".to_string(),
                message: "Revocation reason is required".to_string(),
                message_th: "ต้องระบุเหตุผลการเพิกถอน".to_string(),
            });
        }

        let today = Utc::now().date_naive();
        let mut tx = self.db.begin().await?;

        let certificate = sqlx::query_as::<_, Certificate>(&format!(
            r#"
            UPDATE certificates
            SET status = 'revoked', revoked_at = NOW(), revoked_by = $2,
                revocation_reason = $3, updated_at = NOW()
            WHERE id = $1 AND status = 'valid' AND expiry_date >= $4
            RETURNING {CERTIFICATE_COLUMNS}
            "#
        ))
        .bind(certificate_id)
        .bind(acting_user)
        .bind(&reason)
        .bind(today)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(certificate) = certificate else {
            return Err(self.state_failure(certificate_id, "revoke").await);
        };

        self.compliance
            .resync(&mut tx, certificate.establishment_id)
            .await?;

        tx.commit().await?;

        self.events.emit(
            CERTIFICATE_REVOKED,
            certificate.id,
            certificate.status.as_str(),
        );

        Ok(certificate)
    }

    /// Suspend a certificate: valid -> suspended
    pub async fn suspend(
        &self,
        certificate_id: Uuid,
        acting_user: Uuid,
        reason: String,
    ) -> AppResult<Certificate> {
        if shared::validate_required_text(&reason).is_err() {
            return Err(AppError::Validation {
                field: "reason".to_string(),
                message: "Suspension reason is required".to_string(),
                message_th: "ต้องระบุเหตุผลการระงับ".to_string(),
            });
        }

        let today = Utc::now().date_naive();
        let mut tx = self.db.begin().await?;

        let certificate = sqlx::query_as::<_, Certificate>(&format!(
            r#"
            UPDATE certificates
            SET status = 'suspended', revoked_by = $2, revocation_reason = $3, updated_at = NOW()
            WHERE id = $1 AND status = 'valid' AND expiry_date >= $4
            RETURNING {CERTIFICATE_COLUMNS}
            "#
        ))
        .bind(certificate_id)
        .bind(acting_user)
        .bind(&reason)
        .bind(today)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(certificate) = certificate else {
            return Err(self.state_failure(certificate_id, "suspend").await);
        };

        self.compliance
            .resync(&mut tx, certificate.establishment_id)
            .await?;

        tx.commit().await?;

        Ok(certificate)
    }

    /// Verify a certificate by its public number. Read-only: the derived
    /// status is computed at call time and never written back.
    pub async fn verify(&self, certificate_number: &str) -> AppResult<VerificationResult> {
        if shared::validate_reference_number(certificate_number).is_err() {
            return Err(AppError::Validation {
                field: "certificate_number".to_string(),
                message: "Malformed certificate number".to_string(),
                message_th: "รูปแบบเลขที่ใบรับรองไม่ถูกต้อง".to_string(),
            });
        }

        let certificate = sqlx::query_as::<_, Certificate>(&format!(
            "SELECT {CERTIFICATE_COLUMNS} FROM certificates WHERE certificate_number = $1"
        ))
        .bind(certificate_number)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Certificate".to_string()))?;

        let derived_status = derive_certificate_status(
            certificate.status,
            certificate.expiry_date,
            Utc::now().date_naive(),
        );

        Ok(VerificationResult {
            certificate,
            derived_status,
        })
    }

    /// List certificates for an establishment
    pub async fn list_for_establishment(
        &self,
        establishment_id: Uuid,
    ) -> AppResult<Vec<Certificate>> {
        let certificates = sqlx::query_as::<_, Certificate>(&format!(
            r#"
            SELECT {CERTIFICATE_COLUMNS} FROM certificates
            WHERE establishment_id = $1
            ORDER BY issue_date DESC, created_at DESC
            "#
        ))
        .bind(establishment_id)
        .fetch_all(&self.db)
        .await?;

        Ok(certificates)
    }

    fn duplicate_certificate(&self, inspection_id: Uuid) -> AppError {
        AppError::ConstraintViolation {
            resource: "certificates",
            message: format!(
                "A valid certificate already exists for inspection {}",
                inspection_id
            ),
            message_th: "มีใบรับรองที่ใช้งานได้สำหรับการตรวจนี้อยู่แล้ว".to_string(),
        }
    }

    async fn state_failure(&self, certificate_id: Uuid, attempted: &str) -> AppError {
        let today = Utc::now().date_naive();
        match sqlx::query_as::<_, (CertificateStatus, chrono::NaiveDate)>(
            "SELECT status, expiry_date FROM certificates WHERE id = $1",
        )
        .bind(certificate_id)
        .fetch_optional(&self.db)
        .await
        {
            Ok(Some((status, expiry_date))) => {
                let message = if status == CertificateStatus::Valid && expiry_date < today {
                    format!("cannot {} a certificate expired on {}", attempted, expiry_date)
                } else {
                    format!(
                        "cannot {} a certificate in status {}",
                        attempted,
                        status.as_str()
                    )
                };
                AppError::InvalidState {
                    entity: "Certificate",
                    id: certificate_id.to_string(),
                    message,
                }
            }
            Ok(None) => AppError::NotFound("Certificate".to_string()),
            Err(e) => e.into(),
        }
    }
}
