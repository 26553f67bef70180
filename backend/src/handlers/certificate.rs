//! HTTP handlers for certificate lifecycle endpoints
//!
//! Issuance and revocation require explicit permissions from the identity
//! collaborator; verification is public so a certificate number printed on
//! the premises can be checked by anyone.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::{AuthUser, CurrentUser};
use crate::services::certificate::{
    CertificateService, IssueCertificateInput, VerificationResult,
};
use crate::AppState;
use shared::{Certificate, CertificateType};

fn require_permission(user: &AuthUser, resource: &str, action: &str) -> AppResult<()> {
    if user.has_permission(resource, action) {
        Ok(())
    } else {
        Err(AppError::InsufficientPermissions)
    }
}

/// Request body for issuing a certificate
#[derive(Debug, Deserialize)]
pub struct IssueCertificateRequest {
    pub inspection_id: Uuid,
    pub certificate_type: CertificateType,
    pub validity_months: u32,
    pub remarks: Option<String>,
}

/// Request body carrying a reason
#[derive(Debug, Deserialize)]
pub struct ReasonRequest {
    pub reason: String,
}

/// Issue a certificate for a completed inspection
pub async fn issue_certificate(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<IssueCertificateRequest>,
) -> AppResult<Json<Certificate>> {
    require_permission(&current_user.0, "certificates", "issue")?;

    let service = CertificateService::new(
        state.db,
        state.events.clone(),
        state.compliance_rule.clone(),
    );
    let certificate = service
        .issue(
            request.inspection_id,
            IssueCertificateInput {
                certificate_type: request.certificate_type,
                validity_months: request.validity_months,
                remarks: request.remarks,
            },
            current_user.0.user_id,
        )
        .await?;
    Ok(Json(certificate))
}

/// Revoke a certificate (valid -> revoked)
pub async fn revoke_certificate(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(certificate_id): Path<Uuid>,
    Json(request): Json<ReasonRequest>,
) -> AppResult<Json<Certificate>> {
    require_permission(&current_user.0, "certificates", "revoke")?;

    let service = CertificateService::new(
        state.db,
        state.events.clone(),
        state.compliance_rule.clone(),
    );
    let certificate = service
        .revoke(certificate_id, current_user.0.user_id, request.reason)
        .await?;
    Ok(Json(certificate))
}

/// Suspend a certificate (valid -> suspended)
pub async fn suspend_certificate(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(certificate_id): Path<Uuid>,
    Json(request): Json<ReasonRequest>,
) -> AppResult<Json<Certificate>> {
    require_permission(&current_user.0, "certificates", "revoke")?;

    let service = CertificateService::new(
        state.db,
        state.events.clone(),
        state.compliance_rule.clone(),
    );
    let certificate = service
        .suspend(certificate_id, current_user.0.user_id, request.reason)
        .await?;
    Ok(Json(certificate))
}

/// Verify a certificate by its public number (unauthenticated)
pub async fn verify_certificate(
    State(state): State<AppState>,
    Path(certificate_number): Path<String>,
) -> AppResult<Json<VerificationResult>> {
    let service = CertificateService::new(
        state.db,
        state.events.clone(),
        state.compliance_rule.clone(),
    );
    let result = service.verify(&certificate_number).await?;
    Ok(Json(result))
}
