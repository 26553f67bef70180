//! Certificate models
//!
//! Expiry is never stored as a transition: a certificate row only moves
//! between valid, revoked and suspended, and "expired" is derived from
//! expiry_date at read time.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Days before expiry at which verification reports expiring_soon
pub const EXPIRING_SOON_WINDOW_DAYS: i64 = 30;

/// Kind of certificate issued to a compliant establishment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CertificateType {
    FoodSafety,
    SanitationStandard,
    HygieneExcellence,
    OperatingCompliance,
}

impl CertificateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CertificateType::FoodSafety => "food_safety",
            CertificateType::SanitationStandard => "sanitation_standard",
            CertificateType::HygieneExcellence => "hygiene_excellence",
            CertificateType::OperatingCompliance => "operating_compliance",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CertificateType::FoodSafety => "Food Safety Certificate",
            CertificateType::SanitationStandard => "Sanitation Standard Certificate",
            CertificateType::HygieneExcellence => "Hygiene Excellence Certificate",
            CertificateType::OperatingCompliance => "Operating Compliance Certificate",
        }
    }

    pub fn display_name_th(&self) -> &'static str {
        match self {
            CertificateType::FoodSafety => "ใบรับรองความปลอดภัยด้านอาหาร",
            CertificateType::SanitationStandard => "ใบรับรองมาตรฐานสุขาภิบาล",
            CertificateType::HygieneExcellence => "ใบรับรองสุขอนามัยดีเด่น",
            CertificateType::OperatingCompliance => "ใบรับรองการประกอบกิจการ",
        }
    }
}

/// Stored certificate status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CertificateStatus {
    Valid,
    Revoked,
    Suspended,
}

impl CertificateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CertificateStatus::Valid => "valid",
            CertificateStatus::Revoked => "revoked",
            CertificateStatus::Suspended => "suspended",
        }
    }
}

/// Status computed at verification time from stored status plus expiry date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivedCertificateStatus {
    Valid,
    ExpiringSoon,
    Expired,
    Revoked,
    Suspended,
}

/// Issued certificate record
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Certificate {
    pub id: Uuid,
    pub certificate_number: String,
    pub establishment_id: Uuid,
    pub inspection_id: Uuid,
    pub certificate_type: CertificateType,
    pub issue_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub status: CertificateStatus,
    pub issued_by: Option<Uuid>,
    pub remarks: Option<String>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub revoked_by: Option<Uuid>,
    pub revocation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Derive the verification status for a certificate as of `today`.
///
/// Revoked and suspended always win over date comparison; a valid
/// certificate past its expiry date reads as expired without any write.
pub fn derive_certificate_status(
    status: CertificateStatus,
    expiry_date: NaiveDate,
    today: NaiveDate,
) -> DerivedCertificateStatus {
    match status {
        CertificateStatus::Revoked => DerivedCertificateStatus::Revoked,
        CertificateStatus::Suspended => DerivedCertificateStatus::Suspended,
        CertificateStatus::Valid => {
            if expiry_date < today {
                DerivedCertificateStatus::Expired
            } else if (expiry_date - today).num_days() <= EXPIRING_SOON_WINDOW_DAYS {
                DerivedCertificateStatus::ExpiringSoon
            } else {
                DerivedCertificateStatus::Valid
            }
        }
    }
}
