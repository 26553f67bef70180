//! Establishment models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of regulated establishment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EstablishmentType {
    Restaurant,
    FoodStall,
    Market,
    Supermarket,
    FoodFactory,
    Salon,
    Spa,
    Hotel,
    Other,
}

impl EstablishmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstablishmentType::Restaurant => "restaurant",
            EstablishmentType::FoodStall => "food_stall",
            EstablishmentType::Market => "market",
            EstablishmentType::Supermarket => "supermarket",
            EstablishmentType::FoodFactory => "food_factory",
            EstablishmentType::Salon => "salon",
            EstablishmentType::Spa => "spa",
            EstablishmentType::Hotel => "hotel",
            EstablishmentType::Other => "other",
        }
    }

    /// Food-handling establishments carry extra weight in risk scoring
    pub fn handles_food(&self) -> bool {
        matches!(
            self,
            EstablishmentType::Restaurant
                | EstablishmentType::FoodStall
                | EstablishmentType::Market
                | EstablishmentType::Supermarket
                | EstablishmentType::FoodFactory
        )
    }
}

/// Coarse establishment-level priority signal feeding prioritization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    Low,
    Medium,
    High,
}

impl RiskCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskCategory::Low => "low",
            RiskCategory::Medium => "medium",
            RiskCategory::High => "high",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "low" => Some(RiskCategory::Low),
            "medium" => Some(RiskCategory::Medium),
            "high" => Some(RiskCategory::High),
            _ => None,
        }
    }

    pub fn display_name_th(&self) -> &'static str {
        match self {
            RiskCategory::Low => "ความเสี่ยงต่ำ",
            RiskCategory::Medium => "ความเสี่ยงปานกลาง",
            RiskCategory::High => "ความเสี่ยงสูง",
        }
    }
}

/// Derived establishment-level flag summarizing unresolved blocking violations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    Pending,
    Compliant,
    NonCompliant,
    Suspended,
}

impl ComplianceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplianceStatus::Pending => "pending",
            ComplianceStatus::Compliant => "compliant",
            ComplianceStatus::NonCompliant => "non_compliant",
            ComplianceStatus::Suspended => "suspended",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ComplianceStatus::Pending => "Pending",
            ComplianceStatus::Compliant => "Compliant",
            ComplianceStatus::NonCompliant => "Non-compliant",
            ComplianceStatus::Suspended => "Suspended",
        }
    }

    pub fn display_name_th(&self) -> &'static str {
        match self {
            ComplianceStatus::Pending => "รอดำเนินการ",
            ComplianceStatus::Compliant => "ผ่านเกณฑ์",
            ComplianceStatus::NonCompliant => "ไม่ผ่านเกณฑ์",
            ComplianceStatus::Suspended => "ถูกระงับ",
        }
    }
}

/// Registered establishment record
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Establishment {
    pub id: Uuid,
    pub reference_number: String,
    pub name: String,
    pub establishment_type: EstablishmentType,
    pub owner_name: String,
    pub address: String,
    pub district: Option<String>,
    pub phone: Option<String>,
    pub risk_category: RiskCategory,
    pub compliance_status: ComplianceStatus,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
