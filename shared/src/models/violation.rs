//! Violation models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How severe a violation is; feeds the compliance rule and risk scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    Minor,
    Major,
    Critical,
}

impl ViolationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationSeverity::Minor => "minor",
            ViolationSeverity::Major => "major",
            ViolationSeverity::Critical => "critical",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "minor" => Some(ViolationSeverity::Minor),
            "major" => Some(ViolationSeverity::Major),
            "critical" => Some(ViolationSeverity::Critical),
            _ => None,
        }
    }

    pub fn display_name_th(&self) -> &'static str {
        match self {
            ViolationSeverity::Minor => "เล็กน้อย",
            ViolationSeverity::Major => "ร้ายแรง",
            ViolationSeverity::Critical => "วิกฤต",
        }
    }
}

/// Violation lifecycle state
///
/// A violation is unresolved while open or in_progress; only resolved
/// violations stop counting against the establishment's compliance status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ViolationStatus {
    Open,
    InProgress,
    Resolved,
}

impl ViolationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationStatus::Open => "open",
            ViolationStatus::InProgress => "in_progress",
            ViolationStatus::Resolved => "resolved",
        }
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, ViolationStatus::Open | ViolationStatus::InProgress)
    }
}

/// Violation discovered during or after an inspection
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Violation {
    pub id: Uuid,
    pub inspection_id: Uuid,
    pub establishment_id: Uuid,
    pub category: String,
    pub severity: ViolationSeverity,
    pub status: ViolationStatus,
    pub description: String,
    pub corrective_action_deadline: Option<NaiveDate>,
    pub reported_by: Option<Uuid>,
    pub resolved_by: Option<Uuid>,
    pub resolution_date: Option<DateTime<Utc>>,
    pub resolution_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
