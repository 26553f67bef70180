//! Inspection models and state machine vocabulary

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scoring::InspectionRating;

/// Kind of inspection visit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InspectionType {
    Routine,
    FollowUp,
    ComplaintDriven,
    LicenseRenewal,
    PreOpening,
}

impl InspectionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InspectionType::Routine => "routine",
            InspectionType::FollowUp => "follow_up",
            InspectionType::ComplaintDriven => "complaint_driven",
            InspectionType::LicenseRenewal => "license_renewal",
            InspectionType::PreOpening => "pre_opening",
        }
    }
}

/// Dispatch priority assigned at scheduling time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InspectionPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl InspectionPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            InspectionPriority::Low => "low",
            InspectionPriority::Medium => "medium",
            InspectionPriority::High => "high",
            InspectionPriority::Urgent => "urgent",
        }
    }
}

/// Inspection lifecycle state
///
/// Transitions: pending -> in_progress -> completed, and pending or
/// in_progress -> cancelled. Completed and cancelled are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InspectionStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl InspectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InspectionStatus::Pending => "pending",
            InspectionStatus::InProgress => "in_progress",
            InspectionStatus::Completed => "completed",
            InspectionStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(InspectionStatus::Pending),
            "in_progress" => Some(InspectionStatus::InProgress),
            "completed" => Some(InspectionStatus::Completed),
            "cancelled" => Some(InspectionStatus::Cancelled),
            _ => None,
        }
    }

    /// No transition is permitted out of a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            InspectionStatus::Completed | InspectionStatus::Cancelled
        )
    }
}

/// Scheduled or executed inspection record
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Inspection {
    pub id: Uuid,
    pub reference_number: String,
    pub establishment_id: Uuid,
    pub checklist_template_id: Uuid,
    pub inspection_type: InspectionType,
    pub inspector_id: Option<Uuid>,
    pub scheduled_date: NaiveDate,
    pub priority: InspectionPriority,
    pub status: InspectionStatus,
    pub actual_start_datetime: Option<DateTime<Utc>>,
    pub actual_end_datetime: Option<DateTime<Utc>>,
    pub score_percentage: Option<Decimal>,
    pub overall_rating: Option<InspectionRating>,
    pub inspector_notes: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
