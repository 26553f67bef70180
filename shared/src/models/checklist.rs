//! Checklist template and response models
//!
//! Templates are versioned: a revision archives the current version and
//! inserts a new one, so inspections can pin the version they scored against.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::inspection::InspectionType;

/// Template lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TemplateStatus {
    Active,
    Archived,
}

impl TemplateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateStatus::Active => "active",
            TemplateStatus::Archived => "archived",
        }
    }
}

/// Response recorded against a single checklist item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ResponseValue {
    Pass,
    Fail,
    Na,
}

impl ResponseValue {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseValue::Pass => "pass",
            ResponseValue::Fail => "fail",
            ResponseValue::Na => "na",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pass" => Some(ResponseValue::Pass),
            "fail" => Some(ResponseValue::Fail),
            "na" => Some(ResponseValue::Na),
            _ => None,
        }
    }
}

/// Versioned checklist definition for an inspection type
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ChecklistTemplate {
    pub id: Uuid,
    pub name: String,
    pub inspection_type: InspectionType,
    pub version: i32,
    pub status: TemplateStatus,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Single weighted requirement within a template
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ChecklistItem {
    pub id: Uuid,
    pub template_id: Uuid,
    pub category: String,
    pub requirement: String,
    pub requirement_th: Option<String>,
    pub is_mandatory: bool,
    pub points_possible: i32,
    pub display_order: i32,
}

/// Recorded response, unique per (inspection, checklist item)
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ChecklistResponse {
    pub id: Uuid,
    pub inspection_id: Uuid,
    pub checklist_item_id: Uuid,
    pub response: ResponseValue,
    pub notes: Option<String>,
    pub evidence_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
