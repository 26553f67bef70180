//! Checklist template management service
//!
//! Templates are versioned rather than edited in place: a revision
//! archives the current version and inserts version+1 with a fresh item
//! set. Inspections pin the version row active when they were scheduled,
//! so historical scores stay unambiguous.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::{
    validate_points_possible, validate_required_text, ChecklistItem, ChecklistTemplate,
    InspectionType,
};

const TEMPLATE_COLUMNS: &str =
    "id, name, inspection_type, version, status, created_by, created_at, updated_at";

const ITEM_COLUMNS: &str =
    "id, template_id, category, requirement, requirement_th, is_mandatory, points_possible, display_order";

/// Checklist service for managing versioned templates
#[derive(Clone)]
pub struct ChecklistService {
    db: PgPool,
}

/// Input for one checklist item
#[derive(Debug, Deserialize)]
pub struct ChecklistItemInput {
    pub category: String,
    pub requirement: String,
    pub requirement_th: Option<String>,
    pub is_mandatory: Option<bool>,
    pub points_possible: i32,
    pub display_order: Option<i32>,
}

/// Input for creating a new template (version 1)
#[derive(Debug, Deserialize)]
pub struct CreateTemplateInput {
    pub name: String,
    pub inspection_type: InspectionType,
    pub items: Vec<ChecklistItemInput>,
}

/// Input for revising a template into its next version
#[derive(Debug, Deserialize)]
pub struct ReviseTemplateInput {
    pub name: Option<String>,
    pub items: Vec<ChecklistItemInput>,
}

/// Template with its ordered items
#[derive(Debug, Serialize)]
pub struct TemplateWithItems {
    #[serde(flatten)]
    pub template: ChecklistTemplate,
    pub items: Vec<ChecklistItem>,
}

impl ChecklistService {
    /// Create a new ChecklistService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a new checklist template as version 1, active
    pub async fn create_template(
        &self,
        input: CreateTemplateInput,
        acting_user: Uuid,
    ) -> AppResult<TemplateWithItems> {
        if validate_required_text(&input.name).is_err() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Template name is required".to_string(),
                message_th: "ต้องระบุชื่อแบบรายการตรวจ".to_string(),
            });
        }
        Self::validate_items(&input.items)?;

        let mut tx = self.db.begin().await?;

        let template = sqlx::query_as::<_, ChecklistTemplate>(&format!(
            r#"
            INSERT INTO checklist_templates (name, inspection_type, version, status, created_by)
            VALUES ($1, $2, 1, 'active', $3)
            RETURNING {TEMPLATE_COLUMNS}
            "#
        ))
        .bind(&input.name)
        .bind(input.inspection_type)
        .bind(acting_user)
        .fetch_one(&mut *tx)
        .await?;

        let items = Self::insert_items(&mut tx, template.id, &input.items).await?;

        tx.commit().await?;

        Ok(TemplateWithItems { template, items })
    }

    /// Revise an active template: archive the current version and insert
    /// version+1 with the given item set
    pub async fn revise_template(
        &self,
        template_id: Uuid,
        input: ReviseTemplateInput,
        acting_user: Uuid,
    ) -> AppResult<TemplateWithItems> {
        Self::validate_items(&input.items)?;

        let current = self.get_template(template_id).await?;

        let mut tx = self.db.begin().await?;

        let archived = sqlx::query(
            r#"
            UPDATE checklist_templates
            SET status = 'archived', updated_at = NOW()
            WHERE id = $1 AND status = 'active'
            "#,
        )
        .bind(template_id)
        .execute(&mut *tx)
        .await?;

        if archived.rows_affected() == 0 {
            return Err(AppError::InvalidState {
                entity: "ChecklistTemplate",
                id: template_id.to_string(),
                message: "only the active version can be revised".to_string(),
            });
        }

        let name = input.name.unwrap_or(current.template.name);
        let template = sqlx::query_as::<_, ChecklistTemplate>(&format!(
            r#"
            INSERT INTO checklist_templates (name, inspection_type, version, status, created_by)
            VALUES ($1, $2, $3, 'active', $4)
            RETURNING {TEMPLATE_COLUMNS}
            "#
        ))
        .bind(&name)
        .bind(current.template.inspection_type)
        .bind(current.template.version + 1)
        .bind(acting_user)
        .fetch_one(&mut *tx)
        .await?;

        let items = Self::insert_items(&mut tx, template.id, &input.items).await?;

        tx.commit().await?;

        Ok(TemplateWithItems { template, items })
    }

    /// Archive a template without replacing it
    pub async fn archive_template(&self, template_id: Uuid) -> AppResult<ChecklistTemplate> {
        let archived = sqlx::query_as::<_, ChecklistTemplate>(&format!(
            r#"
            UPDATE checklist_templates
            SET status = 'archived', updated_at = NOW()
            WHERE id = $1 AND status = 'active'
            RETURNING {TEMPLATE_COLUMNS}
            "#
        ))
        .bind(template_id)
        .fetch_optional(&self.db)
        .await?;

        match archived {
            Some(template) => Ok(template),
            None => {
                let exists: bool = sqlx::query_scalar(
                    "SELECT EXISTS(SELECT 1 FROM checklist_templates WHERE id = $1)",
                )
                .bind(template_id)
                .fetch_one(&self.db)
                .await?;
                if exists {
                    Err(AppError::InvalidState {
                        entity: "ChecklistTemplate",
                        id: template_id.to_string(),
                        message: "already archived".to_string(),
                    })
                } else {
                    Err(AppError::NotFound("Checklist template".to_string()))
                }
            }
        }
    }

    /// Get a template with its ordered items
    pub async fn get_template(&self, template_id: Uuid) -> AppResult<TemplateWithItems> {
        let template = sqlx::query_as::<_, ChecklistTemplate>(&format!(
            "SELECT {TEMPLATE_COLUMNS} FROM checklist_templates WHERE id = $1"
        ))
        .bind(template_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Checklist template".to_string()))?;

        let items = sqlx::query_as::<_, ChecklistItem>(&format!(
            r#"
            SELECT {ITEM_COLUMNS} FROM checklist_items
            WHERE template_id = $1
            ORDER BY display_order ASC
            "#
        ))
        .bind(template_id)
        .fetch_all(&self.db)
        .await?;

        Ok(TemplateWithItems { template, items })
    }

    /// List templates, optionally only active versions
    pub async fn list_templates(
        &self,
        active_only: bool,
        inspection_type: Option<InspectionType>,
    ) -> AppResult<Vec<ChecklistTemplate>> {
        let templates = sqlx::query_as::<_, ChecklistTemplate>(&format!(
            r#"
            SELECT {TEMPLATE_COLUMNS} FROM checklist_templates
            WHERE ($1 = false OR status = 'active')
              AND ($2::varchar IS NULL OR inspection_type = $2)
            ORDER BY inspection_type ASC, name ASC, version DESC
            "#
        ))
        .bind(active_only)
        .bind(inspection_type.map(|t| t.as_str()))
        .fetch_all(&self.db)
        .await?;

        Ok(templates)
    }

    fn validate_items(items: &[ChecklistItemInput]) -> AppResult<()> {
        if items.is_empty() {
            return Err(AppError::Validation {
                field: "items".to_string(),
                message: "A template requires at least one item".to_string(),
                message_th: "แบบรายการตรวจต้องมีรายการอย่างน้อยหนึ่งรายการ".to_string(),
            });
        }

        for item in items {
            if validate_required_text(&item.requirement).is_err() {
                return Err(AppError::Validation {
                    field: "requirement".to_string(),
                    message: "Item requirement text is required".to_string(),
                    message_th: "ต้องระบุข้อกำหนดของรายการตรวจ".to_string(),
                });
            }
            if let Err(reason) = validate_points_possible(item.points_possible) {
                return Err(AppError::Validation {
                    field: "points_possible".to_string(),
                    message: reason.to_string(),
                    message_th: "คะแนนของรายการตรวจไม่ถูกต้อง".to_string(),
                });
            }
        }

        Ok(())
    }

    async fn insert_items(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        template_id: Uuid,
        items: &[ChecklistItemInput],
    ) -> AppResult<Vec<ChecklistItem>> {
        let mut stored = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let display_order = item.display_order.unwrap_or(index as i32 + 1);
            let row = sqlx::query_as::<_, ChecklistItem>(&format!(
                r#"
                INSERT INTO checklist_items (
                    template_id, category, requirement, requirement_th,
                    is_mandatory, points_possible, display_order
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING {ITEM_COLUMNS}
                "#
            ))
            .bind(template_id)
            .bind(&item.category)
            .bind(&item.requirement)
            .bind(&item.requirement_th)
            .bind(item.is_mandatory.unwrap_or(false))
            .bind(item.points_possible)
            .bind(display_order)
            .fetch_one(&mut **tx)
            .await?;
            stored.push(row);
        }

        Ok(stored)
    }
}
