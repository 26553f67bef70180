//! Error handling for the Health & Sanitation Inspection Platform
//!
//! Provides consistent error responses in Thai and English. Business-rule
//! failures (invalid transition, invalid state, constraint violations) are
//! kept distinct from infrastructure failures so callers can tell an
//! invalid request apart from an unavailable system.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication / authorization inputs
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    // Validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_th: String,
    },

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Business-rule errors
    #[error("Invalid transition: {entity} {id} cannot {attempted} from state {current}")]
    InvalidTransition {
        entity: &'static str,
        id: String,
        current: String,
        attempted: &'static str,
    },

    #[error("Invalid state: {entity} {id}: {message}")]
    InvalidState {
        entity: &'static str,
        id: String,
        message: String,
    },

    #[error("Constraint violation on {resource}: {message}")]
    ConstraintViolation {
        resource: &'static str,
        message: String,
        message_th: String,
    },

    #[error("Sequence exhausted for {scope} in period {period}")]
    SequenceExhausted {
        scope: &'static str,
        period: String,
    },

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_th: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::Unauthorized(message) => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail {
                    code: "UNAUTHORIZED".to_string(),
                    message_en: message.clone(),
                    message_th: "ไม่ได้รับอนุญาต".to_string(),
                    field: None,
                },
            ),
            AppError::InsufficientPermissions => (
                StatusCode::FORBIDDEN,
                ErrorDetail {
                    code: "INSUFFICIENT_PERMISSIONS".to_string(),
                    message_en: "You do not have permission to perform this action".to_string(),
                    message_th: "คุณไม่มีสิทธิ์ในการดำเนินการนี้".to_string(),
                    field: None,
                },
            ),
            AppError::Validation {
                field,
                message,
                message_th,
            } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: message.clone(),
                    message_th: message_th.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message_en: format!("{} not found", resource),
                    message_th: format!("ไม่พบ {}", resource),
                    field: None,
                },
            ),
            AppError::InvalidTransition {
                entity,
                id,
                current,
                attempted,
            } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "INVALID_TRANSITION".to_string(),
                    message_en: format!(
                        "{} {} cannot {} from state {}",
                        entity, id, attempted, current
                    ),
                    message_th: format!(
                        "ไม่สามารถเปลี่ยนสถานะได้: {} {} อยู่ในสถานะ {}",
                        entity, id, current
                    ),
                    field: None,
                },
            ),
            AppError::InvalidState {
                entity,
                id,
                message,
            } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "INVALID_STATE".to_string(),
                    message_en: format!("{} {}: {}", entity, id, message),
                    message_th: format!("สถานะไม่ถูกต้อง: {} {}", entity, id),
                    field: None,
                },
            ),
            AppError::ConstraintViolation {
                resource,
                message,
                message_th,
            } => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "CONSTRAINT_VIOLATION".to_string(),
                    message_en: message.clone(),
                    message_th: message_th.clone(),
                    field: Some(resource.to_string()),
                },
            ),
            AppError::SequenceExhausted { scope, period } => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail {
                    code: "SEQUENCE_EXHAUSTED".to_string(),
                    message_en: format!(
                        "Could not allocate a {} reference number for period {} after repeated attempts",
                        scope, period
                    ),
                    message_th: format!(
                        "ไม่สามารถออกเลขที่อ้างอิง {} สำหรับงวด {} ได้",
                        scope, period
                    ),
                    field: None,
                },
            ),
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "DATABASE_ERROR".to_string(),
                    message_en: "A database error occurred".to_string(),
                    message_th: "เกิดข้อผิดพลาดกับฐานข้อมูล".to_string(),
                    field: None,
                },
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message_en: msg.clone(),
                    message_th: "เกิดข้อผิดพลาดภายในเซิร์ฟเวอร์".to_string(),
                    field: None,
                },
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// True when a database error is a Postgres unique-constraint violation
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db) = err {
        db.code().as_deref() == Some("23505")
    } else {
        false
    }
}

/// Constraint name of a database error, when present
pub fn violated_constraint(err: &sqlx::Error) -> Option<&str> {
    if let sqlx::Error::Database(db) = err {
        db.constraint()
    } else {
        None
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
