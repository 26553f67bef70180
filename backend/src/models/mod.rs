//! Database models for the Health & Sanitation Inspection Platform
//!
//! Re-exports models from the shared crate and adds backend-specific models

pub use shared::models::*;
