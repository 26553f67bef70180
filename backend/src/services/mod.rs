//! Business logic services for the Health & Sanitation Inspection Platform

pub mod certificate;
pub mod checklist;
pub mod compliance;
pub mod establishment;
pub mod inspection;
pub mod prioritization;
pub mod reporting;
pub mod sequence;
pub mod violation;
