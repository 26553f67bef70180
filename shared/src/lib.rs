//! Shared types and domain logic for the Health & Sanitation Inspection
//! Platform
//!
//! This crate contains the models and the pure parts of the compliance
//! lifecycle: checklist scoring, the compliance rule, reference number
//! formats, risk scoring and dispatch ranking. Everything with a database
//! or a clock lives in the backend crate.

pub mod compliance;
pub mod models;
pub mod prioritization;
pub mod reference;
pub mod risk;
pub mod scoring;
pub mod types;
pub mod validation;

pub use compliance::*;
pub use models::*;
pub use prioritization::*;
pub use reference::*;
pub use risk::*;
pub use scoring::*;
pub use types::*;
pub use validation::*;
