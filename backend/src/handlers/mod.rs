//! HTTP handlers for the Health & Sanitation Inspection Platform

mod certificate;
mod checklist;
mod establishment;
mod health;
mod inspection;
mod reporting;
mod schedule;
mod violation;

pub use certificate::*;
pub use checklist::*;
pub use establishment::*;
pub use health::*;
pub use inspection::*;
pub use reporting::*;
pub use schedule::*;
pub use violation::*;
