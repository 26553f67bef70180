//! Domain models for the Health & Sanitation Inspection Platform

pub mod certificate;
pub mod checklist;
pub mod establishment;
pub mod inspection;
pub mod violation;

pub use certificate::*;
pub use checklist::*;
pub use establishment::*;
pub use inspection::*;
pub use violation::*;
