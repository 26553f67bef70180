//! Risk scoring strategy
//!
//! The risk category feeding dispatch prioritization is produced by a
//! pluggable scorer. The default is a fixed, deterministic heuristic; a
//! predictive model can replace it behind the same trait without touching
//! lifecycle code.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{EstablishmentType, RiskCategory};

/// Aggregated history the scorer judges an establishment by
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstablishmentHistory {
    pub establishment_type: EstablishmentType,
    pub completed_inspections: i64,
    /// Average score over completed inspections, when any were scored
    pub average_score: Option<Decimal>,
    pub unresolved_minor: i64,
    pub unresolved_major: i64,
    pub unresolved_critical: i64,
    /// None when the establishment has never had a completed inspection
    pub days_since_last_inspection: Option<i64>,
}

/// Outcome of a risk assessment
#[derive(Debug, Clone, Serialize)]
pub struct RiskAssessment {
    pub category: RiskCategory,
    pub points: i64,
    pub rationale: String,
}

/// Capability: judge an establishment's history into a risk category
pub trait RiskScorer {
    fn score(&self, history: &EstablishmentHistory) -> RiskAssessment;
}

/// Deterministic weighted-points heuristic
///
/// Weights: unresolved critical 10, major 4, minor 1; poor recent scores
/// and stale or missing inspection history add points; food handling adds
/// a constant. Thresholds: >=15 high, >=6 medium, else low.
pub struct HeuristicRiskScorer;

const HIGH_THRESHOLD: i64 = 15;
const MEDIUM_THRESHOLD: i64 = 6;

impl RiskScorer for HeuristicRiskScorer {
    fn score(&self, history: &EstablishmentHistory) -> RiskAssessment {
        let mut points: i64 = 0;
        let mut factors: Vec<String> = Vec::new();

        let violation_points = history.unresolved_critical * 10
            + history.unresolved_major * 4
            + history.unresolved_minor;
        if violation_points > 0 {
            points += violation_points;
            factors.push(format!(
                "{} unresolved violation(s) ({} critical, {} major, {} minor)",
                history.unresolved_critical + history.unresolved_major + history.unresolved_minor,
                history.unresolved_critical,
                history.unresolved_major,
                history.unresolved_minor
            ));
        }

        match history.average_score {
            Some(score) if score < Decimal::from(60) => {
                points += 8;
                factors.push(format!("average inspection score {} below 60", score));
            }
            Some(score) if score < Decimal::from(75) => {
                points += 4;
                factors.push(format!("average inspection score {} below 75", score));
            }
            _ => {}
        }

        match history.days_since_last_inspection {
            None => {
                points += 5;
                factors.push("never inspected".to_string());
            }
            Some(days) if days > 365 => {
                points += 3;
                factors.push(format!("last inspection {} days ago", days));
            }
            _ => {}
        }

        if history.establishment_type.handles_food() {
            points += 2;
            factors.push("food-handling establishment".to_string());
        }

        let category = if points >= HIGH_THRESHOLD {
            RiskCategory::High
        } else if points >= MEDIUM_THRESHOLD {
            RiskCategory::Medium
        } else {
            RiskCategory::Low
        };

        let rationale = if factors.is_empty() {
            "no elevated risk factors".to_string()
        } else {
            factors.join("; ")
        };

        RiskAssessment {
            category,
            points,
            rationale,
        }
    }
}
