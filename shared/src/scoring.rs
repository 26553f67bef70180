//! Checklist scoring engine
//!
//! Pure functions: no persistence, no clock. The inspection service feeds
//! the pinned template's items and the recorded responses in at completion
//! time and stores what comes out.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::{ChecklistItem, ResponseValue};

/// Qualitative rating derived from the percentage score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InspectionRating {
    Excellent,
    Good,
    Fair,
    NeedsImprovement,
}

impl InspectionRating {
    pub fn as_str(&self) -> &'static str {
        match self {
            InspectionRating::Excellent => "excellent",
            InspectionRating::Good => "good",
            InspectionRating::Fair => "fair",
            InspectionRating::NeedsImprovement => "needs_improvement",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "excellent" => Some(InspectionRating::Excellent),
            "good" => Some(InspectionRating::Good),
            "fair" => Some(InspectionRating::Fair),
            "needs_improvement" => Some(InspectionRating::NeedsImprovement),
            _ => None,
        }
    }

    pub fn display_name_th(&self) -> &'static str {
        match self {
            InspectionRating::Excellent => "ดีเยี่ยม",
            InspectionRating::Good => "ดี",
            InspectionRating::Fair => "พอใช้",
            InspectionRating::NeedsImprovement => "ต้องปรับปรุง",
        }
    }
}

impl std::fmt::Display for InspectionRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InspectionRating::Excellent => write!(f, "Excellent"),
            InspectionRating::Good => write!(f, "Good"),
            InspectionRating::Fair => write!(f, "Fair"),
            InspectionRating::NeedsImprovement => write!(f, "Needs Improvement"),
        }
    }
}

/// Result of scoring a set of responses against a checklist
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistScore {
    pub earned_points: i32,
    pub total_points: i32,
    pub percentage: Decimal,
    pub rating: InspectionRating,
}

/// Rating thresholds: >=90 Excellent, >=75 Good, >=60 Fair, else
/// NeedsImprovement
pub fn rating_for(percentage: Decimal) -> InspectionRating {
    if percentage >= Decimal::from(90) {
        InspectionRating::Excellent
    } else if percentage >= Decimal::from(75) {
        InspectionRating::Good
    } else if percentage >= Decimal::from(60) {
        InspectionRating::Fair
    } else {
        InspectionRating::NeedsImprovement
    }
}

/// Score recorded responses against the checklist items they answer.
///
/// `responses` are (checklist_item_id, response) pairs. Items without a
/// recorded response do not count toward the total; `pass` earns the item's
/// points, `fail` and `na` earn zero. The percentage is rounded to two
/// decimals and is 0 when no answered item carries points.
pub fn score_responses(
    items: &[ChecklistItem],
    responses: &[(Uuid, ResponseValue)],
) -> ChecklistScore {
    let by_item: HashMap<Uuid, ResponseValue> = responses.iter().copied().collect();

    let mut earned_points = 0;
    let mut total_points = 0;
    for item in items {
        let Some(response) = by_item.get(&item.id) else {
            continue;
        };
        total_points += item.points_possible;
        if *response == ResponseValue::Pass {
            earned_points += item.points_possible;
        }
    }

    let percentage = if total_points == 0 {
        Decimal::ZERO
    } else {
        (Decimal::from(earned_points) * Decimal::from(100) / Decimal::from(total_points))
            .round_dp(2)
    };

    ChecklistScore {
        earned_points,
        total_points,
        percentage,
        rating: rating_for(percentage),
    }
}
