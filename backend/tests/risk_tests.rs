//! Tests for the heuristic risk scorer

use rust_decimal::Decimal;

use shared::{
    EstablishmentHistory, EstablishmentType, HeuristicRiskScorer, RiskCategory, RiskScorer,
};

fn history(establishment_type: EstablishmentType) -> EstablishmentHistory {
    EstablishmentHistory {
        establishment_type,
        completed_inspections: 4,
        average_score: Some(Decimal::from(95)),
        unresolved_minor: 0,
        unresolved_major: 0,
        unresolved_critical: 0,
        days_since_last_inspection: Some(30),
    }
}

#[test]
fn clean_non_food_history_is_low_risk() {
    let scorer = HeuristicRiskScorer;
    let assessment = scorer.score(&history(EstablishmentType::Salon));
    assert_eq!(assessment.category, RiskCategory::Low);
    assert_eq!(assessment.points, 0);
    assert_eq!(assessment.rationale, "no elevated risk factors");
}

#[test]
fn never_inspected_food_stall_is_medium_risk() {
    let scorer = HeuristicRiskScorer;
    let mut h = history(EstablishmentType::FoodStall);
    h.completed_inspections = 0;
    h.average_score = None;
    h.days_since_last_inspection = None;

    let assessment = scorer.score(&h);
    // 5 (never inspected) + 2 (food handling)
    assert_eq!(assessment.points, 7);
    assert_eq!(assessment.category, RiskCategory::Medium);
}

#[test]
fn unresolved_critical_and_major_push_into_high_risk() {
    let scorer = HeuristicRiskScorer;
    let mut h = history(EstablishmentType::Restaurant);
    h.unresolved_critical = 1;
    h.unresolved_major = 1;

    let assessment = scorer.score(&h);
    // 10 + 4 + 2 (food handling)
    assert_eq!(assessment.points, 16);
    assert_eq!(assessment.category, RiskCategory::High);
}

#[test]
fn poor_average_score_adds_weight() {
    let scorer = HeuristicRiskScorer;
    let mut h = history(EstablishmentType::Salon);
    h.average_score = Some(Decimal::from(55));

    let assessment = scorer.score(&h);
    assert_eq!(assessment.points, 8);
    assert_eq!(assessment.category, RiskCategory::Medium);
}

#[test]
fn stale_inspection_history_adds_weight() {
    let scorer = HeuristicRiskScorer;
    let mut h = history(EstablishmentType::Salon);
    h.days_since_last_inspection = Some(400);

    let assessment = scorer.score(&h);
    assert_eq!(assessment.points, 3);
    assert_eq!(assessment.category, RiskCategory::Low);
}

#[test]
fn scoring_is_deterministic() {
    let scorer = HeuristicRiskScorer;
    let mut h = history(EstablishmentType::FoodFactory);
    h.unresolved_minor = 3;
    h.average_score = Some(Decimal::from(70));

    let first = scorer.score(&h);
    let second = scorer.score(&h);
    assert_eq!(first.category, second.category);
    assert_eq!(first.points, second.points);
    assert_eq!(first.rationale, second.rationale);
}

#[test]
fn rationale_names_the_contributing_factors() {
    let scorer = HeuristicRiskScorer;
    let mut h = history(EstablishmentType::Restaurant);
    h.unresolved_critical = 2;

    let assessment = scorer.score(&h);
    assert!(assessment.rationale.contains("unresolved violation"));
    assert!(assessment.rationale.contains("food-handling"));
}
