//! Tests for the checklist scoring engine

use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use shared::{rating_for, score_responses, ChecklistItem, InspectionRating, ResponseValue};

/// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

/// Helper to build a checklist item worth `points`
fn item(id: Uuid, points: i32) -> ChecklistItem {
    ChecklistItem {
        id,
        template_id: Uuid::nil(),
        category: "sanitation".to_string(),
        requirement: "Food-contact surfaces cleaned and sanitized".to_string(),
        requirement_th: None,
        is_mandatory: false,
        points_possible: points,
        display_order: 0,
    }
}

// =============================================================================
// Percentage and points
// =============================================================================

mod percentage {
    use super::*;

    #[test]
    fn ten_items_eight_pass_two_fail_scores_eighty_good() {
        // Reference scenario: 10 items x 10 points, 8 pass, 2 fail
        let items: Vec<ChecklistItem> = (0..10).map(|_| item(Uuid::new_v4(), 10)).collect();
        let responses: Vec<(Uuid, ResponseValue)> = items
            .iter()
            .enumerate()
            .map(|(i, it)| {
                let response = if i < 8 {
                    ResponseValue::Pass
                } else {
                    ResponseValue::Fail
                };
                (it.id, response)
            })
            .collect();

        let score = score_responses(&items, &responses);
        assert_eq!(score.earned_points, 80);
        assert_eq!(score.total_points, 100);
        assert_eq!(score.percentage, dec("80.0"));
        assert_eq!(score.rating, InspectionRating::Good);
    }

    #[test]
    fn no_answered_items_scores_zero_without_dividing() {
        let items: Vec<ChecklistItem> = (0..5).map(|_| item(Uuid::new_v4(), 10)).collect();

        let score = score_responses(&items, &[]);
        assert_eq!(score.earned_points, 0);
        assert_eq!(score.total_points, 0);
        assert_eq!(score.percentage, Decimal::ZERO);
        assert_eq!(score.rating, InspectionRating::NeedsImprovement);
    }

    #[test]
    fn unanswered_items_do_not_count_toward_total() {
        let answered = item(Uuid::new_v4(), 10);
        let unanswered = item(Uuid::new_v4(), 90);
        let responses = vec![(answered.id, ResponseValue::Pass)];

        let score = score_responses(&[answered, unanswered], &responses);
        assert_eq!(score.earned_points, 10);
        assert_eq!(score.total_points, 10);
        assert_eq!(score.percentage, dec("100.0"));
    }

    #[test]
    fn na_counts_toward_total_but_earns_nothing() {
        let first = item(Uuid::new_v4(), 10);
        let second = item(Uuid::new_v4(), 10);
        let responses = vec![
            (first.id, ResponseValue::Pass),
            (second.id, ResponseValue::Na),
        ];

        let score = score_responses(&[first, second], &responses);
        assert_eq!(score.earned_points, 10);
        assert_eq!(score.total_points, 20);
        assert_eq!(score.percentage, dec("50.0"));
    }

    #[test]
    fn responses_for_unknown_items_are_ignored() {
        let known = item(Uuid::new_v4(), 10);
        let responses = vec![
            (known.id, ResponseValue::Pass),
            (Uuid::new_v4(), ResponseValue::Pass),
        ];

        let score = score_responses(&[known], &responses);
        assert_eq!(score.earned_points, 10);
        assert_eq!(score.total_points, 10);
    }

    #[test]
    fn percentage_rounds_to_two_decimals() {
        // 1 of 3 single-point items passing: 33.333... -> 33.33
        let items: Vec<ChecklistItem> = (0..3).map(|_| item(Uuid::new_v4(), 1)).collect();
        let responses: Vec<(Uuid, ResponseValue)> = items
            .iter()
            .enumerate()
            .map(|(i, it)| {
                let response = if i == 0 {
                    ResponseValue::Pass
                } else {
                    ResponseValue::Fail
                };
                (it.id, response)
            })
            .collect();

        let score = score_responses(&items, &responses);
        assert_eq!(score.percentage, dec("33.33"));
    }
}

// =============================================================================
// Rating thresholds
// =============================================================================

mod rating_thresholds {
    use super::*;

    #[test]
    fn ninety_and_above_is_excellent() {
        assert_eq!(rating_for(dec("90")), InspectionRating::Excellent);
        assert_eq!(rating_for(dec("100")), InspectionRating::Excellent);
    }

    #[test]
    fn seventy_five_to_below_ninety_is_good() {
        assert_eq!(rating_for(dec("75")), InspectionRating::Good);
        assert_eq!(rating_for(dec("89.99")), InspectionRating::Good);
    }

    #[test]
    fn sixty_to_below_seventy_five_is_fair() {
        assert_eq!(rating_for(dec("60")), InspectionRating::Fair);
        assert_eq!(rating_for(dec("74.99")), InspectionRating::Fair);
    }

    #[test]
    fn below_sixty_needs_improvement() {
        assert_eq!(rating_for(dec("59.99")), InspectionRating::NeedsImprovement);
        assert_eq!(rating_for(Decimal::ZERO), InspectionRating::NeedsImprovement);
    }
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn percentage_stays_within_bounds(specs in prop::collection::vec((1i32..=50, 0u8..3), 1..30)) {
        let mut items = Vec::new();
        let mut responses = Vec::new();
        for (points, choice) in specs {
            let id = Uuid::new_v4();
            items.push(item(id, points));
            let response = match choice {
                0 => ResponseValue::Pass,
                1 => ResponseValue::Fail,
                _ => ResponseValue::Na,
            };
            responses.push((id, response));
        }

        let score = score_responses(&items, &responses);
        prop_assert!(score.percentage >= Decimal::ZERO);
        prop_assert!(score.percentage <= Decimal::from(100));
        prop_assert!(score.earned_points <= score.total_points);
    }

    #[test]
    fn rating_is_consistent_with_thresholds(percentage in 0u32..=100) {
        let rating = rating_for(Decimal::from(percentage));
        let expected = if percentage >= 90 {
            InspectionRating::Excellent
        } else if percentage >= 75 {
            InspectionRating::Good
        } else if percentage >= 60 {
            InspectionRating::Fair
        } else {
            InspectionRating::NeedsImprovement
        };
        prop_assert_eq!(rating, expected);
    }
}
