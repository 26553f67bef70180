//! Tests for the inspection state machine vocabulary and input validation
//!
//! The transitions themselves are conditional database updates; what can
//! be verified here is the state vocabulary they guard on and the
//! validation helpers the services apply before touching the store.

use shared::{
    validate_points_possible, validate_reference_number, validate_required_text,
    validate_validity_months, InspectionRating, InspectionStatus, ResponseValue,
    ViolationStatus, MAX_VALIDITY_MONTHS,
};

mod inspection_status {
    use super::*;

    #[test]
    fn as_str_round_trips() {
        for status in [
            InspectionStatus::Pending,
            InspectionStatus::InProgress,
            InspectionStatus::Completed,
            InspectionStatus::Cancelled,
        ] {
            assert_eq!(InspectionStatus::from_str(status.as_str()), Some(status));
        }
    }

    #[test]
    fn unknown_status_string_is_rejected() {
        assert_eq!(InspectionStatus::from_str("archived"), None);
        assert_eq!(InspectionStatus::from_str(""), None);
    }

    #[test]
    fn completed_and_cancelled_are_terminal() {
        assert!(InspectionStatus::Completed.is_terminal());
        assert!(InspectionStatus::Cancelled.is_terminal());
    }

    #[test]
    fn pending_and_in_progress_are_not_terminal() {
        assert!(!InspectionStatus::Pending.is_terminal());
        assert!(!InspectionStatus::InProgress.is_terminal());
    }
}

mod response_values {
    use super::*;

    #[test]
    fn as_str_round_trips() {
        for value in [ResponseValue::Pass, ResponseValue::Fail, ResponseValue::Na] {
            assert_eq!(ResponseValue::from_str(value.as_str()), Some(value));
        }
    }

    #[test]
    fn unknown_response_is_rejected() {
        assert_eq!(ResponseValue::from_str("maybe"), None);
    }
}

mod violation_status {
    use super::*;

    #[test]
    fn open_and_in_progress_are_unresolved() {
        assert!(ViolationStatus::Open.is_unresolved());
        assert!(ViolationStatus::InProgress.is_unresolved());
        assert!(!ViolationStatus::Resolved.is_unresolved());
    }
}

mod ratings {
    use super::*;

    #[test]
    fn display_strings() {
        assert_eq!(format!("{}", InspectionRating::Excellent), "Excellent");
        assert_eq!(format!("{}", InspectionRating::Good), "Good");
        assert_eq!(format!("{}", InspectionRating::Fair), "Fair");
        assert_eq!(
            format!("{}", InspectionRating::NeedsImprovement),
            "Needs Improvement"
        );
    }

    #[test]
    fn as_str_round_trips() {
        for rating in [
            InspectionRating::Excellent,
            InspectionRating::Good,
            InspectionRating::Fair,
            InspectionRating::NeedsImprovement,
        ] {
            assert_eq!(InspectionRating::from_str(rating.as_str()), Some(rating));
        }
    }
}

mod validation {
    use super::*;

    #[test]
    fn required_text_rejects_blank_values() {
        assert!(validate_required_text("Somchai's Noodle House").is_ok());
        assert!(validate_required_text("").is_err());
        assert!(validate_required_text("   ").is_err());
    }

    #[test]
    fn item_points_must_be_positive_and_bounded() {
        assert!(validate_points_possible(1).is_ok());
        assert!(validate_points_possible(100).is_ok());
        assert!(validate_points_possible(0).is_err());
        assert!(validate_points_possible(-5).is_err());
        assert!(validate_points_possible(101).is_err());
    }

    #[test]
    fn validity_months_must_fall_within_window() {
        assert!(validate_validity_months(1).is_ok());
        assert!(validate_validity_months(12).is_ok());
        assert!(validate_validity_months(MAX_VALIDITY_MONTHS).is_ok());
        assert!(validate_validity_months(0).is_err());
        assert!(validate_validity_months(MAX_VALIDITY_MONTHS + 1).is_err());
    }

    #[test]
    fn reference_numbers_must_match_known_formats() {
        assert!(validate_reference_number("HSI-2025-06-0001").is_ok());
        assert!(validate_reference_number("EST-2025-00012").is_ok());
        assert!(validate_reference_number("CERT-2025-000123").is_ok());
        assert!(validate_reference_number("FOO-1").is_err());
        assert!(validate_reference_number("").is_err());
    }
}
