//! Tests for reference number formats
//!
//! The counter value comes from the database; formatting and parsing are
//! pure and verified here, including zero-padding and period scoping.

use chrono::NaiveDate;

use shared::{format_reference, parse_reference, SequenceScope};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

mod formatting {
    use super::*;

    #[test]
    fn inspection_reference_is_year_month_scoped_and_four_padded() {
        let period = SequenceScope::Inspection.period_key(date(2025, 6, 10));
        assert_eq!(period, "2025-06");
        assert_eq!(
            format_reference(SequenceScope::Inspection, &period, 7),
            "HSI-2025-06-0007"
        );
    }

    #[test]
    fn establishment_reference_is_year_scoped_and_five_padded() {
        let period = SequenceScope::Establishment.period_key(date(2025, 6, 10));
        assert_eq!(period, "2025");
        assert_eq!(
            format_reference(SequenceScope::Establishment, &period, 12),
            "EST-2025-00012"
        );
    }

    #[test]
    fn certificate_reference_is_year_scoped_and_six_padded() {
        let period = SequenceScope::Certificate.period_key(date(2025, 1, 2));
        assert_eq!(
            format_reference(SequenceScope::Certificate, &period, 123),
            "CERT-2025-000123"
        );
    }

    #[test]
    fn sequences_wider_than_the_pad_are_not_truncated() {
        assert_eq!(
            format_reference(SequenceScope::Inspection, "2025-06", 123_456),
            "HSI-2025-06-123456"
        );
    }

    #[test]
    fn zero_padding_keeps_lexicographic_order_within_a_period() {
        let earlier = format_reference(SequenceScope::Inspection, "2025-06", 7);
        let later = format_reference(SequenceScope::Inspection, "2025-06", 12);
        assert!(earlier < later);
    }

    #[test]
    fn december_rolls_into_a_new_period_next_year() {
        let december = SequenceScope::Inspection.period_key(date(2025, 12, 31));
        let january = SequenceScope::Inspection.period_key(date(2026, 1, 1));
        assert_eq!(december, "2025-12");
        assert_eq!(january, "2026-01");
        assert_ne!(december, january);
    }
}

mod parsing {
    use super::*;

    #[test]
    fn round_trips_every_scope() {
        for (scope, seq) in [
            (SequenceScope::Inspection, 7),
            (SequenceScope::Establishment, 12),
            (SequenceScope::Certificate, 123),
        ] {
            let period = scope.period_key(date(2025, 6, 10));
            let formatted = format_reference(scope, &period, seq);
            let parsed = parse_reference(&formatted).unwrap();
            assert_eq!(parsed.scope, scope);
            assert_eq!(parsed.period_key, period);
            assert_eq!(parsed.sequence, seq);
        }
    }

    #[test]
    fn rejects_unknown_prefixes() {
        assert!(parse_reference("XYZ-2025-06-0007").is_none());
    }

    #[test]
    fn rejects_inspection_reference_without_month() {
        assert!(parse_reference("HSI-2025-0007").is_none());
    }

    #[test]
    fn rejects_month_out_of_range() {
        assert!(parse_reference("HSI-2025-13-0007").is_none());
    }

    #[test]
    fn rejects_underpadded_sequences() {
        assert!(parse_reference("CERT-2025-123").is_none());
    }

    #[test]
    fn rejects_non_numeric_sequences() {
        assert!(parse_reference("EST-2025-00a12").is_none());
        assert!(parse_reference("garbage").is_none());
        assert!(parse_reference("").is_none());
    }
}
