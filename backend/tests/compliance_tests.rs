//! Tests for the compliance status rule
//!
//! The synchronizer writes whatever the rule decides, so the rule carries
//! the invariant: non_compliant iff at least one unresolved blocking
//! violation.

use shared::{ComplianceRule, ComplianceStatus, ViolationSeverity};

mod default_rule {
    use super::*;

    #[test]
    fn no_unresolved_violations_is_compliant() {
        let rule = ComplianceRule::default();
        assert_eq!(rule.status_for(&[]), ComplianceStatus::Compliant);
    }

    #[test]
    fn open_minor_and_major_do_not_block() {
        let rule = ComplianceRule::default();
        let unresolved = [ViolationSeverity::Minor, ViolationSeverity::Major];
        assert_eq!(rule.status_for(&unresolved), ComplianceStatus::Compliant);
    }

    #[test]
    fn single_critical_blocks() {
        let rule = ComplianceRule::default();
        let unresolved = [ViolationSeverity::Critical];
        assert_eq!(rule.status_for(&unresolved), ComplianceStatus::NonCompliant);
    }

    #[test]
    fn minor_plus_critical_blocks_until_critical_resolved() {
        // Establishment with one minor and one critical open violation
        let rule = ComplianceRule::default();
        let unresolved = [ViolationSeverity::Minor, ViolationSeverity::Critical];
        assert_eq!(rule.status_for(&unresolved), ComplianceStatus::NonCompliant);

        // After resolving the critical one, only the minor remains
        let remaining = [ViolationSeverity::Minor];
        assert_eq!(rule.status_for(&remaining), ComplianceStatus::Compliant);
    }

    #[test]
    fn status_is_idempotent_for_the_same_input() {
        let rule = ComplianceRule::default();
        let unresolved = [ViolationSeverity::Critical, ViolationSeverity::Minor];
        let first = rule.status_for(&unresolved);
        let second = rule.status_for(&unresolved);
        assert_eq!(first, second);
    }

    #[test]
    fn order_of_violations_does_not_matter() {
        let rule = ComplianceRule::default();
        let one_way = [
            ViolationSeverity::Minor,
            ViolationSeverity::Critical,
            ViolationSeverity::Major,
        ];
        let other_way = [
            ViolationSeverity::Critical,
            ViolationSeverity::Major,
            ViolationSeverity::Minor,
        ];
        assert_eq!(rule.status_for(&one_way), rule.status_for(&other_way));
    }
}

mod configured_rule {
    use super::*;

    #[test]
    fn rule_can_treat_major_as_blocking() {
        let rule = ComplianceRule::new(vec![
            ViolationSeverity::Critical,
            ViolationSeverity::Major,
        ]);
        assert_eq!(
            rule.status_for(&[ViolationSeverity::Major]),
            ComplianceStatus::NonCompliant
        );
        assert_eq!(
            rule.status_for(&[ViolationSeverity::Minor]),
            ComplianceStatus::Compliant
        );
    }

    #[test]
    fn is_blocking_matches_configured_set() {
        let rule = ComplianceRule::new(vec![ViolationSeverity::Major]);
        assert!(rule.is_blocking(ViolationSeverity::Major));
        assert!(!rule.is_blocking(ViolationSeverity::Critical));
        assert!(!rule.is_blocking(ViolationSeverity::Minor));
    }

    #[test]
    fn default_blocks_critical_only() {
        let rule = ComplianceRule::default();
        assert!(rule.is_blocking(ViolationSeverity::Critical));
        assert!(!rule.is_blocking(ViolationSeverity::Major));
        assert!(!rule.is_blocking(ViolationSeverity::Minor));
    }
}
