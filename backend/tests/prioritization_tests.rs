//! Tests for dispatch urgency ranking and ordering

use chrono::NaiveDate;

use shared::{urgency_rank, ComplianceStatus, InspectionPriority, RiskCategory};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

mod ranks {
    use super::*;

    #[test]
    fn high_risk_establishment_ranks_first() {
        assert_eq!(
            urgency_rank(
                RiskCategory::High,
                InspectionPriority::Low,
                ComplianceStatus::Compliant
            ),
            1
        );
    }

    #[test]
    fn high_risk_dominates_urgent_priority_and_non_compliance() {
        assert_eq!(
            urgency_rank(
                RiskCategory::High,
                InspectionPriority::Urgent,
                ComplianceStatus::NonCompliant
            ),
            1
        );
    }

    #[test]
    fn urgent_priority_ranks_second() {
        assert_eq!(
            urgency_rank(
                RiskCategory::Medium,
                InspectionPriority::Urgent,
                ComplianceStatus::Compliant
            ),
            2
        );
    }

    #[test]
    fn non_compliant_establishment_ranks_third() {
        assert_eq!(
            urgency_rank(
                RiskCategory::Low,
                InspectionPriority::Medium,
                ComplianceStatus::NonCompliant
            ),
            3
        );
    }

    #[test]
    fn everything_else_ranks_fourth() {
        assert_eq!(
            urgency_rank(
                RiskCategory::Low,
                InspectionPriority::Medium,
                ComplianceStatus::Compliant
            ),
            4
        );
        assert_eq!(
            urgency_rank(
                RiskCategory::Medium,
                InspectionPriority::High,
                ComplianceStatus::Pending
            ),
            4
        );
    }

    #[test]
    fn rank_always_between_one_and_four() {
        for risk in [RiskCategory::Low, RiskCategory::Medium, RiskCategory::High] {
            for priority in [
                InspectionPriority::Low,
                InspectionPriority::Medium,
                InspectionPriority::High,
                InspectionPriority::Urgent,
            ] {
                for compliance in [
                    ComplianceStatus::Pending,
                    ComplianceStatus::Compliant,
                    ComplianceStatus::NonCompliant,
                    ComplianceStatus::Suspended,
                ] {
                    let rank = urgency_rank(risk, priority, compliance);
                    assert!((1..=4).contains(&rank));
                }
            }
        }
    }
}

mod ordering {
    use super::*;

    #[derive(Debug, PartialEq, Eq, Clone)]
    struct Candidate {
        label: &'static str,
        rank: u8,
        scheduled_date: NaiveDate,
    }

    /// The service sorts an insertion-ordered fetch with a stable sort by
    /// (rank, scheduled_date); this mirrors that ordering.
    fn order(mut candidates: Vec<Candidate>) -> Vec<&'static str> {
        candidates.sort_by_key(|c| (c.rank, c.scheduled_date));
        candidates.into_iter().map(|c| c.label).collect()
    }

    #[test]
    fn high_risk_then_urgent_then_remainder_by_date() {
        // Establishments of risk {low, high, medium} with priorities
        // {medium, low, urgent}, all compliant
        let day = date(2025, 6, 10);
        let candidates = vec![
            Candidate {
                label: "low-risk-medium-priority",
                rank: urgency_rank(
                    RiskCategory::Low,
                    InspectionPriority::Medium,
                    ComplianceStatus::Compliant,
                ),
                scheduled_date: day,
            },
            Candidate {
                label: "high-risk-low-priority",
                rank: urgency_rank(
                    RiskCategory::High,
                    InspectionPriority::Low,
                    ComplianceStatus::Compliant,
                ),
                scheduled_date: day,
            },
            Candidate {
                label: "medium-risk-urgent-priority",
                rank: urgency_rank(
                    RiskCategory::Medium,
                    InspectionPriority::Urgent,
                    ComplianceStatus::Compliant,
                ),
                scheduled_date: day,
            },
        ];

        assert_eq!(
            order(candidates),
            vec![
                "high-risk-low-priority",
                "medium-risk-urgent-priority",
                "low-risk-medium-priority",
            ]
        );
    }

    #[test]
    fn equal_ranks_order_by_scheduled_date() {
        let candidates = vec![
            Candidate {
                label: "later",
                rank: 4,
                scheduled_date: date(2025, 6, 12),
            },
            Candidate {
                label: "earlier",
                rank: 4,
                scheduled_date: date(2025, 6, 9),
            },
        ];

        assert_eq!(order(candidates), vec!["earlier", "later"]);
    }

    #[test]
    fn full_ties_keep_insertion_order() {
        // Two equally urgent inspections on the same day must not reorder
        // between calls
        let day = date(2025, 6, 10);
        let candidates = vec![
            Candidate {
                label: "first-inserted",
                rank: 2,
                scheduled_date: day,
            },
            Candidate {
                label: "second-inserted",
                rank: 2,
                scheduled_date: day,
            },
        ];

        assert_eq!(order(candidates), vec!["first-inserted", "second-inserted"]);
    }
}
