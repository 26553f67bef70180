//! Dispatch urgency ranking
//!
//! Lower rank means more urgent. Ordering within a rank is by scheduled
//! date, then insertion order; the caller must use a stable sort over an
//! insertion-ordered list so equally urgent inspections never reorder
//! between calls.

use crate::models::{ComplianceStatus, InspectionPriority, RiskCategory};

/// Rank a pending inspection for dispatch:
/// 1 = high-risk establishment, 2 = urgent priority,
/// 3 = non-compliant establishment, 4 = everything else.
pub fn urgency_rank(
    risk_category: RiskCategory,
    priority: InspectionPriority,
    compliance_status: ComplianceStatus,
) -> u8 {
    if risk_category == RiskCategory::High {
        1
    } else if priority == InspectionPriority::Urgent {
        2
    } else if compliance_status == ComplianceStatus::NonCompliant {
        3
    } else {
        4
    }
}
