//! Tests for certificate status derivation
//!
//! Expiry is never stored: verification derives the status from the
//! stored lifecycle state plus the expiry date at call time.

use chrono::NaiveDate;

use shared::{
    derive_certificate_status, CertificateStatus, DerivedCertificateStatus,
    EXPIRING_SOON_WINDOW_DAYS,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

const TODAY: (i32, u32, u32) = (2025, 6, 10);

fn today() -> NaiveDate {
    date(TODAY.0, TODAY.1, TODAY.2)
}

mod valid_certificates {
    use super::*;

    #[test]
    fn far_from_expiry_reads_valid() {
        let derived =
            derive_certificate_status(CertificateStatus::Valid, date(2026, 6, 10), today());
        assert_eq!(derived, DerivedCertificateStatus::Valid);
    }

    #[test]
    fn exactly_thirty_days_out_reads_expiring_soon() {
        let expiry = today() + chrono::Duration::days(EXPIRING_SOON_WINDOW_DAYS);
        let derived = derive_certificate_status(CertificateStatus::Valid, expiry, today());
        assert_eq!(derived, DerivedCertificateStatus::ExpiringSoon);
    }

    #[test]
    fn thirty_one_days_out_still_reads_valid() {
        let expiry = today() + chrono::Duration::days(EXPIRING_SOON_WINDOW_DAYS + 1);
        let derived = derive_certificate_status(CertificateStatus::Valid, expiry, today());
        assert_eq!(derived, DerivedCertificateStatus::Valid);
    }

    #[test]
    fn expiring_today_reads_expiring_soon_not_expired() {
        let derived = derive_certificate_status(CertificateStatus::Valid, today(), today());
        assert_eq!(derived, DerivedCertificateStatus::ExpiringSoon);
    }

    #[test]
    fn past_expiry_reads_expired() {
        let derived =
            derive_certificate_status(CertificateStatus::Valid, date(2025, 6, 9), today());
        assert_eq!(derived, DerivedCertificateStatus::Expired);
    }
}

mod stored_states_win {
    use super::*;

    #[test]
    fn revoked_wins_over_future_expiry() {
        let derived =
            derive_certificate_status(CertificateStatus::Revoked, date(2026, 6, 10), today());
        assert_eq!(derived, DerivedCertificateStatus::Revoked);
    }

    #[test]
    fn revoked_wins_over_past_expiry() {
        let derived =
            derive_certificate_status(CertificateStatus::Revoked, date(2024, 1, 1), today());
        assert_eq!(derived, DerivedCertificateStatus::Revoked);
    }

    #[test]
    fn suspended_wins_over_date_comparison() {
        let derived =
            derive_certificate_status(CertificateStatus::Suspended, date(2026, 6, 10), today());
        assert_eq!(derived, DerivedCertificateStatus::Suspended);
    }
}
