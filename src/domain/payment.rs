use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Minor;

/// The reference a payment is resolved through. Exactly one is supplied
/// by the caller; the amount is always derived from the package price it
/// leads to, never taken from caller input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentSource {
    /// Pay for a recorded service; the price comes from the record's package.
    ServiceRecord(i64),
    /// Pay for a package directly, without a service record.
    Package(i64),
}

/// A payment is an append-only ledger entry recording money collected.
/// Payments are immutable once recorded; the amount paid is a snapshot
/// of the resolved package price at creation time, so later catalog
/// repricing never rewrites history.
///
/// When the payment was resolved through a service record, the record's
/// package number is stored alongside the record reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub payment_number: i64,
    pub record_number: Option<i64>,
    pub package_number: Option<i64>,
    pub amount_paid: Minor,
    pub payment_date: DateTime<Utc>,
}

impl Payment {
    pub fn source(&self) -> Option<PaymentSource> {
        match (self.record_number, self.package_number) {
            (Some(record), _) => Some(PaymentSource::ServiceRecord(record)),
            (None, Some(package)) => Some(PaymentSource::Package(package)),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_prefers_service_record() {
        let payment = Payment {
            payment_number: 1,
            record_number: Some(7),
            package_number: Some(2),
            amount_paid: 500000,
            payment_date: Utc::now(),
        };
        assert_eq!(payment.source(), Some(PaymentSource::ServiceRecord(7)));
    }

    #[test]
    fn test_source_package_only() {
        let payment = Payment {
            payment_number: 1,
            record_number: None,
            package_number: Some(2),
            amount_paid: 500000,
            payment_date: Utc::now(),
        };
        assert_eq!(payment.source(), Some(PaymentSource::Package(2)));
    }
}
