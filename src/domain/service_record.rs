use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Minor;

/// A service event: a car undergoing a package service at a point in
/// time. Both references must resolve to existing rows when the record
/// is created; the references may later be re-pointed, the service date
/// never changes after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub record_number: i64,
    pub plate_number: String,
    pub package_number: i64,
    pub service_date: DateTime<Utc>,
}

impl ServiceRecord {
    /// Create a new service record dated now. The record number must be
    /// assigned by the repository.
    pub fn new(plate_number: impl Into<String>, package_number: i64) -> Self {
        Self {
            record_number: 0, // Will be set by repository
            plate_number: plate_number.into(),
            package_number,
            service_date: Utc::now(),
        }
    }
}

/// A service record joined with the car and package attributes the
/// counter displays alongside it. This is a read-time view produced by
/// the repository, not stored state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRecordDetail {
    pub record_number: i64,
    pub plate_number: String,
    pub driver_name: String,
    pub car_type: String,
    pub package_number: i64,
    pub package_name: String,
    pub package_price: Minor,
    pub service_date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_service_record_is_dated_now() {
        let before = Utc::now();
        let record = ServiceRecord::new("RAB123A", 1);
        let after = Utc::now();

        assert_eq!(record.record_number, 0);
        assert_eq!(record.plate_number, "RAB123A");
        assert!(record.service_date >= before && record.service_date <= after);
    }
}
