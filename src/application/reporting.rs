use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Minor;

/// One payment in the revenue report. Car and package fields are
/// nullable: the report never drops a payment because a join failed to
/// resolve.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyReportRow {
    pub payment_number: i64,
    pub plate_number: Option<String>,
    pub package_name: Option<String>,
    pub package_description: Option<String>,
    pub amount_paid: Minor,
    pub payment_date: DateTime<Utc>,
}

/// Revenue report for an inclusive date window, rows newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub count: usize,
    pub data: Vec<DailyReportRow>,
}

impl DailyReport {
    /// Total revenue across the report window.
    pub fn total(&self) -> Minor {
        self.data.iter().map(|row| row.amount_paid).sum()
    }
}
