use serde::Serialize;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::SubscriptionRecord;
use crate::services::chart::format_currency;

/// Flat table/export row for one subscription.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubscriptionRow {
    pub subscription_name: String,
    pub vendor_name: String,
    pub department: Option<String>,
    pub category: Option<String>,
    pub frequency: String,
    pub start_date: String,
    pub end_date: String,
    pub next_due_date: Option<String>,
    pub contract_amount: f64,
    pub contract_amount_formatted: String,
    pub vendor_profile: Option<&'static str>,
    pub active: bool,
}

impl From<&SubscriptionRecord> for SubscriptionRow {
    fn from(record: &SubscriptionRecord) -> Self {
        Self {
            subscription_name: record.subscription_name.clone(),
            vendor_name: record.vendor_name.clone(),
            department: record.department_name().map(str::to_string),
            category: record.category_name().map(str::to_string),
            frequency: record.subscription_frequency.clone(),
            start_date: record.subscription_start_date.format("%Y-%m-%d").to_string(),
            end_date: record.subscription_end_date.format("%Y-%m-%d").to_string(),
            next_due_date: record
                .next_due_date
                .map(|d| d.format("%Y-%m-%d").to_string()),
            contract_amount: record.amount(),
            contract_amount_formatted: format_currency(record.amount()),
            vendor_profile: record.vendor_profile.map(|p| p.label()),
            active: record.is_active(),
        }
    }
}

/// Render rows as CSV with a header line.
pub fn rows_to_csv(rows: &[SubscriptionRow]) -> AppResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV buffer error: {}", e)))?;
    debug!(rows = rows.len(), bytes = bytes.len(), "Rendered CSV export");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContractAmount, Department, VendorProfile};
    use chrono::NaiveDate;

    fn record() -> SubscriptionRecord {
        SubscriptionRecord {
            subscription_name: "Design, Suite".into(),
            vendor_name: "Acme".into(),
            subscription_start_date: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            subscription_end_date: NaiveDate::from_ymd_opt(2025, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            subscription_frequency: "12 Months".into(),
            subscription_contract_amount: ContractAmount { value: 1500.0 },
            department_names: Some(Department {
                name: "Engineering".into(),
                budget: None,
            }),
            vendor_profile: Some(VendorProfile::Operational),
            ..Default::default()
        }
    }

    #[test]
    fn test_row_from_record() {
        let row = SubscriptionRow::from(&record());
        assert_eq!(row.start_date, "2024-01-01");
        assert_eq!(row.department.as_deref(), Some("Engineering"));
        assert_eq!(row.category, None);
        assert_eq!(row.contract_amount_formatted, "$1,500.00");
        assert_eq!(row.vendor_profile, Some("Operational"));
        assert!(row.active);
    }

    #[test]
    fn test_rows_to_csv() {
        let rows = vec![SubscriptionRow::from(&record())];
        let csv = String::from_utf8(rows_to_csv(&rows).unwrap()).unwrap();
        let mut lines = csv.lines();

        let header = lines.next().unwrap();
        assert!(header.starts_with("subscription_name,vendor_name,department"));
        let line = lines.next().unwrap();
        assert!(line.starts_with("\"Design, Suite\",Acme,Engineering,,12 Months"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_empty_export_has_no_rows() {
        let csv = rows_to_csv(&[]).unwrap();
        assert!(csv.is_empty());
    }
}
