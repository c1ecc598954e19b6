//! One parameterized engine behind every chart view:
//! expand -> range filter -> aggregate -> adapt.
//!
//! Views differ only in their due-date guard, bucket key, default window and
//! gridline count. The vendor-grouped working set is built once per data load
//! by [`prepare_working_set`] and never mutated by a view.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use crate::date_utils::ViewWindow;
use crate::models::SubscriptionRecord;
use crate::services::aggregate::{
    aggregate_by_category, aggregate_by_key, by_department, by_month, by_vendor,
    by_vendor_profile, AmountRange,
};
use crate::services::chart::{budget_series, keyed_series, month_series, BudgetSeries, ChartSeries};
use crate::services::grouping::{group_by_vendor, remove_zero_span};
use crate::services::range_filter::filter_in_range;
use crate::services::recurrence::{expand_groups, DueDateGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewKind {
    MonthlySpend,
    Renewals,
    Department,
    Budget,
    Category,
    Vendor,
    VendorProfile,
}

impl FromStr for ViewKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monthly-spend" => Ok(Self::MonthlySpend),
            "renewals" => Ok(Self::Renewals),
            "department" => Ok(Self::Department),
            "budget" => Ok(Self::Budget),
            "category" => Ok(Self::Category),
            "vendor" => Ok(Self::Vendor),
            "vendor-profile" => Ok(Self::VendorProfile),
            _ => Err(()),
        }
    }
}

impl ViewKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MonthlySpend => "monthly-spend",
            Self::Renewals => "renewals",
            Self::Department => "department",
            Self::Budget => "budget",
            Self::Category => "category",
            Self::Vendor => "vendor",
            Self::VendorProfile => "vendor-profile",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::MonthlySpend => "Monthly Spend",
            Self::Renewals => "Upcoming Renewals",
            Self::Department => "Spend by Department",
            Self::Budget => "Department Budget",
            Self::Category => "Spend by Category",
            Self::Vendor => "Spend by Vendor",
            Self::VendorProfile => "Vendor Profile Breakdown",
        }
    }

    pub fn all() -> &'static [ViewKind] {
        &[
            Self::MonthlySpend,
            Self::Renewals,
            Self::Department,
            Self::Budget,
            Self::Category,
            Self::Vendor,
            Self::VendorProfile,
        ]
    }

    /// Monthly spend counts every period regardless of renewal dates; budget
    /// looks at what was last billed; everything else at the next renewal.
    pub fn guard(&self) -> DueDateGuard {
        match self {
            Self::MonthlySpend => DueDateGuard::Unguarded,
            Self::Budget => DueDateGuard::LastDue,
            _ => DueDateGuard::NextDue,
        }
    }

    pub fn gridlines(&self) -> u32 {
        match self {
            Self::Renewals | Self::VendorProfile => 4,
            Self::Budget => 6,
            _ => 5,
        }
    }

    pub fn default_window(&self, today: NaiveDate) -> ViewWindow {
        match self {
            Self::MonthlySpend => ViewWindow::half_year_containing(today),
            Self::Renewals => ViewWindow::months_from(today, 12, 12),
            _ => ViewWindow::year_containing(today),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ViewOptions {
    /// Only applied by the category view.
    pub amount_range: AmountRange,
}

/// Everything a chart needs to render, plus the window to navigate from.
#[derive(Debug, Clone, Serialize)]
pub struct ChartView {
    pub view: ViewKind,
    pub title: &'static str,
    pub window: ViewWindow,
    pub window_label: String,
    /// Expanded periods that fell inside the window.
    pub period_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<ChartSeries>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<BudgetSeries>,
}

/// Group by vendor and drop zero-span contracts.
pub fn prepare_working_set(records: Vec<SubscriptionRecord>) -> Vec<Vec<SubscriptionRecord>> {
    let total = records.len();
    let mut groups = group_by_vendor(records);
    let removed = remove_zero_span(&mut groups);
    tracing::info!(
        records = total,
        vendors = groups.len(),
        removed,
        "Prepared subscription working set"
    );
    groups
}

pub fn run_view(
    groups: &[Vec<SubscriptionRecord>],
    view: ViewKind,
    window: ViewWindow,
    options: &ViewOptions,
) -> ChartView {
    let expanded = expand_groups(groups, view.guard());
    let periods = filter_in_range(expanded, window.range_start, window.range_end);
    let period_count = periods.len();
    let gridlines = view.gridlines();

    let mut series = None;
    let mut budget = None;
    match view {
        ViewKind::MonthlySpend | ViewKind::Renewals => {
            let buckets = aggregate_by_key(periods, by_month);
            series = Some(month_series(&buckets, &window, gridlines));
        }
        ViewKind::Department => {
            let buckets = aggregate_by_key(periods, by_department);
            series = Some(keyed_series(&buckets, |b| b.key.clone(), gridlines));
        }
        ViewKind::Budget => {
            let buckets = aggregate_by_key(periods, by_department);
            budget = Some(budget_series(&buckets, gridlines));
        }
        ViewKind::Category => {
            let buckets = aggregate_by_category(periods, options.amount_range);
            series = Some(keyed_series(&buckets, |b| b.key.clone(), gridlines));
        }
        ViewKind::Vendor => {
            let buckets = aggregate_by_key(periods, by_vendor);
            series = Some(keyed_series(&buckets, |b| b.key.clone(), gridlines));
        }
        ViewKind::VendorProfile => {
            let buckets = aggregate_by_key(periods, by_vendor_profile);
            series = Some(keyed_series(&buckets, |b| b.key.label().to_string(), gridlines));
        }
    }

    tracing::debug!(
        view = view.as_str(),
        from = %window.range_start,
        to = %window.range_end,
        period_count,
        "Built chart view"
    );

    ChartView {
        view,
        title: view.title(),
        window_label: window.display_label(),
        window,
        period_count,
        series,
        budget,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, ContractAmount, Department, VendorProfile};
    use chrono::NaiveDateTime;

    fn dt(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn monthly(name: &str, vendor: &str, department: &str, amount: f64) -> SubscriptionRecord {
        SubscriptionRecord {
            subscription_name: name.into(),
            vendor_name: vendor.into(),
            subscription_start_date: dt(2024, 1, 1),
            subscription_end_date: dt(2025, 1, 1),
            next_due_date: Some(dt(2024, 7, 1)),
            last_due_date: Some(dt(2024, 6, 1)),
            subscription_frequency: "1 Months".into(),
            subscription_contract_amount: ContractAmount { value: amount },
            department_names: Some(Department {
                name: department.into(),
                budget: Some(1000.0),
            }),
            subscription_category: Some(Category {
                name: Some("Software".into()),
            }),
            vendor_profile: Some(VendorProfile::Strategic),
            status: 0,
        }
    }

    #[test]
    fn test_view_slugs_round_trip() {
        for view in ViewKind::all() {
            assert_eq!(view.as_str().parse::<ViewKind>(), Ok(*view));
        }
        assert!("pie".parse::<ViewKind>().is_err());
    }

    #[test]
    fn test_monthly_spend_half_year() {
        let groups = prepare_working_set(vec![monthly("Suite", "Acme", "Engineering", 100.0)]);
        let window = ViewKind::MonthlySpend.default_window(day(2024, 2, 10));

        let view = run_view(&groups, ViewKind::MonthlySpend, window, &ViewOptions::default());
        let series = view.series.unwrap();
        assert_eq!(series.values, vec![100.0; 6]);
        assert_eq!(view.period_count, 6);
        assert_eq!(view.window_label, "Jan 2024 – Jun 2024");
    }

    #[test]
    fn test_monthly_spend_ignores_due_dates() {
        let mut record = monthly("Suite", "Acme", "Engineering", 100.0);
        record.next_due_date = None;
        record.last_due_date = None;
        let groups = prepare_working_set(vec![record]);
        let window = ViewWindow::year_containing(day(2024, 1, 1));

        let spend = run_view(&groups, ViewKind::MonthlySpend, window, &ViewOptions::default());
        assert_eq!(spend.period_count, 12);

        let renewals = run_view(&groups, ViewKind::Renewals, window, &ViewOptions::default());
        assert_eq!(renewals.period_count, 0);
        assert_eq!(renewals.series.unwrap().values, vec![0.0; 12]);
    }

    #[test]
    fn test_department_view_sums_within_window() {
        let groups = prepare_working_set(vec![
            monthly("a", "Acme", "Engineering", 100.0),
            monthly("b", "Beta", "Engineering", 200.0),
            monthly("c", "Gamma", "Finance", 50.0),
        ]);
        let window = ViewWindow::months_from(day(2024, 1, 1), 1, 12);

        let view = run_view(&groups, ViewKind::Department, window, &ViewOptions::default());
        let series = view.series.unwrap();
        assert_eq!(series.labels, vec!["Engineering", "Finance"]);
        assert_eq!(series.values, vec![300.0, 50.0]);
    }

    #[test]
    fn test_budget_view_uses_last_due_guard() {
        let mut unbilled = monthly("b", "Beta", "Finance", 10.0);
        unbilled.last_due_date = None;
        let groups = prepare_working_set(vec![monthly("a", "Acme", "Engineering", 100.0), unbilled]);
        let window = ViewWindow::year_containing(day(2024, 3, 1));

        let view = run_view(&groups, ViewKind::Budget, window, &ViewOptions::default());
        assert!(view.series.is_none());
        let budget = view.budget.unwrap();
        assert_eq!(budget.labels, vec!["Engineering"]);
        assert_eq!(budget.spent, vec![1200.0]);
        assert_eq!(budget.budget, vec![1000.0]);
    }

    #[test]
    fn test_category_view_amount_range() {
        let groups = prepare_working_set(vec![monthly("a", "Acme", "Engineering", 100.0)]);
        let window = ViewWindow::year_containing(day(2024, 3, 1));

        let options = ViewOptions {
            amount_range: AmountRange {
                min: Some(5000.0),
                max: None,
            },
        };
        let view = run_view(&groups, ViewKind::Category, window, &options);
        assert!(view.series.unwrap().is_placeholder());

        let view = run_view(&groups, ViewKind::Category, window, &ViewOptions::default());
        assert_eq!(view.series.unwrap().values, vec![1200.0]);
    }

    #[test]
    fn test_vendor_and_profile_views() {
        let mut tactical = monthly("b", "Beta", "Finance", 10.0);
        tactical.vendor_profile = Some(VendorProfile::Tactical);
        let groups = prepare_working_set(vec![
            monthly("a", "Acme", "Engineering", 100.0),
            tactical,
            monthly("c", "Acme", "Engineering", 1.0),
        ]);
        let window = ViewWindow::months_from(day(2024, 1, 1), 1, 12);

        let vendors = run_view(&groups, ViewKind::Vendor, window, &ViewOptions::default());
        let series = vendors.series.unwrap();
        assert_eq!(series.labels, vec!["Acme", "Beta"]);
        assert_eq!(series.values, vec![101.0, 10.0]);

        let profiles = run_view(&groups, ViewKind::VendorProfile, window, &ViewOptions::default());
        assert_eq!(profiles.series.unwrap().labels, vec!["Strategic", "Tactical"]);
    }

    #[test]
    fn test_empty_working_set_degrades_to_placeholder() {
        let groups = prepare_working_set(Vec::new());
        let window = ViewWindow::year_containing(day(2024, 3, 1));
        let view = run_view(&groups, ViewKind::Department, window, &ViewOptions::default());
        assert!(view.series.unwrap().is_placeholder());
    }

    #[test]
    fn test_navigation_moves_window() {
        let groups = prepare_working_set(vec![monthly("a", "Acme", "Engineering", 100.0)]);
        let window = ViewKind::MonthlySpend.default_window(day(2024, 2, 10)).next();
        let view = run_view(&groups, ViewKind::MonthlySpend, window, &ViewOptions::default());
        assert_eq!(view.series.unwrap().values, vec![100.0; 6]);

        let window = window.next();
        let view = run_view(&groups, ViewKind::MonthlySpend, window, &ViewOptions::default());
        assert_eq!(view.series.unwrap().values, vec![0.0; 6]);
    }

    #[test]
    fn test_zero_span_contracts_are_dropped() {
        let mut zero = monthly("z", "Acme", "Engineering", 100.0);
        zero.subscription_end_date = zero.subscription_start_date;
        let groups = prepare_working_set(vec![zero]);
        assert_eq!(groups.len(), 1);
        assert!(groups[0].is_empty());
    }
}
