//! Chart data adapter: turns aggregated buckets into `{labels, values}` series.
//!
//! Month series are contiguous over the view window and zero-filled. Keyed
//! series (department, category, vendor, profile) only carry buckets that have
//! data, and fall back to a single "No Data Available" row when empty.

use serde::Serialize;

use crate::date_utils::{MonthKey, ViewWindow};
use crate::services::aggregate::Bucket;

pub const NO_DATA_LABEL: &str = "No Data Available";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    /// `values` rendered as currency, for tooltips and tables.
    pub formatted: Vec<String>,
    /// Amount-axis step for the requested number of gridlines.
    pub tick_step: f64,
}

impl ChartSeries {
    fn from_points(labels: Vec<String>, values: Vec<f64>, gridlines: u32) -> Self {
        let formatted = values.iter().map(|v| format_currency(*v)).collect();
        let tick_step = tick_step(&values, gridlines);
        Self {
            labels,
            values,
            formatted,
            tick_step,
        }
    }

    pub fn placeholder(gridlines: u32) -> Self {
        Self::from_points(vec![NO_DATA_LABEL.to_string()], vec![0.0], gridlines)
    }

    pub fn is_placeholder(&self) -> bool {
        self.labels.len() == 1 && self.labels[0] == NO_DATA_LABEL
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}

/// Generic adapter: one point per bucket, in bucket order.
pub fn to_series<K, L, V>(buckets: &[Bucket<K>], label_fn: L, value_fn: V, gridlines: u32) -> ChartSeries
where
    L: Fn(&Bucket<K>) -> String,
    V: Fn(&Bucket<K>) -> f64,
{
    let labels = buckets.iter().map(&label_fn).collect();
    let values = buckets.iter().map(&value_fn).collect();
    ChartSeries::from_points(labels, values, gridlines)
}

/// Series over non-empty buckets, or the placeholder row when there are none.
pub fn keyed_series<K, L>(buckets: &[Bucket<K>], label_fn: L, gridlines: u32) -> ChartSeries
where
    L: Fn(&Bucket<K>) -> String,
{
    if buckets.is_empty() {
        return ChartSeries::placeholder(gridlines);
    }
    to_series(buckets, label_fn, Bucket::total, gridlines)
}

/// One point per month of `window`, zero where no bucket exists.
pub fn month_series(buckets: &[Bucket<MonthKey>], window: &ViewWindow, gridlines: u32) -> ChartSeries {
    let months = window.month_keys();
    let labels = months.iter().map(MonthKey::label).collect();
    let values = months
        .iter()
        .map(|month| {
            buckets
                .iter()
                .find(|b| b.key == *month)
                .map(Bucket::total)
                .unwrap_or(0.0)
        })
        .collect();
    ChartSeries::from_points(labels, values, gridlines)
}

/// Department spend next to department budget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetSeries {
    pub labels: Vec<String>,
    pub spent: Vec<f64>,
    pub budget: Vec<f64>,
    pub formatted_spent: Vec<String>,
    pub formatted_budget: Vec<String>,
    pub tick_step: f64,
}

/// Budgets come from the first record of each department bucket. Departments
/// without budget data chart a zero budget rather than failing the view.
pub fn budget_series(buckets: &[Bucket<String>], gridlines: u32) -> BudgetSeries {
    let (labels, spent, budget): (Vec<String>, Vec<f64>, Vec<f64>) = if buckets.is_empty() {
        (vec![NO_DATA_LABEL.to_string()], vec![0.0], vec![0.0])
    } else {
        let labels = buckets.iter().map(|b| b.key.clone()).collect();
        let spent = buckets.iter().map(Bucket::total).collect();
        let budget = buckets.iter().map(|b| b.record.department_budget()).collect();
        (labels, spent, budget)
    };

    let all_values: Vec<f64> = spent.iter().chain(budget.iter()).copied().collect();
    BudgetSeries {
        formatted_spent: spent.iter().map(|v| format_currency(*v)).collect(),
        formatted_budget: budget.iter().map(|v| format_currency(*v)).collect(),
        tick_step: tick_step(&all_values, gridlines),
        labels,
        spent,
        budget,
    }
}

/// `ceil(range / gridlines)` over the value range including the zero
/// baseline; 1 when the range is empty.
pub fn tick_step(values: &[f64], gridlines: u32) -> f64 {
    let max = values.iter().copied().fold(0.0, f64::max);
    let min = values.iter().copied().fold(0.0, f64::min);
    let range = max - min;
    if gridlines == 0 || range <= 0.0 || !range.is_finite() {
        return 1.0;
    }
    (range / gridlines as f64).ceil()
}

/// Dollar amount with thousands separators, e.g. `$1,234.50` or `-$12.00`.
pub fn format_currency(amount: f64) -> String {
    let cents = (amount * 100.0).round() as i64;
    let is_negative = cents < 0;
    let abs_cents = cents.unsigned_abs();
    let whole = group_thousands(abs_cents / 100);
    let fractional = abs_cents % 100;

    if is_negative {
        format!("-${}.{:02}", whole, fractional)
    } else {
        format!("${}.{:02}", whole, fractional)
    }
}

/// Digits of `n` grouped in threes from the right.
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let lead = match digits.len() % 3 {
        0 => 3,
        r => r,
    };
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    grouped.push_str(&digits[..lead]);
    for chunk in digits.as_bytes()[lead..].chunks(3) {
        grouped.push(',');
        grouped.extend(chunk.iter().map(|b| *b as char));
    }
    grouped
}
