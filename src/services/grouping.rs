use std::collections::{HashMap, HashSet};

use crate::models::SubscriptionRecord;

/// Partition records by `VendorName`. Groups appear in first-seen order and
/// keep their members in input order.
pub fn group_by_vendor(records: Vec<SubscriptionRecord>) -> Vec<Vec<SubscriptionRecord>> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Vec<SubscriptionRecord>> = Vec::new();

    for record in records {
        match index.get(&record.vendor_name) {
            Some(&i) => groups[i].push(record),
            None => {
                index.insert(record.vendor_name.clone(), groups.len());
                groups.push(vec![record]);
            }
        }
    }

    groups
}

/// Drop records whose start and end are the same instant. Expansion needs a
/// non-zero span, so this runs first. Returns how many were removed.
pub fn remove_zero_span(groups: &mut [Vec<SubscriptionRecord>]) -> usize {
    let mut removed = 0;
    for group in groups.iter_mut() {
        let before = group.len();
        group.retain(|r| !r.is_zero_span());
        removed += before - group.len();
    }
    if removed > 0 {
        tracing::debug!(removed, "Removed zero-span subscriptions");
    }
    removed
}

/// Table and export dedup: a record repeating an earlier record's name and
/// contract amount is dropped.
pub fn dedupe_by_name_and_amount(records: &[SubscriptionRecord]) -> Vec<SubscriptionRecord> {
    let mut seen: HashSet<(&str, u64)> = HashSet::new();
    let mut unique = Vec::with_capacity(records.len());
    for record in records {
        if seen.insert((record.subscription_name.as_str(), amount_key(record.amount()))) {
            unique.push(record.clone());
        }
    }
    unique
}

fn amount_key(amount: f64) -> u64 {
    // -0.0 and 0.0 compare equal but differ in bits
    if amount == 0.0 {
        0.0f64.to_bits()
    } else {
        amount.to_bits()
    }
}

/// Summary row for one vendor group.
#[derive(Debug, Clone, serde::Serialize)]
pub struct VendorSummary {
    pub vendor_name: String,
    pub subscription_count: usize,
    pub active_count: usize,
    pub total_contract_amount: f64,
}

pub fn summarize_groups(groups: &[Vec<SubscriptionRecord>]) -> Vec<VendorSummary> {
    groups
        .iter()
        .filter_map(|group| {
            let first = group.first()?;
            Some(VendorSummary {
                vendor_name: first.vendor_name.clone(),
                subscription_count: group.len(),
                active_count: group.iter().filter(|r| r.is_active()).count(),
                total_contract_amount: group.iter().map(|r| r.amount()).sum(),
            })
        })
        .collect()
}
