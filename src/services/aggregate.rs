use std::collections::HashMap;
use std::hash::Hash;

use crate::date_utils::MonthKey;
use crate::models::{SubscriptionRecord, VendorProfile};

/// Label used for records without a department.
pub const UNASSIGNED_DEPARTMENT: &str = "Unassigned";

/// All records sharing one key, merged into a single record.
///
/// `record` is the first contributor with its contract amount replaced by the
/// sum over all contributors; its descriptive fields are not overwritten by
/// later records.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket<K> {
    pub key: K,
    pub record: SubscriptionRecord,
    pub count: usize,
}

impl<K> Bucket<K> {
    pub fn total(&self) -> f64 {
        self.record.amount()
    }
}

/// Merge records by `key_fn`. Buckets come back in first-seen key order.
/// Records for which `key_fn` returns `None` are skipped.
pub fn aggregate_by_key<K, I, F>(records: I, key_fn: F) -> Vec<Bucket<K>>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = SubscriptionRecord>,
    F: Fn(&SubscriptionRecord) -> Option<K>,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut buckets: Vec<Bucket<K>> = Vec::new();

    for record in records {
        let Some(key) = key_fn(&record) else {
            continue;
        };
        match index.get(&key) {
            Some(&i) => {
                let bucket = &mut buckets[i];
                bucket.record.subscription_contract_amount.value += record.amount();
                bucket.count += 1;
            }
            None => {
                index.insert(key.clone(), buckets.len());
                buckets.push(Bucket {
                    key,
                    record,
                    count: 1,
                });
            }
        }
    }

    buckets
}

/// Singleton-array shape (`[[merged], [merged], ...]`) some chart consumers
/// expect, matching the vendor-group shape.
pub fn into_grouped_shape<K>(buckets: Vec<Bucket<K>>) -> Vec<Vec<SubscriptionRecord>> {
    buckets.into_iter().map(|b| vec![b.record]).collect()
}

pub fn by_month(record: &SubscriptionRecord) -> Option<MonthKey> {
    Some(MonthKey::of_datetime(&record.subscription_start_date))
}

/// 0 = January. Collides across years; only meaningful inside one calendar year.
pub fn by_month_of_year(record: &SubscriptionRecord) -> Option<u32> {
    by_month(record).map(|k| k.month_index())
}

pub fn by_department(record: &SubscriptionRecord) -> Option<String> {
    Some(
        record
            .department_name()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(UNASSIGNED_DEPARTMENT)
            .to_string(),
    )
}

pub fn by_category(record: &SubscriptionRecord) -> Option<String> {
    record.category_name().map(str::to_string)
}

pub fn by_vendor(record: &SubscriptionRecord) -> Option<String> {
    Some(record.vendor_name.clone())
}

pub fn by_vendor_profile(record: &SubscriptionRecord) -> Option<VendorProfile> {
    record.vendor_profile
}

/// Inclusive bounds on a bucket total. Either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AmountRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl AmountRange {
    pub fn contains(&self, total: f64) -> bool {
        self.min.is_none_or(|min| min <= total) && self.max.is_none_or(|max| total <= max)
    }
}

/// Category totals, skipping uncategorized records and keeping only buckets
/// whose merged total lies in `range`.
pub fn aggregate_by_category<I>(records: I, range: AmountRange) -> Vec<Bucket<String>>
where
    I: IntoIterator<Item = SubscriptionRecord>,
{
    aggregate_by_key(records, by_category)
        .into_iter()
        .filter(|b| range.contains(b.total()))
        .collect()
}
