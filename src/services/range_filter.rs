use chrono::NaiveDate;

use crate::models::SubscriptionRecord;

/// Keep records whose period start falls in `[start, end]`. Both ends are
/// inclusive, unlike expansion which never emits the end boundary.
pub fn filter_in_range<I>(records: I, start: NaiveDate, end: NaiveDate) -> Vec<SubscriptionRecord>
where
    I: IntoIterator<Item = SubscriptionRecord>,
{
    records
        .into_iter()
        .filter(|r| {
            let day = r.subscription_start_date.date();
            start <= day && day <= end
        })
        .collect()
}
