//! Recurrence expansion: one synthetic record per renewal period of a contract.
//!
//! A contract running from `start` to `end` with frequency "N Months" yields
//! `span / N` periods where `span` is the number of calendar months between
//! the two dates. Period `k` starts `k * N` months after `start`; the period
//! that would begin on the end boundary is never emitted.

use chrono::{Datelike, Months, NaiveDateTime};

use crate::date_utils::months_between;
use crate::models::SubscriptionRecord;
use crate::services::frequency::{Frequency, PeriodUnit};

/// Which due date, if any, must fall inside `[start, end)` before a contract
/// is expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueDateGuard {
    NextDue,
    LastDue,
    /// Expand regardless of due dates.
    Unguarded,
}

impl DueDateGuard {
    fn admits(self, record: &SubscriptionRecord) -> bool {
        let due = match self {
            DueDateGuard::NextDue => record.next_due_date,
            DueDateGuard::LastDue => record.last_due_date,
            DueDateGuard::Unguarded => return true,
        };
        match due {
            Some(due) => {
                record.subscription_start_date <= due && due < record.subscription_end_date
            }
            None => false,
        }
    }
}

/// Lazy, chronological sequence of period records for one contract.
#[derive(Debug, Clone)]
pub struct Expansion<'a> {
    source: &'a SubscriptionRecord,
    months_per_step: u32,
    unit: PeriodUnit,
    emitted: u32,
    total: u32,
    end_key: (i32, u32),
}

impl<'a> Expansion<'a> {
    fn empty(source: &'a SubscriptionRecord) -> Self {
        Self {
            source,
            months_per_step: 0,
            unit: PeriodUnit::Month,
            emitted: 0,
            total: 0,
            end_key: (0, 0),
        }
    }

    fn boundary_key(&self, dt: &NaiveDateTime) -> (i32, u32) {
        match self.unit {
            PeriodUnit::Month => (dt.year(), dt.month()),
            PeriodUnit::Year => (dt.year(), 0),
        }
    }
}

impl Iterator for Expansion<'_> {
    type Item = SubscriptionRecord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.emitted >= self.total {
            return None;
        }

        // Offsets are taken from the original start so clamped month ends
        // (Jan 31 -> Feb 29) do not drift the following periods.
        let offset = self.emitted.checked_mul(self.months_per_step)?;
        let cursor = self
            .source
            .subscription_start_date
            .checked_add_months(Months::new(offset))?;

        if self.boundary_key(&cursor) == self.end_key {
            self.total = self.emitted;
            return None;
        }

        self.emitted += 1;
        let mut period = self.source.clone();
        period.subscription_start_date = cursor;
        Some(period)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total.saturating_sub(self.emitted) as usize;
        (0, Some(remaining))
    }
}

/// Expand `record` in `unit`. Records whose frequency is in another unit, has
/// no step, or whose start date is unset expand to nothing.
pub fn expand(record: &SubscriptionRecord, unit: PeriodUnit, guard: DueDateGuard) -> Expansion<'_> {
    let Some(frequency) = Frequency::parse(&record.subscription_frequency) else {
        return Expansion::empty(record);
    };
    if frequency.unit != Some(unit) || !record.has_real_start() || !guard.admits(record) {
        return Expansion::empty(record);
    }

    let start = &record.subscription_start_date;
    let end = &record.subscription_end_date;
    let span = match unit {
        PeriodUnit::Month => months_between(start, end),
        PeriodUnit::Year => (end.year() - start.year()) as i64,
    };
    if span <= 0 {
        return Expansion::empty(record);
    }

    let months_per_step = match unit {
        PeriodUnit::Month => frequency.step,
        PeriodUnit::Year => match frequency.step.checked_mul(12) {
            Some(m) => m,
            None => return Expansion::empty(record),
        },
    };
    let total = u32::try_from(span / frequency.step as i64).unwrap_or(0);

    let mut expansion = Expansion {
        source: record,
        months_per_step,
        unit,
        emitted: 0,
        total,
        end_key: (0, 0),
    };
    expansion.end_key = expansion.boundary_key(end);
    expansion
}

/// Expand in whatever unit the record's own frequency names.
pub fn expand_in_own_unit(record: &SubscriptionRecord, guard: DueDateGuard) -> Expansion<'_> {
    match Frequency::parse(&record.subscription_frequency).and_then(|f| f.unit) {
        Some(unit) => expand(record, unit, guard),
        None => Expansion::empty(record),
    }
}

/// Expand every record of every vendor group into one flat list.
pub fn expand_groups(groups: &[Vec<SubscriptionRecord>], guard: DueDateGuard) -> Vec<SubscriptionRecord> {
    let expanded: Vec<SubscriptionRecord> = groups
        .iter()
        .flatten()
        .flat_map(|record| expand_in_own_unit(record, guard))
        .collect();
    tracing::debug!(
        groups = groups.len(),
        periods = expanded.len(),
        ?guard,
        "Expanded subscription periods"
    );
    expanded
}
