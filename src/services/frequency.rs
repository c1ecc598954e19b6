use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static STEP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("step pattern is valid"));

/// Calendar unit a contract renews in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodUnit {
    Month,
    Year,
}

/// Parsed renewal cadence, e.g. "12 Months" -> every 12 months.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frequency {
    pub step: u32,
    pub unit: Option<PeriodUnit>,
}

impl Frequency {
    /// Parse a free-text frequency. The step is the first run of digits; a
    /// missing, zero or overflowing step yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let step = STEP_PATTERN
            .find(raw)?
            .as_str()
            .parse::<u32>()
            .ok()
            .filter(|s| *s > 0)?;

        let lowered = raw.to_lowercase();
        let unit = if lowered.contains("month") {
            Some(PeriodUnit::Month)
        } else if lowered.contains("year") {
            Some(PeriodUnit::Year)
        } else {
            None
        };

        Some(Self { step, unit })
    }

    pub fn months_per_period(&self) -> Option<u32> {
        match self.unit? {
            PeriodUnit::Month => Some(self.step),
            PeriodUnit::Year => self.step.checked_mul(12),
        }
    }
}
