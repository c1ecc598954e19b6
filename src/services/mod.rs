pub mod aggregate;
pub mod chart;
pub mod export;
pub mod frequency;
pub mod grouping;
pub mod pagination;
pub mod pipeline;
pub mod range_filter;
pub mod recurrence;
