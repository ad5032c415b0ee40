// file: src/models/filter.rs
// description: view criteria applied to a message batch
// reference: internal data structures

use crate::models::message::{TriageCategory, TriageLevel};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Inclusive date window; either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    /// Range covering whole calendar days: `from` at midnight, `to` through the last
    /// millisecond of that day.
    pub fn inclusive_days(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        let end_of_day = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
        Self {
            from: from.map(|day| day.and_time(NaiveTime::MIN).and_utc()),
            to: to.map(|day| day.and_time(end_of_day).and_utc()),
        }
    }

    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        self.from.is_none_or(|from| *instant >= from) && self.to.is_none_or(|to| *instant <= to)
    }
}

/// Current view criteria. `None` for level or category means "All".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    pub date_range: DateRange,
    pub level: Option<TriageLevel>,
    pub category: Option<TriageCategory>,
    pub search_query: String,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date_range(mut self, date_range: DateRange) -> Self {
        self.date_range = date_range;
        self
    }

    pub fn with_level(mut self, level: Option<TriageLevel>) -> Self {
        self.level = level;
        self
    }

    pub fn with_category(mut self, category: Option<TriageCategory>) -> Self {
        self.category = category;
        self
    }

    pub fn with_search(mut self, query: impl Into<String>) -> Self {
        self.search_query = query.into();
        self
    }

    pub fn is_unfiltered(&self) -> bool {
        self.date_range == DateRange::default()
            && self.level.is_none()
            && self.category.is_none()
            && self.search_query.trim().is_empty()
    }
}
