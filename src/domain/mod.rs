pub mod filters;
pub mod numbering;
pub mod reports;
pub mod validation;

use chrono::{Datelike, NaiveDate};

/// Inclusive date interval; an open end is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    /// Calendar month containing `date`.
    pub fn month_of(date: NaiveDate) -> Self {
        let first = date.with_day(1).unwrap_or(date);
        let next = if first.month() == 12 {
            NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
        };
        Self {
            from: Some(first),
            to: next.and_then(|d| d.pred_opt()),
        }
    }

    pub fn year(year: i32) -> Self {
        Self {
            from: NaiveDate::from_ymd_opt(year, 1, 1),
            to: NaiveDate::from_ymd_opt(year, 12, 31),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let range = DateRange::between(date(2024, 3, 1), date(2024, 3, 31));
        assert!(range.contains(date(2024, 3, 1)));
        assert!(range.contains(date(2024, 3, 31)));
        assert!(!range.contains(date(2024, 4, 1)));
        assert!(!range.contains(date(2024, 2, 29)));
    }

    #[test]
    fn month_of_handles_december_and_leap_february() {
        let december = DateRange::month_of(date(2023, 12, 15));
        assert_eq!(december, DateRange::between(date(2023, 12, 1), date(2023, 12, 31)));

        let february = DateRange::month_of(date(2024, 2, 10));
        assert_eq!(february.to, Some(date(2024, 2, 29)));
    }

    #[test]
    fn open_range_contains_everything() {
        assert!(DateRange::all().contains(date(1999, 1, 1)));
        assert!(DateRange::all().is_unbounded());
    }
}
