//! Calendar-month grid.
//!
//! The resampler never infers months from the data it has; it asks this module for every
//! month between the first and the last trading day and fills the ones without data.

use chrono::{Datelike, NaiveDate};

use crate::constant::DataError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn next(self) -> Self {
        if self.month >= 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }

    pub fn first_day(self) -> Result<NaiveDate, DataError> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).ok_or_else(|| self.out_of_range())
    }

    /// Last calendar day of the month, the label of its monthly bar.
    pub fn last_day(self) -> Result<NaiveDate, DataError> {
        self.next()
            .first_day()?
            .pred_opt()
            .ok_or_else(|| self.out_of_range())
    }

    fn out_of_range(self) -> DataError {
        DataError::InvalidDatetime(format!("{:04}-{:02}", self.year, self.month))
    }
}

/// Every month in `[first, last]`, inclusive. Empty when `last < first`.
pub fn month_range(first: MonthKey, last: MonthKey) -> Vec<MonthKey> {
    let mut out = Vec::new();
    let mut key = first;
    while key <= last {
        out.push(key);
        key = key.next();
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{MonthKey, month_range};

    #[test]
    fn month_range_crosses_year_boundary() {
        let keys = month_range(MonthKey::new(2022, 11), MonthKey::new(2023, 2));
        assert_eq!(
            keys,
            vec![
                MonthKey::new(2022, 11),
                MonthKey::new(2022, 12),
                MonthKey::new(2023, 1),
                MonthKey::new(2023, 2),
            ]
        );
    }

    #[test]
    fn month_range_single_month_and_inverted_bounds() {
        assert_eq!(month_range(MonthKey::new(2023, 5), MonthKey::new(2023, 5)).len(), 1);
        assert!(month_range(MonthKey::new(2023, 6), MonthKey::new(2023, 5)).is_empty());
    }

    #[test]
    fn last_day_handles_leap_years() {
        let feb_2024 = MonthKey::new(2024, 2).last_day().expect("valid month");
        let feb_2023 = MonthKey::new(2023, 2).last_day().expect("valid month");
        let dec = MonthKey::new(2023, 12).last_day().expect("valid month");

        assert_eq!(feb_2024, NaiveDate::from_ymd_opt(2024, 2, 29).expect("valid date"));
        assert_eq!(feb_2023, NaiveDate::from_ymd_opt(2023, 2, 28).expect("valid date"));
        assert_eq!(dec, NaiveDate::from_ymd_opt(2023, 12, 31).expect("valid date"));
    }

    #[test]
    fn from_date_drops_the_day() {
        let date = NaiveDate::from_ymd_opt(2021, 7, 19).expect("valid date");
        assert_eq!(MonthKey::from_date(date), MonthKey::new(2021, 7));
    }
}
