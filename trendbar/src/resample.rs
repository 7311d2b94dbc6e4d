//! Daily → calendar-month resampling.

use std::collections::BTreeMap;

use tracing::debug;

use crate::bar::{DailyBar, MonthlyBar};
use crate::calendar::{MonthKey, month_range};
use crate::constant::DataError;
use crate::series::{DailySeries, MonthlySeries};

#[derive(Debug, Clone, Copy)]
struct MonthBucket {
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: u64,
}

impl MonthBucket {
    fn start(bar: &DailyBar) -> Self {
        Self {
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
        }
    }

    fn absorb(&mut self, bar: &DailyBar) {
        self.high = self.high.max(bar.high);
        self.low = self.low.min(bar.low);
        self.close = bar.close;
        self.volume = self.volume.saturating_add(bar.volume);
    }

    fn into_bar(self, period_end: chrono::NaiveDate) -> MonthlyBar {
        MonthlyBar {
            period_end,
            open: Some(self.open),
            high: Some(self.high),
            low: Some(self.low),
            close: Some(self.close),
            volume: Some(self.volume),
        }
    }
}

/// Aggregate one ticker's date-sorted daily bars into one bar per calendar month.
///
/// Months between the first and the last trading day that have no records still get a bar,
/// with every aggregate undefined, so the output keeps a fixed monthly cadence.
/// A date that goes backwards is rejected with `DataError::Unsorted`.
pub fn aggregate_monthly(series: &DailySeries) -> Result<MonthlySeries, DataError> {
    if series.bars.is_empty() {
        return Err(DataError::EmptyInput {
            ticker: series.ticker.clone(),
        });
    }
    if let Some(pair) = series.bars.windows(2).find(|pair| pair[1].date < pair[0].date) {
        return Err(DataError::Unsorted {
            ticker: series.ticker.clone(),
            previous: pair[0].date,
            date: pair[1].date,
        });
    }

    let mut buckets: BTreeMap<MonthKey, MonthBucket> = BTreeMap::new();
    for bar in &series.bars {
        buckets
            .entry(MonthKey::from_date(bar.date))
            .and_modify(|bucket| bucket.absorb(bar))
            .or_insert_with(|| MonthBucket::start(bar));
    }

    let (Some(&first), Some(&last)) = (buckets.keys().next(), buckets.keys().next_back()) else {
        return Err(DataError::EmptyInput {
            ticker: series.ticker.clone(),
        });
    };
    let grid = month_range(first, last);
    let mut bars = Vec::with_capacity(grid.len());
    for key in grid {
        let period_end = key.last_day()?;
        let bar = match buckets.get(&key) {
            Some(bucket) => bucket.into_bar(period_end),
            None => MonthlyBar::empty(period_end),
        };
        bars.push(bar);
    }

    let monthly = MonthlySeries {
        ticker: series.ticker.clone(),
        bars,
    };
    debug!(
        ticker = %monthly.ticker,
        daily = series.len(),
        months = monthly.len(),
        empty_months = monthly.empty_months(),
        "aggregated monthly bars"
    );
    Ok(monthly)
}
