//! Per-ticker series wrappers.
//!
//! Each series owns its rows and carries its ticker, so no stage needs to look anything up in
//! shared state.

use polars::df;
use polars::prelude::DataFrame;

use crate::bar::{DailyBar, IndicatorRow, MonthlyBar};
use crate::constant::DataError;

#[derive(Debug, Clone, PartialEq)]
pub struct DailySeries {
    pub ticker: String,
    pub bars: Vec<DailyBar>,
}

impl DailySeries {
    pub fn new(ticker: impl Into<String>, bars: Vec<DailyBar>) -> Self {
        Self {
            ticker: ticker.into(),
            bars,
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn total_volume(&self) -> u64 {
        self.bars
            .iter()
            .fold(0u64, |acc, bar| acc.saturating_add(bar.volume))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySeries {
    pub ticker: String,
    pub bars: Vec<MonthlyBar>,
}

impl MonthlySeries {
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<Option<f64>> {
        self.bars.iter().map(|bar| bar.close).collect()
    }

    pub fn total_volume(&self) -> u64 {
        self.bars
            .iter()
            .filter_map(|bar| bar.volume)
            .fold(0u64, u64::saturating_add)
    }

    pub fn empty_months(&self) -> usize {
        self.bars.iter().filter(|bar| bar.is_empty()).count()
    }
}

/// Finished table for one ticker, in calendar order.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub ticker: String,
    pub rows: Vec<IndicatorRow>,
}

impl IndicatorSeries {
    pub const COLUMNS: [&'static str; 10] = [
        "date", "open", "high", "low", "close", "volume", "SMA_10", "SMA_20", "EMA_10", "EMA_20",
    ];

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row-count contract check used by the batch runner.
    pub fn ensure_len(&self, expected: usize) -> Result<(), DataError> {
        if self.rows.len() == expected {
            return Ok(());
        }
        Err(DataError::Shape {
            ticker: self.ticker.clone(),
            expected,
            actual: self.rows.len(),
        })
    }

    pub fn closes(&self) -> Vec<Option<f64>> {
        self.rows.iter().map(IndicatorRow::close).collect()
    }

    pub fn dataframe(&self) -> Result<DataFrame, DataError> {
        let rows = &self.rows;
        let frame = df!(
            "date" => rows.iter().map(|r| r.bar.period_end.format("%Y-%m-%d").to_string()).collect::<Vec<_>>(),
            "open" => rows.iter().map(|r| r.bar.open).collect::<Vec<_>>(),
            "high" => rows.iter().map(|r| r.bar.high).collect::<Vec<_>>(),
            "low" => rows.iter().map(|r| r.bar.low).collect::<Vec<_>>(),
            "close" => rows.iter().map(|r| r.bar.close).collect::<Vec<_>>(),
            "volume" => rows.iter().map(|r| r.bar.volume).collect::<Vec<_>>(),
            "SMA_10" => rows.iter().map(|r| r.sma_10).collect::<Vec<_>>(),
            "SMA_20" => rows.iter().map(|r| r.sma_20).collect::<Vec<_>>(),
            "EMA_10" => rows.iter().map(|r| r.ema_10).collect::<Vec<_>>(),
            "EMA_20" => rows.iter().map(|r| r.ema_20).collect::<Vec<_>>()
        )?;
        Ok(frame)
    }
}
