use chrono::NaiveDate;

/// One trading day of one ticker.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub ticker: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl DailyBar {
    pub fn is_consistent(&self) -> bool {
        ohlc_consistent(self.open, self.high, self.low, self.close)
    }
}

/// Calendar-month OHLCV bar. Every aggregate is `None` for a month without trading days.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyBar {
    pub period_end: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<u64>,
}

impl MonthlyBar {
    pub fn empty(period_end: NaiveDate) -> Self {
        Self {
            period_end,
            open: None,
            high: None,
            low: None,
            close: None,
            volume: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_none()
            && self.high.is_none()
            && self.low.is_none()
            && self.close.is_none()
            && self.volume.is_none()
    }

    /// `low <= open, close <= high`; an empty bar is trivially consistent.
    pub fn is_consistent(&self) -> bool {
        match (self.open, self.high, self.low, self.close) {
            (Some(open), Some(high), Some(low), Some(close)) => ohlc_consistent(open, high, low, close),
            (None, None, None, None) => true,
            _ => false,
        }
    }
}

/// A monthly bar with its trend columns. Built once by the indicator engine.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorRow {
    pub bar: MonthlyBar,
    pub sma_10: Option<f64>,
    pub sma_20: Option<f64>,
    pub ema_10: Option<f64>,
    pub ema_20: Option<f64>,
}

impl IndicatorRow {
    pub fn period_end(&self) -> NaiveDate {
        self.bar.period_end
    }

    pub fn close(&self) -> Option<f64> {
        self.bar.close
    }
}

fn ohlc_consistent(open: f64, high: f64, low: f64, close: f64) -> bool {
    low <= open.min(close) && high >= open.max(close)
}
