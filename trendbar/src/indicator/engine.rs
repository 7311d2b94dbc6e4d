//! Indicator engine: monthly series in, trend columns appended.

use serde::{Deserialize, Serialize};

use crate::bar::IndicatorRow;
use crate::constant::{Const, EmaGapPolicy};
use crate::series::{IndicatorSeries, MonthlySeries};

use super::ema::Ema;
use super::manager::IndicatorManager;
use super::sma::Sma;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub ema_gap_policy: EmaGapPolicy,
}

pub fn add_indicators(series: &MonthlySeries) -> IndicatorSeries {
    add_indicators_with(series, &IndicatorConfig::default())
}

/// Append SMA_10, SMA_20, EMA_10 and EMA_20 to every monthly bar. `series` is left untouched.
pub fn add_indicators_with(series: &MonthlySeries, config: &IndicatorConfig) -> IndicatorSeries {
    let mut manager = IndicatorManager::default();
    for period in Const::SMA_PERIODS {
        manager.register(Box::new(Sma::new(period)));
    }
    for period in Const::EMA_PERIODS {
        manager.register(Box::new(Ema::with_gap_policy(period, config.ema_gap_policy)));
    }
    manager.backfill(&series.closes());

    let rows = series
        .bars
        .iter()
        .enumerate()
        .map(|(idx, bar)| IndicatorRow {
            bar: bar.clone(),
            sma_10: manager.value("SMA_10", idx),
            sma_20: manager.value("SMA_20", idx),
            ema_10: manager.value("EMA_10", idx),
            ema_20: manager.value("EMA_20", idx),
        })
        .collect();

    IndicatorSeries {
        ticker: series.ticker.clone(),
        rows,
    }
}
