use tracing::warn;
use trendbar::{DailySeries, DataError, IndicatorConfig, IndicatorSeries, add_indicators_with, aggregate_monthly};

/// Resample one ticker and append its indicators.
///
/// The row-count contract is not checked here; see [`crate::run_batch`].
pub fn process_ticker(series: &DailySeries, indicators: &IndicatorConfig) -> Result<IndicatorSeries, DataError> {
	let monthly = aggregate_monthly(series)?;

	let inconsistent = monthly.bars.iter().filter(|bar| !bar.is_consistent()).count();
	if inconsistent > 0 {
		warn!(ticker = %series.ticker, inconsistent, "monthly bars violate low <= open/close <= high");
	}

	Ok(add_indicators_with(&monthly, indicators))
}
