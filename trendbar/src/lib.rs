pub mod bar;
pub mod calendar;
pub mod constant;
pub mod indicator;
pub mod logging;
pub mod resample;
pub mod series;

pub use bar::{DailyBar, IndicatorRow, MonthlyBar};
pub use calendar::{MonthKey, month_range};
pub use constant::{Const, DataError, EmaGapPolicy};
pub use indicator::{
    Ema, Indicator, IndicatorConfig, IndicatorManager, Sma, add_indicators, add_indicators_with,
};
pub use logging::{init_logging_with_level, parse_level};
pub use resample::aggregate_monthly;
pub use series::{DailySeries, IndicatorSeries, MonthlySeries};
