//! `market` crate 入口。
//!
//! 职责：日线数据的读入与结果表的落地，是 `trendbar` 计算核心两端的协作方。
//! 该文件只做模块装配与统一导出，具体实现位于各子模块。
//!
//! 模块分工：
//! - `loader`：CSV 日线表读取、必需列校验、排序与按 ticker 拆分。
//! - `writer`：按 ticker 写出 `result_<TICKER>` 结果文件（CSV / Parquet）。
//!
//! 快速示例：
//! ```rust
//! use market::read_daily_csv;
//! use trendbar::{add_indicators, aggregate_monthly};
//!
//! let csv = "date,ticker,open,high,low,close,volume\n\
//!            2024-01-02,ABC,10,11,9,10.5,100\n\
//!            2024-02-01,ABC,10.5,12,10,11.5,120\n";
//! let table = read_daily_csv(csv.as_bytes()).expect("valid csv");
//!
//! for series in table.into_series() {
//!     let monthly = aggregate_monthly(&series).expect("non-empty series");
//!     let result = add_indicators(&monthly);
//!     assert_eq!(result.len(), 2);
//! }
//! ```

mod loader;
mod writer;

pub use loader::{DailyTable, REQUIRED_COLUMNS, load_daily_csv, parse_date, read_daily_csv};
pub use writer::{OutputFormat, ResultWriter};
