//! 日线数据加载模块。
//!
//! 读取 CSV 日线表：校验必需列、解析日期、检查数值，并按 `(ticker, date)` 排序。
//! 排序后的表按 ticker 拆分成互不共享状态的 `DailySeries`。

use std::collections::{BTreeSet, HashMap};
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use tracing::{info, warn};
use trendbar::{DailyBar, DailySeries, DataError};

/// 输入表必须包含的列。
pub const REQUIRED_COLUMNS: [&str; 7] = ["date", "open", "high", "low", "close", "volume", "ticker"];

#[derive(Debug, Deserialize)]
struct CsvDailyRow {
	date: String,
	ticker: String,
	open: f64,
	high: f64,
	low: f64,
	close: f64,
	volume: String,
}

/// 大于该值的浮点成交量无法精确表示为整数。
const MAX_EXACT_FLOAT_VOLUME: f64 = 9_007_199_254_740_992.0;

/// 已排序的多 ticker 日线表。
#[derive(Debug, Clone, Default)]
pub struct DailyTable {
	bars: Vec<DailyBar>,
}

impl DailyTable {
	/// 由任意顺序的日线构建，按 `(ticker, date)` 稳定排序。
	pub fn from_bars(mut bars: Vec<DailyBar>) -> Self {
		bars.sort_by(|a, b| a.ticker.cmp(&b.ticker).then(a.date.cmp(&b.date)));
		Self { bars }
	}

	pub fn len(&self) -> usize {
		self.bars.len()
	}

	pub fn is_empty(&self) -> bool {
		self.bars.is_empty()
	}

	pub fn bars(&self) -> &[DailyBar] {
		&self.bars
	}

	/// 去重后的 ticker 列表（升序）。
	pub fn tickers(&self) -> Vec<String> {
		self.bars
			.iter()
			.map(|bar| bar.ticker.clone())
			.collect::<BTreeSet<_>>()
			.into_iter()
			.collect()
	}

	/// 单个 ticker 的日线序列；ticker 不存在时返回空序列。
	pub fn series_for(&self, ticker: &str) -> DailySeries {
		let bars = self
			.bars
			.iter()
			.filter(|bar| bar.ticker == ticker)
			.cloned()
			.collect();
		DailySeries::new(ticker, bars)
	}

	/// 按 ticker 顺序拆分为独立序列。
	pub fn into_series(self) -> Vec<DailySeries> {
		let mut out: Vec<DailySeries> = Vec::new();
		for bar in self.bars {
			match out.last_mut() {
				Some(series) if series.ticker == bar.ticker => series.bars.push(bar),
				_ => out.push(DailySeries::new(bar.ticker.clone(), vec![bar])),
			}
		}
		out
	}
}

/// 从文件加载日线表。
pub fn load_daily_csv(path: impl AsRef<Path>) -> Result<DailyTable, DataError> {
	let path = path.as_ref();
	let file = std::fs::File::open(path)?;
	let table = read_daily_csv(file)?;
	info!(
		path = %path.display(),
		rows = table.len(),
		tickers = table.tickers().len(),
		"loaded daily table"
	);
	Ok(table)
}

/// 从任意 reader 读取日线表（CSV，带表头）。
pub fn read_daily_csv<R: Read>(source: R) -> Result<DailyTable, DataError> {
	let mut reader = csv::ReaderBuilder::new()
		.trim(csv::Trim::All)
		.from_reader(source);

	let headers = reader.headers()?.clone();
	let missing: Vec<String> = REQUIRED_COLUMNS
		.iter()
		.filter(|column| !headers.iter().any(|header| header == **column))
		.map(|column| column.to_string())
		.collect();
	if !missing.is_empty() {
		return Err(DataError::MissingColumns(missing));
	}

	let mut bars = Vec::new();
	let mut seen: HashMap<(String, NaiveDate), u64> = HashMap::new();
	for record in reader.records() {
		let record = record?;
		let line = record.position().map_or(0, |pos| pos.line());
		let row: CsvDailyRow = record.deserialize(Some(&headers))?;
		let bar = into_daily_bar(row, line)?;
		if let Some(first) = seen.insert((bar.ticker.clone(), bar.date), line) {
			return Err(DataError::InvalidRecord {
				line,
				reason: format!("duplicate {} row for {} (first at line {first})", bar.ticker, bar.date),
			});
		}
		if !bar.is_consistent() {
			warn!(
				ticker = %bar.ticker,
				date = %bar.date,
				line,
				"daily bar violates low <= open/close <= high"
			);
		}
		bars.push(bar);
	}

	Ok(DailyTable::from_bars(bars))
}

fn into_daily_bar(row: CsvDailyRow, line: u64) -> Result<DailyBar, DataError> {
	let invalid = |reason: String| DataError::InvalidRecord { line, reason };

	if row.ticker.is_empty() {
		return Err(invalid("empty ticker".to_string()));
	}
	for (name, value) in [("open", row.open), ("high", row.high), ("low", row.low), ("close", row.close)] {
		if !value.is_finite() || value <= 0.0 {
			return Err(invalid(format!("{name} must be a positive price, got {value}")));
		}
	}
	let volume = parse_volume(&row.volume)
		.ok_or_else(|| invalid(format!("volume must be a non-negative integer, got {}", row.volume)))?;

	Ok(DailyBar {
		date: parse_date(&row.date)?,
		ticker: row.ticker,
		open: row.open,
		high: row.high,
		low: row.low,
		close: row.close,
		volume,
	})
}

/// 成交量优先按整数解析；`1200.0` 这类整值浮点仅在可精确表示时接受。
fn parse_volume(raw: &str) -> Option<u64> {
	if let Ok(volume) = raw.parse::<u64>() {
		return Some(volume);
	}
	let value: f64 = raw.parse().ok()?;
	if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value > MAX_EXACT_FLOAT_VOLUME {
		return None;
	}
	Some(value as u64)
}

/// 解析日期；带时间的输入只保留日期部分。
pub fn parse_date(value: &str) -> Result<NaiveDate, DataError> {
	let value = value.trim();

	for pattern in ["%Y-%m-%d", "%Y/%m/%d"] {
		if let Ok(date) = NaiveDate::parse_from_str(value, pattern) {
			return Ok(date);
		}
	}

	for pattern in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y/%m/%d %H:%M:%S%.f"] {
		if let Ok(dt) = NaiveDateTime::parse_from_str(value, pattern) {
			return Ok(dt.date());
		}
	}

	if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
		return Ok(dt.date_naive());
	}

	Err(DataError::InvalidDatetime(value.to_string()))
}

#[cfg(test)]
mod tests {
	use chrono::NaiveDate;
	use trendbar::DataError;

	use super::{DailyTable, parse_date, read_daily_csv};

	const SAMPLE: &str = "\
date,ticker,open,high,low,close,volume,adj_close
2023-02-01,XYZ,20,21,19,20.5,300,20.5
2023-01-03,ABC,10,11,9,10.5,100,10.5
2023-01-02,ABC,9.5,10.5,9,10,150,10
2023-01-04,XYZ,19,20,18.5,19.5,200,19.5
";

	#[test]
	fn loads_sorts_and_groups_by_ticker() {
		let table = read_daily_csv(SAMPLE.as_bytes()).expect("sample should load");
		assert_eq!(table.len(), 4);
		assert_eq!(table.tickers(), vec!["ABC".to_string(), "XYZ".to_string()]);

		let series = table.clone().into_series();
		assert_eq!(series.len(), 2);
		assert_eq!(series[0].ticker, "ABC");
		assert_eq!(series[0].bars[0].date, NaiveDate::from_ymd_opt(2023, 1, 2).expect("valid date"));
		assert_eq!(series[0].bars[1].volume, 100);
		assert_eq!(series[1].ticker, "XYZ");
		assert_eq!(series[1].len(), 2);

		assert_eq!(table.series_for("XYZ").total_volume(), 500);
		assert!(table.series_for("NOPE").is_empty());
	}

	#[test]
	fn missing_columns_are_reported() {
		let input = "date,ticker,open,close\n2023-01-02,ABC,1,2\n";
		match read_daily_csv(input.as_bytes()) {
			Err(DataError::MissingColumns(cols)) => {
				assert_eq!(cols, vec!["high".to_string(), "low".to_string(), "volume".to_string()]);
			}
			other => panic!("expected MissingColumns, got {other:?}"),
		}
	}

	#[test]
	fn invalid_volume_points_at_line() {
		let input = "date,ticker,open,high,low,close,volume\n2023-01-02,ABC,1,2,0.5,1.5,10\n2023-01-03,ABC,1,2,0.5,1.5,-4\n";
		match read_daily_csv(input.as_bytes()) {
			Err(DataError::InvalidRecord { line, .. }) => assert_eq!(line, 3),
			other => panic!("expected InvalidRecord, got {other:?}"),
		}
	}

	#[test]
	fn unparseable_date_is_rejected() {
		let input = "date,ticker,open,high,low,close,volume\nyesterday,ABC,1,2,0.5,1.5,10\n";
		assert!(matches!(
			read_daily_csv(input.as_bytes()),
			Err(DataError::InvalidDatetime(value)) if value == "yesterday"
		));
	}

	#[test]
	fn parse_date_accepts_common_layouts() {
		let expected = NaiveDate::from_ymd_opt(2024, 3, 15).expect("valid date");
		for raw in ["2024-03-15", "2024/03/15", "2024-03-15 16:00:00", "2024-03-15T09:30:00+08:00"] {
			assert_eq!(parse_date(raw).expect("date should parse"), expected, "{raw}");
		}
	}

	#[test]
	fn float_volume_with_zero_fraction_is_accepted() {
		let input = "date,ticker,open,high,low,close,volume\n2023-01-02,ABC,1,2,0.5,1.5,1200.0\n";
		let table = read_daily_csv(input.as_bytes()).expect("sample should load");
		assert_eq!(table.bars()[0].volume, 1200);
	}

	#[test]
	fn integer_volume_keeps_full_u64_precision() {
		let input = "date,ticker,open,high,low,close,volume\n2023-01-02,ABC,1,2,0.5,1.5,18446744073709551615\n2023-01-03,ABC,1,2,0.5,1.5,9007199254740993\n";
		let table = read_daily_csv(input.as_bytes()).expect("sample should load");
		assert_eq!(table.bars()[0].volume, u64::MAX);
		assert_eq!(table.bars()[1].volume, 9_007_199_254_740_993);
	}

	#[test]
	fn out_of_range_or_fractional_volume_is_rejected() {
		for raw in ["18446744073709551616", "1e20", "12.5", "NaN", "lots"] {
			let input = format!("date,ticker,open,high,low,close,volume\n2023-01-02,ABC,1,2,0.5,1.5,{raw}\n");
			match read_daily_csv(input.as_bytes()) {
				Err(DataError::InvalidRecord { line, .. }) => assert_eq!(line, 2, "{raw}"),
				other => panic!("expected InvalidRecord for {raw}, got {other:?}"),
			}
		}
	}

	#[test]
	fn duplicate_ticker_date_is_rejected() {
		let input = "date,ticker,open,high,low,close,volume\n2023-01-02,ABC,1,2,0.5,1.5,10\n2023-01-02,XYZ,1,2,0.5,1.5,10\n2023-01-02,ABC,1,2,0.5,1.6,20\n";
		match read_daily_csv(input.as_bytes()) {
			Err(DataError::InvalidRecord { line, reason }) => {
				assert_eq!(line, 4);
				assert!(reason.contains("first at line 2"), "{reason}");
			}
			other => panic!("expected InvalidRecord, got {other:?}"),
		}
	}

	#[test]
	fn empty_table_has_no_series() {
		let table = DailyTable::from_bars(Vec::new());
		assert!(table.is_empty());
		assert!(table.into_series().is_empty());
	}
}
