//! 结果落地模块。
//!
//! 每个 ticker 写一个结果文件 `result_<TICKER>.<ext>`，目录不存在时自动创建。
//! - `OutputFormat::Csv`：表头 + 逐行记录，未定义值写为空字段。
//! - `OutputFormat::Parquet`：经由 `IndicatorSeries::dataframe` 写出，未定义值为 null。

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use polars::prelude::ParquetWriter;
use serde::{Deserialize, Serialize};
use tracing::debug;
use trendbar::{DataError, IndicatorRow, IndicatorSeries};

/// 结果文件格式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
	#[default]
	Csv,
	Parquet,
}

impl OutputFormat {
	pub fn extension(self) -> &'static str {
		match self {
			Self::Csv => "csv",
			Self::Parquet => "parquet",
		}
	}
}

#[derive(Debug, Serialize)]
struct ResultRecord {
	date: NaiveDate,
	open: Option<f64>,
	high: Option<f64>,
	low: Option<f64>,
	close: Option<f64>,
	volume: Option<u64>,
	#[serde(rename = "SMA_10")]
	sma_10: Option<f64>,
	#[serde(rename = "SMA_20")]
	sma_20: Option<f64>,
	#[serde(rename = "EMA_10")]
	ema_10: Option<f64>,
	#[serde(rename = "EMA_20")]
	ema_20: Option<f64>,
}

impl From<&IndicatorRow> for ResultRecord {
	fn from(row: &IndicatorRow) -> Self {
		Self {
			date: row.bar.period_end,
			open: row.bar.open,
			high: row.bar.high,
			low: row.bar.low,
			close: row.bar.close,
			volume: row.bar.volume,
			sma_10: row.sma_10,
			sma_20: row.sma_20,
			ema_10: row.ema_10,
			ema_20: row.ema_20,
		}
	}
}

/// 结果写出组件（同步写盘）。
#[derive(Debug)]
pub struct ResultWriter {
	output_dir: PathBuf,
	format: OutputFormat,
	written_files: u64,
}

impl ResultWriter {
	pub fn new(output_dir: impl AsRef<Path>, format: OutputFormat) -> Self {
		Self {
			output_dir: output_dir.as_ref().to_path_buf(),
			format,
			written_files: 0,
		}
	}

	/// 目标文件路径；ticker 中的路径分隔符替换为 `_`。
	pub fn path_for(&self, ticker: &str) -> PathBuf {
		let stem: String = ticker
			.chars()
			.map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
			.collect();
		self.output_dir
			.join(format!("result_{stem}.{}", self.format.extension()))
	}

	/// 写出单个 ticker 的结果表，返回文件路径。
	pub fn write(&mut self, series: &IndicatorSeries) -> Result<PathBuf, DataError> {
		fs::create_dir_all(&self.output_dir)?;
		let path = self.path_for(&series.ticker);
		match self.format {
			OutputFormat::Csv => write_csv(&path, series)?,
			OutputFormat::Parquet => write_parquet(&path, series)?,
		}
		self.written_files = self.written_files.saturating_add(1);
		debug!(ticker = %series.ticker, rows = series.len(), path = %path.display(), "result written");
		Ok(path)
	}

	pub fn output_dir(&self) -> &Path {
		&self.output_dir
	}

	/// 当前实例已写出的文件数量。
	pub fn written_files(&self) -> u64 {
		self.written_files
	}
}

fn write_csv(path: &Path, series: &IndicatorSeries) -> Result<(), DataError> {
	let mut writer = csv::Writer::from_path(path)?;
	if series.is_empty() {
		writer.write_record(IndicatorSeries::COLUMNS)?;
	}
	for row in &series.rows {
		writer.serialize(ResultRecord::from(row))?;
	}
	writer.flush()?;
	Ok(())
}

fn write_parquet(path: &Path, series: &IndicatorSeries) -> Result<(), DataError> {
	let mut frame = series.dataframe()?;
	let file = File::create(path)?;
	ParquetWriter::new(file).finish(&mut frame)?;
	Ok(())
}
