//! Batch orchestration: one pipeline per ticker, results collected into a report.

use std::fs;
use std::path::{Path, PathBuf};

use crossbeam::channel;
use market::{ResultWriter, load_daily_csv};
use serde::Serialize;
use tracing::{debug, error, info, warn};
use trendbar::{DailySeries, DataError, IndicatorConfig, IndicatorSeries};

use crate::config::{FailurePolicy, PipelineConfig};
use crate::pipeline::process_ticker;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
	pub expected_rows: usize,
	pub workers: usize,
	pub failure_policy: FailurePolicy,
	pub indicators: IndicatorConfig,
}

impl From<&PipelineConfig> for BatchOptions {
	fn from(config: &PipelineConfig) -> Self {
		Self {
			expected_rows: config.expected_rows,
			workers: config.worker_count(),
			failure_policy: config.failure_policy,
			indicators: config.indicators,
		}
	}
}

#[derive(Debug)]
pub enum TickerStatus {
	Written { rows: usize, path: PathBuf },
	Failed(DataError),
	/// Not written because an earlier ticker aborted the batch.
	Skipped,
}

#[derive(Debug)]
pub struct TickerOutcome {
	pub ticker: String,
	pub status: TickerStatus,
}

#[derive(Debug, Default)]
pub struct BatchReport {
	pub outcomes: Vec<TickerOutcome>,
	pub aborted: bool,
}

#[derive(Serialize)]
struct ReportEntry<'a> {
	ticker: &'a str,
	status: &'static str,
	#[serde(skip_serializing_if = "Option::is_none")]
	rows: Option<usize>,
	#[serde(skip_serializing_if = "Option::is_none")]
	path: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	error: Option<String>,
}

#[derive(Serialize)]
struct ReportDocument<'a> {
	aborted: bool,
	written: usize,
	failed: usize,
	skipped: usize,
	tickers: Vec<ReportEntry<'a>>,
}

impl BatchReport {
	pub fn written(&self) -> usize {
		self.count(|status| matches!(status, TickerStatus::Written { .. }))
	}

	pub fn failed(&self) -> usize {
		self.count(|status| matches!(status, TickerStatus::Failed(_)))
	}

	pub fn skipped(&self) -> usize {
		self.count(|status| matches!(status, TickerStatus::Skipped))
	}

	pub fn is_success(&self) -> bool {
		self.failed() == 0 && !self.aborted
	}

	pub fn first_failure(&self) -> Option<(&str, &DataError)> {
		self.outcomes.iter().find_map(|outcome| match &outcome.status {
			TickerStatus::Failed(err) => Some((outcome.ticker.as_str(), err)),
			_ => None,
		})
	}

	pub fn to_json(&self) -> Result<String, DataError> {
		let tickers = self
			.outcomes
			.iter()
			.map(|outcome| match &outcome.status {
				TickerStatus::Written { rows, path } => ReportEntry {
					ticker: &outcome.ticker,
					status: "written",
					rows: Some(*rows),
					path: Some(path.display().to_string()),
					error: None,
				},
				TickerStatus::Failed(err) => ReportEntry {
					ticker: &outcome.ticker,
					status: "failed",
					rows: None,
					path: None,
					error: Some(err.to_string()),
				},
				TickerStatus::Skipped => ReportEntry {
					ticker: &outcome.ticker,
					status: "skipped",
					rows: None,
					path: None,
					error: None,
				},
			})
			.collect();

		let document = ReportDocument {
			aborted: self.aborted,
			written: self.written(),
			failed: self.failed(),
			skipped: self.skipped(),
			tickers,
		};
		Ok(serde_json::to_string_pretty(&document)?)
	}

	pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), DataError> {
		let path = path.as_ref();
		if let Some(parent) = path.parent() {
			if !parent.as_os_str().is_empty() {
				fs::create_dir_all(parent)?;
			}
		}
		fs::write(path, self.to_json()?)?;
		Ok(())
	}

	fn count(&self, predicate: impl Fn(&TickerStatus) -> bool) -> usize {
		self.outcomes.iter().filter(|outcome| predicate(&outcome.status)).count()
	}
}

type TickerResult = (String, Result<IndicatorSeries, DataError>);

/// Run every ticker's pipeline, in input order.
///
/// With more than one worker the series are spread over scoped threads; results are put back
/// into input order before returning.
pub fn compute_all(
	series: Vec<DailySeries>,
	indicators: &IndicatorConfig,
	workers: usize,
) -> Result<Vec<TickerResult>, DataError> {
	let workers = workers.max(1).min(series.len().max(1));
	if workers == 1 {
		return Ok(series
			.into_iter()
			.map(|s| {
				let result = process_ticker(&s, indicators);
				(s.ticker, result)
			})
			.collect());
	}

	let indicators = *indicators;
	let (job_tx, job_rx) = channel::unbounded::<(usize, DailySeries)>();
	let (result_tx, result_rx) = channel::unbounded::<(usize, TickerResult)>();
	for job in series.into_iter().enumerate() {
		job_tx
			.send(job)
			.map_err(|_| DataError::Io(std::io::Error::other("ticker job channel closed")))?;
	}
	drop(job_tx);

	crossbeam::thread::scope(|scope| {
		for worker_id in 0..workers {
			let job_rx = job_rx.clone();
			let result_tx = result_tx.clone();
			scope.spawn(move |_| {
				while let Ok((idx, series)) = job_rx.recv() {
					debug!(worker_id, ticker = %series.ticker, "processing ticker");
					let result = process_ticker(&series, &indicators);
					if result_tx.send((idx, (series.ticker, result))).is_err() {
						break;
					}
				}
			});
		}
	})
	.map_err(|_| DataError::Io(std::io::Error::other("ticker worker panicked")))?;
	drop(result_tx);

	let mut results: Vec<(usize, TickerResult)> = result_rx.iter().collect();
	results.sort_by_key(|(idx, _)| *idx);
	Ok(results.into_iter().map(|(_, result)| result).collect())
}

/// Compute, check the row-count contract and write every ticker.
///
/// Under `FailurePolicy::Abort` the first failure stops all later writes; the remaining
/// tickers are reported as skipped.
pub fn run_batch(
	series: Vec<DailySeries>,
	writer: &mut ResultWriter,
	options: &BatchOptions,
) -> Result<BatchReport, DataError> {
	let results = compute_all(series, &options.indicators, options.workers)?;
	let mut report = BatchReport::default();

	for (ticker, result) in results {
		if report.aborted {
			report.outcomes.push(TickerOutcome {
				ticker,
				status: TickerStatus::Skipped,
			});
			continue;
		}

		let written = result.and_then(|output| {
			output.ensure_len(options.expected_rows)?;
			let path = writer.write(&output)?;
			Ok((output.len(), path))
		});

		let status = match written {
			Ok((rows, path)) => {
				info!(ticker = %ticker, rows, path = %path.display(), "ticker written");
				TickerStatus::Written { rows, path }
			}
			Err(err) => {
				error!(ticker = %ticker, error = %err, "ticker failed");
				if options.failure_policy == FailurePolicy::Abort {
					report.aborted = true;
				}
				TickerStatus::Failed(err)
			}
		};
		report.outcomes.push(TickerOutcome { ticker, status });
	}

	if report.aborted {
		warn!(skipped = report.skipped(), "batch aborted");
	}
	Ok(report)
}

/// Load the configured input, process every ticker and write the results.
pub fn run(config: &PipelineConfig) -> Result<BatchReport, DataError> {
	let table = load_daily_csv(&config.input)?;
	let mut writer = ResultWriter::new(&config.output_dir, config.format);
	let report = run_batch(table.into_series(), &mut writer, &BatchOptions::from(config))?;

	if let Some(path) = &config.report {
		report.write_json(path)?;
	}

	info!(
		written = report.written(),
		failed = report.failed(),
		skipped = report.skipped(),
		ema_gap_policy = config.indicators.ema_gap_policy.as_str(),
		output_dir = %writer.output_dir().display(),
		"data processing complete"
	);
	Ok(report)
}
