use std::fs;
use std::path::{Path, PathBuf};

use market::OutputFormat;
use serde::{Deserialize, Serialize};
use trendbar::{Const, DataError, IndicatorConfig};

/// What the batch does after a ticker fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
	/// Stop at the first failing ticker; later tickers are not written.
	#[default]
	Abort,
	/// Record the failure and keep going.
	Continue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
	pub input: PathBuf,
	pub output_dir: PathBuf,
	pub expected_rows: usize,
	pub format: OutputFormat,
	pub workers: usize,
	pub failure_policy: FailurePolicy,
	pub report: Option<PathBuf>,
	pub log_level: String,
	pub indicators: IndicatorConfig,
}

impl Default for PipelineConfig {
	fn default() -> Self {
		Self {
			input: PathBuf::from("data/output_file.csv"),
			output_dir: PathBuf::from("output"),
			expected_rows: Const::EXPECTED_MONTHS,
			format: OutputFormat::Csv,
			workers: 1,
			failure_policy: FailurePolicy::Abort,
			report: None,
			log_level: "info".to_string(),
			indicators: IndicatorConfig::default(),
		}
	}
}

impl PipelineConfig {
	pub fn from_yaml_str(yaml: &str) -> Result<Self, DataError> {
		let config: Self = serde_yaml::from_str(yaml)?;
		Ok(config)
	}

	pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, DataError> {
		let raw = fs::read_to_string(path)?;
		Self::from_yaml_str(&raw)
	}

	pub fn worker_count(&self) -> usize {
		self.workers.max(1)
	}
}
