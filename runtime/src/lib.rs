mod batch;
mod config;
mod pipeline;

pub use batch::{BatchOptions, BatchReport, TickerOutcome, TickerStatus, compute_all, run, run_batch};
pub use config::{FailurePolicy, PipelineConfig};
pub use pipeline::process_ticker;

pub fn init(config: &PipelineConfig) {
	trendbar::init_logging_with_level(trendbar::parse_level(&config.log_level));
}
