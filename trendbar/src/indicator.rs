pub mod core;
pub mod ema;
pub mod engine;
pub mod manager;
pub mod sma;

pub use self::core::Indicator;
pub use ema::Ema;
pub use engine::{IndicatorConfig, add_indicators, add_indicators_with};
pub use manager::IndicatorManager;
pub use sma::Sma;
