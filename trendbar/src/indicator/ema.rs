use crate::constant::EmaGapPolicy;

use super::core::Indicator;

#[derive(Debug, Clone)]
pub struct Ema {
    name: String,
    alpha: f64,
    gap_policy: EmaGapPolicy,
    value: Option<f64>,
    broken: bool,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self::with_gap_policy(period, EmaGapPolicy::default())
    }

    pub fn with_gap_policy(period: usize, gap_policy: EmaGapPolicy) -> Self {
        assert!(period > 0, "period must be > 0");
        Self {
            name: format!("EMA_{period}"),
            alpha: 2.0 / (period as f64 + 1.0),
            gap_policy,
            value: None,
            broken: false,
        }
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn reset(&mut self) {
        self.value = None;
        self.broken = false;
    }

    fn update(&mut self, close: Option<f64>) -> Option<f64> {
        let Some(price) = close else {
            return match self.gap_policy {
                EmaGapPolicy::Break => {
                    // a gap before the seed does not break anything
                    if self.value.take().is_some() {
                        self.broken = true;
                    }
                    None
                }
                EmaGapPolicy::Carry => self.value,
            };
        };
        if self.broken {
            return None;
        }

        self.value = Some(match self.value {
            None => price,
            Some(prev) => self.alpha * price + (1.0 - self.alpha) * prev,
        });
        self.value
    }
}
