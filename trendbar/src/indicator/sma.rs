use std::collections::VecDeque;

use super::core::Indicator;

#[derive(Debug, Clone)]
pub struct Sma {
    name: String,
    period: usize,
    window: VecDeque<Option<f64>>,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "period must be > 0");
        Self {
            name: format!("SMA_{period}"),
            period,
            window: VecDeque::with_capacity(period),
        }
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn reset(&mut self) {
        self.window.clear();
    }

    fn update(&mut self, close: Option<f64>) -> Option<f64> {
        self.window.push_back(close);
        if self.window.len() > self.period {
            self.window.pop_front();
        }
        if self.window.len() < self.period {
            return None;
        }

        // one undefined close poisons the whole window
        let mut sum = 0.0;
        for value in &self.window {
            sum += (*value)?;
        }
        Some(sum / self.period as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::Sma;
    use crate::indicator::Indicator;

    #[test]
    fn defined_only_once_window_is_full() {
        let mut sma = Sma::new(3);
        let out = sma.backfill(&[Some(1.0), Some(2.0), Some(3.0), Some(4.0)]);
        assert_eq!(out, vec![None, None, Some(2.0), Some(3.0)]);
    }

    #[test]
    fn gap_blanks_every_window_that_covers_it() {
        let mut sma = Sma::new(2);
        let out = sma.backfill(&[Some(1.0), None, Some(3.0), Some(5.0)]);
        assert_eq!(out, vec![None, None, None, Some(4.0)]);
    }

    #[test]
    fn backfill_resets_previous_state() {
        let mut sma = Sma::new(2);
        let _ = sma.backfill(&[Some(10.0), Some(20.0)]);
        let out = sma.backfill(&[Some(1.0)]);
        assert_eq!(out, vec![None]);
    }
}
