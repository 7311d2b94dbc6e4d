use std::collections::HashMap;

use super::core::Indicator;

/// Named indicators evaluated together over one close sequence.
#[derive(Default)]
pub struct IndicatorManager {
    indicators: Vec<Box<dyn Indicator>>,
    outputs: HashMap<String, Vec<Option<f64>>>,
}

impl IndicatorManager {
    pub fn register(&mut self, indicator: Box<dyn Indicator>) {
        let name = indicator.name().to_string();
        if self.outputs.contains_key(&name) {
            return;
        }
        self.outputs.insert(name, Vec::new());
        self.indicators.push(indicator);
    }

    pub fn names(&self) -> Vec<&str> {
        self.indicators.iter().map(|indicator| indicator.name()).collect()
    }

    /// Recompute every registered indicator from scratch over `closes`.
    pub fn backfill(&mut self, closes: &[Option<f64>]) {
        for indicator in &mut self.indicators {
            let values = indicator.backfill(closes);
            self.outputs.insert(indicator.name().to_string(), values);
        }
    }

    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.outputs.get(name).map(Vec::as_slice)
    }

    /// Value of `name` at `index`; `None` when undefined or not registered.
    pub fn value(&self, name: &str, index: usize) -> Option<f64> {
        self.outputs
            .get(name)
            .and_then(|values| values.get(index).copied().flatten())
    }
}

#[cfg(test)]
mod tests {
    use super::IndicatorManager;
    use crate::indicator::{Ema, Sma};

    #[test]
    fn duplicate_names_are_registered_once() {
        let mut manager = IndicatorManager::default();
        manager.register(Box::new(Sma::new(2)));
        manager.register(Box::new(Sma::new(2)));
        manager.register(Box::new(Ema::new(2)));
        assert_eq!(manager.names(), vec!["SMA_2", "EMA_2"]);
    }

    #[test]
    fn backfill_fills_every_column() {
        let mut manager = IndicatorManager::default();
        manager.register(Box::new(Sma::new(2)));
        manager.register(Box::new(Ema::new(2)));
        manager.backfill(&[Some(2.0), Some(4.0)]);

        assert_eq!(manager.column("SMA_2"), Some(&[None, Some(3.0)][..]));
        assert_eq!(manager.value("EMA_2", 0), Some(2.0));
        assert_eq!(manager.value("missing", 0), None);
    }
}
