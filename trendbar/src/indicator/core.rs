/// A close-price indicator evaluated over a fixed monthly sequence.
///
/// `None` closes mark months without trading data; implementations must not treat them as
/// zero.
pub trait Indicator: Send {
    fn name(&self) -> &str;
    fn reset(&mut self);
    fn update(&mut self, close: Option<f64>) -> Option<f64>;

    fn backfill(&mut self, closes: &[Option<f64>]) -> Vec<Option<f64>> {
        self.reset();
        closes.iter().map(|close| self.update(*close)).collect()
    }
}
