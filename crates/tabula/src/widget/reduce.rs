//! Reductions behind each aggregation function.

use crate::input::RawValue;
use crate::schema::Aggregation;

/// Running state for one group of values.
///
/// Tracks every row (for COUNT) and the numerically coercible subset (for
/// the other functions). Non-coercible values are skipped, not zero-filled.
#[derive(Debug, Clone)]
pub(crate) struct Accumulator {
    rows: usize,
    numeric: usize,
    sum: f64,
    min: f64,
    max: f64,
}

impl Default for Accumulator {
    fn default() -> Self {
        Self {
            rows: 0,
            numeric: 0,
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }
}

impl Accumulator {
    /// Add one row's value.
    pub(crate) fn push(&mut self, value: &RawValue) {
        self.rows += 1;
        if let Some(n) = value.to_number() {
            self.numeric += 1;
            self.sum += n;
            self.min = self.min.min(n);
            self.max = self.max.max(n);
        }
    }

    /// Reduce with the given function. Empty numeric sets reduce to 0.
    pub(crate) fn finish(&self, aggregation: Aggregation) -> f64 {
        if aggregation == Aggregation::Count {
            return self.rows as f64;
        }
        if self.numeric == 0 {
            return 0.0;
        }
        match aggregation {
            Aggregation::Sum => self.sum,
            Aggregation::Avg => self.sum / self.numeric as f64,
            Aggregation::Min => self.min,
            Aggregation::Max => self.max,
            Aggregation::Count => self.rows as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accumulate(values: &[RawValue]) -> Accumulator {
        let mut acc = Accumulator::default();
        for v in values {
            acc.push(v);
        }
        acc
    }

    #[test]
    fn test_reductions() {
        let acc = accumulate(&[
            RawValue::from(4i64),
            RawValue::from("x"),
            RawValue::from("2"),
            RawValue::Null,
        ]);

        assert_eq!(acc.finish(Aggregation::Count), 4.0);
        assert_eq!(acc.finish(Aggregation::Sum), 6.0);
        assert_eq!(acc.finish(Aggregation::Avg), 3.0);
        assert_eq!(acc.finish(Aggregation::Min), 2.0);
        assert_eq!(acc.finish(Aggregation::Max), 4.0);
    }

    #[test]
    fn test_empty_reduces_to_zero() {
        let acc = accumulate(&[RawValue::from("n/a")]);
        assert_eq!(acc.finish(Aggregation::Min), 0.0);
        assert_eq!(acc.finish(Aggregation::Avg), 0.0);
        assert_eq!(acc.finish(Aggregation::Count), 1.0);
    }
}
