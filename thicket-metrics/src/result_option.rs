use serde::{Deserialize, Serialize};

/// How per-node values are reduced to a single value.
///
/// NaN inputs are dropped before reducing. With nothing left, [`ResultOption::Sum`]
/// yields 0 and the others yield NaN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultOption {
    Sum,
    Highest,
    Average,
}

impl ResultOption {
    pub fn reduce<I>(self, values: I) -> f64
    where
        I: IntoIterator<Item = f64>,
    {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut highest = f64::NEG_INFINITY;
        for value in values.into_iter().filter(|v| !v.is_nan()) {
            count += 1;
            sum += value;
            highest = highest.max(value);
        }

        match (self, count) {
            (ResultOption::Sum, _) => sum,
            (_, 0) => f64::NAN,
            (ResultOption::Highest, _) => highest,
            (ResultOption::Average, n) => sum / n as f64,
        }
    }
}
