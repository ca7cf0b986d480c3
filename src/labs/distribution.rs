//! Exact sampling distribution of a statistic over `n` i.i.d. draws from a
//! small discrete distribution.
//!
//! Every ordered outcome of the `n` draws is enumerated. Statistic values are
//! rounded to 3 decimals, joint probabilities are rounded to 3 decimals, and
//! per-value sums are rounded again.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DistributionError {
    #[error("values and probabilities differ in length ({values} vs {probs})")]
    LengthMismatch { values: usize, probs: usize },
    #[error("distribution has no values")]
    Empty,
    #[error("sample size must be at least 1")]
    ZeroSampleSize,
    #[error("{values}^{sample_size} outcomes are too many to enumerate")]
    TooManyOutcomes { values: usize, sample_size: usize },
}

/// Upper bound on the number of enumerated outcomes (`values^n`).
pub const MAX_OUTCOMES: usize = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Statistic {
    Mean,
    Median,
}

impl Statistic {
    pub fn compute(self, sample: &[f64]) -> f64 {
        match self {
            Statistic::Mean => sample.iter().sum::<f64>() / sample.len() as f64,
            Statistic::Median => {
                let mut sorted = sample.to_vec();
                sorted.sort_by(f64::total_cmp);
                let mid = sorted.len() / 2;
                if sorted.len() % 2 == 1 {
                    sorted[mid]
                } else {
                    (sorted[mid - 1] + sorted[mid]) / 2.0
                }
            }
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Statistic::Mean => "mean",
            Statistic::Median => "median",
        })
    }
}

pub fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

/// `(value, probability)` pairs ordered by value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    pub statistic: Statistic,
    pub entries: Vec<(f64, f64)>,
}

impl Distribution {
    pub fn total_probability(&self) -> f64 {
        self.entries.iter().map(|(_, p)| p).sum()
    }

    pub fn expected_value(&self) -> f64 {
        self.entries.iter().map(|(v, p)| v * p).sum()
    }

    pub fn probability_of(&self, value: f64) -> Option<f64> {
        self.entries
            .iter()
            .find(|(v, _)| (v - value).abs() < 1e-9)
            .map(|(_, p)| *p)
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>10}  {:>7}", self.statistic, "P")?;
        for (v, p) in &self.entries {
            writeln!(f, "{:>10.3}  {:>7.3}", v, p)?;
        }
        Ok(())
    }
}

pub fn sampling_distribution(
    values: &[f64],
    probs: &[f64],
    n: usize,
    statistic: Statistic,
) -> Result<Distribution, DistributionError> {
    if values.len() != probs.len() {
        return Err(DistributionError::LengthMismatch {
            values: values.len(),
            probs: probs.len(),
        });
    }
    if values.is_empty() {
        return Err(DistributionError::Empty);
    }
    if n == 0 {
        return Err(DistributionError::ZeroSampleSize);
    }
    let outcomes = u32::try_from(n)
        .ok()
        .and_then(|exp| values.len().checked_pow(exp));
    if !matches!(outcomes, Some(count) if count <= MAX_OUTCOMES) {
        return Err(DistributionError::TooManyOutcomes {
            values: values.len(),
            sample_size: n,
        });
    }

    // Keys are statistic values in thousandths so they order and compare exactly.
    let mut sums: BTreeMap<i64, f64> = BTreeMap::new();
    let k = values.len();
    let mut indices = vec![0usize; n];
    let mut sample = vec![0.0; n];
    loop {
        let mut joint = 1.0;
        for (slot, &idx) in indices.iter().enumerate() {
            sample[slot] = values[idx];
            joint *= probs[idx];
        }
        let key = (statistic.compute(&sample) * 1000.0).round() as i64;
        *sums.entry(key).or_insert(0.0) += round3(joint);

        // Odometer increment over k^n outcomes, last draw fastest.
        let mut pos = n;
        loop {
            if pos == 0 {
                let entries = sums
                    .into_iter()
                    .map(|(key, p)| (key as f64 / 1000.0, round3(p)))
                    .collect();
                return Ok(Distribution { statistic, entries });
            }
            pos -= 1;
            indices[pos] += 1;
            if indices[pos] < k {
                break;
            }
            indices[pos] = 0;
        }
    }
}
