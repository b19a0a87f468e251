//! Discrete distributions derived from a histogram.
//!
//! [`DiscreteDistribution`] owns a validated [`Histogram`] and exposes the
//! statistics of the distribution it describes. Each statistic is computed on
//! first access and cached for the lifetime of the instance. The cache slots
//! are [`OnceLock`]s, so a distribution can be shared between threads; racing
//! first accesses compute the same value and only one is kept.
//!
//! # Examples
//!
//! ```
//! use bucketstats::{distribution::DiscreteDistribution, histogram::Histogram};
//!
//! let dist = DiscreteDistribution::new(Histogram::from_counts([3.0, 4.0, 3.0, 4.0]));
//! assert_eq!(dist.median(), 1.5);
//! assert_eq!(dist.modes(), &[1.0, 3.0]);
//! assert!(dist.mode().is_err());
//! ```

use std::sync::OnceLock;

use serde_json::Value;

use crate::{
    histogram::{Histogram, ValidationError},
    series,
};

/// Returned by [`DiscreteDistribution::mode`] when there is not exactly one mode.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
#[display("expected a single mode; found {}", format_modes(modes))]
pub struct AmbiguityError {
    /// Every key sharing the maximum weight, in support order.
    pub modes: Vec<f64>,
}

fn format_modes(modes: &[f64]) -> String {
    if modes.is_empty() {
        return "none".to_owned();
    }
    modes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// An immutable discrete distribution backed by a histogram.
///
/// "Index" refers to the histogram support and "values" to its weights.
#[derive(Debug)]
pub struct DiscreteDistribution {
    hist: Histogram,
    sum: OnceLock<f64>,
    cumsum: OnceLock<Histogram>,
    rcumsum: OnceLock<Histogram>,
    pmf: OnceLock<Histogram>,
    cmf: OnceLock<Histogram>,
    rcmf: OnceLock<Histogram>,
    mean: OnceLock<f64>,
    median: OnceLock<f64>,
    median_key: OnceLock<f64>,
    modes: OnceLock<Vec<f64>>,
    variance: OnceLock<f64>,
    std_dev: OnceLock<f64>,
    entropy: OnceLock<f64>,
    support: OnceLock<Vec<f64>>,
}

impl From<Histogram> for DiscreteDistribution {
    fn from(hist: Histogram) -> Self {
        Self::new(hist)
    }
}

impl TryFrom<Value> for DiscreteDistribution {
    type Error = ValidationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Histogram::try_from(value).map(Self::new)
    }
}

impl Clone for DiscreteDistribution {
    fn clone(&self) -> Self {
        Self::new(self.hist.clone())
    }
}

impl DiscreteDistribution {
    #[must_use]
    pub fn new(hist: Histogram) -> Self {
        Self {
            hist,
            sum: OnceLock::new(),
            cumsum: OnceLock::new(),
            rcumsum: OnceLock::new(),
            pmf: OnceLock::new(),
            cmf: OnceLock::new(),
            rcmf: OnceLock::new(),
            mean: OnceLock::new(),
            median: OnceLock::new(),
            median_key: OnceLock::new(),
            modes: OnceLock::new(),
            variance: OnceLock::new(),
            std_dev: OnceLock::new(),
            entropy: OnceLock::new(),
            support: OnceLock::new(),
        }
    }

    #[must_use]
    pub fn histogram(&self) -> &Histogram {
        &self.hist
    }

    #[must_use]
    pub fn into_histogram(self) -> Histogram {
        self.hist
    }

    /// The full key sequence, including zero-weight bins.
    #[must_use]
    pub fn index(&self) -> &[f64] {
        self.hist.support()
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        self.hist.weights()
    }

    /// Total weight.
    #[must_use]
    pub fn sum(&self) -> f64 {
        *self.sum.get_or_init(|| self.hist.total())
    }

    /// Forward running sum of the weights.
    #[must_use]
    pub fn cumsum(&self) -> &Histogram {
        self.cumsum
            .get_or_init(|| self.hist.with_weights(series::cumsum(self.values())))
    }

    /// Running sum from the last bin backwards; the first bin holds the total.
    #[must_use]
    pub fn rcumsum(&self) -> &Histogram {
        self.rcumsum
            .get_or_init(|| self.hist.with_weights(series::rcumsum(self.values())))
    }

    /// Probability mass function: each weight divided by the total.
    ///
    /// A zero total yields NaN (or infinite) masses.
    #[must_use]
    pub fn pmf(&self) -> &Histogram {
        self.pmf.get_or_init(|| {
            let sum = self.sum();
            self.hist.map(|w| w / sum)
        })
    }

    /// Cumulative mass function.
    #[must_use]
    pub fn cmf(&self) -> &Histogram {
        self.cmf.get_or_init(|| {
            let sum = self.sum();
            self.cumsum().map(|w| w / sum)
        })
    }

    /// Reverse cumulative mass function, the discrete survival function.
    #[must_use]
    pub fn rcmf(&self) -> &Histogram {
        self.rcmf.get_or_init(|| {
            let sum = self.sum();
            self.rcumsum().map(|w| w / sum)
        })
    }

    /// Expected key under the pmf.
    #[must_use]
    pub fn mean(&self) -> f64 {
        *self.mean.get_or_init(|| {
            self.index()
                .iter()
                .zip(self.pmf().weights())
                .map(|(k, p)| k * p)
                .sum()
        })
    }

    /// Weighted median, as a position in the support.
    ///
    /// Inverts the cumulative mass: with `t = 2 * cumsum - sum`, the median
    /// sits between the leftmost position where `t >= 0` and the leftmost
    /// position where `t > 0`. When those coincide the median is that
    /// position; otherwise it is their midpoint, which averages the two middle
    /// ranks of an even total weight.
    ///
    /// The result is a rank, not a key. It equals the key only when the
    /// support is `0, 1, ..., n - 1`; see [`median_key`](Self::median_key).
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn median(&self) -> f64 {
        *self.median.get_or_init(|| {
            let sum = self.sum();
            let t = self
                .cumsum()
                .weights()
                .iter()
                .map(|c| 2.0 * c - sum)
                .collect::<Vec<_>>();
            let left = series::search_sorted_left(&t, 0.0);
            let right = series::search_sorted_right(&t, 0.0);
            if left == right {
                left as f64
            } else {
                (left + right) as f64 / 2.0
            }
        })
    }

    /// The median rank mapped back onto the support.
    ///
    /// Fractional ranks are linearly interpolated between neighbouring keys,
    /// and ranks past the end clamp to the last key. Returns NaN for an empty
    /// histogram.
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    #[must_use]
    pub fn median_key(&self) -> f64 {
        *self.median_key.get_or_init(|| {
            let index = self.index();
            let Some(&last) = index.last() else {
                return f64::NAN;
            };
            let rank = self.median();
            let lo = rank.floor() as usize;
            if lo + 1 >= index.len() {
                return last;
            }
            let frac = rank - lo as f64;
            index[lo] + frac * (index[lo + 1] - index[lo])
        })
    }

    /// Keys whose weight equals the maximum weight, in support order.
    #[must_use]
    pub fn modes(&self) -> &[f64] {
        self.modes.get_or_init(|| {
            let max = self
                .values()
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max);
            self.hist
                .iter()
                .filter(|&(_, w)| w == max)
                .map(|(k, _)| k)
                .collect()
        })
    }

    /// The single mode.
    ///
    /// Fails with [`AmbiguityError`] listing every mode when the distribution
    /// is multimodal, or listing none when the histogram is empty.
    pub fn mode(&self) -> Result<f64, AmbiguityError> {
        match self.modes() {
            &[mode] => Ok(mode),
            modes => Err(AmbiguityError {
                modes: modes.to_vec(),
            }),
        }
    }

    /// Second moment minus the squared mean.
    #[must_use]
    pub fn variance(&self) -> f64 {
        *self.variance.get_or_init(|| {
            let second_moment = self
                .index()
                .iter()
                .zip(self.pmf().weights())
                .map(|(k, p)| k * k * p)
                .sum::<f64>();
            second_moment - self.mean().powi(2)
        })
    }

    #[must_use]
    pub fn std_dev(&self) -> f64 {
        *self.std_dev.get_or_init(|| self.variance().sqrt())
    }

    /// Shannon entropy of the pmf, in bits.
    ///
    /// Bins with zero probability contribute nothing (`0 * log2(0) = 0`).
    #[must_use]
    pub fn entropy(&self) -> f64 {
        *self.entropy.get_or_init(|| {
            -self
                .pmf()
                .weights()
                .iter()
                .filter(|&&p| p != 0.0)
                .map(|&p| p * p.log2())
                .sum::<f64>()
        })
    }

    /// Keys carrying strictly positive weight.
    #[must_use]
    pub fn support(&self) -> &[f64] {
        self.support.get_or_init(|| {
            self.hist
                .iter()
                .filter(|&(_, w)| w > 0.0)
                .map(|(k, _)| k)
                .collect()
        })
    }
}
