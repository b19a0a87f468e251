//! Free-function API over histograms.
//!
//! Each function wraps the histogram in a [`DiscreteDistribution`] and
//! forwards to it, so there is a single implementation of every statistic.
//! Prefer building a distribution directly when several statistics of the
//! same histogram are needed.

use crate::{
    distribution::{AmbiguityError, DiscreteDistribution},
    histogram::Histogram,
};

fn distribution(hist: &Histogram) -> DiscreteDistribution {
    DiscreteDistribution::new(hist.clone())
}

/// Forward running sum of the weights.
#[must_use]
pub fn cumsum(hist: &Histogram) -> Histogram {
    distribution(hist).cumsum().clone()
}

/// Reverse cumulative sum of the weights.
///
/// # Examples
///
/// ```
/// use bucketstats::{histogram::Histogram, rcumsum};
///
/// let hist = Histogram::from_counts([0.0, 1.0, 2.0, 3.0, 4.0]);
/// assert_eq!(rcumsum(&hist).weights(), &[10.0, 10.0, 9.0, 7.0, 4.0]);
/// ```
#[must_use]
pub fn rcumsum(hist: &Histogram) -> Histogram {
    distribution(hist).rcumsum().clone()
}

/// Probability mass function.
///
/// # Examples
///
/// ```
/// use bucketstats::{histogram::Histogram, pmf};
///
/// let hist = Histogram::from_counts([1.0, 1.0, 1.0, 1.0, 1.0]);
/// assert_eq!(pmf(&hist).weights(), &[0.2; 5]);
/// ```
#[must_use]
pub fn pmf(hist: &Histogram) -> Histogram {
    distribution(hist).pmf().clone()
}

/// Cumulative mass function.
#[must_use]
pub fn cmf(hist: &Histogram) -> Histogram {
    distribution(hist).cmf().clone()
}

/// Reverse cumulative mass function.
#[must_use]
pub fn rcmf(hist: &Histogram) -> Histogram {
    distribution(hist).rcmf().clone()
}

#[must_use]
pub fn mean(hist: &Histogram) -> f64 {
    distribution(hist).mean()
}

/// Weighted median as a support position; see [`DiscreteDistribution::median`].
///
/// # Examples
///
/// ```
/// use bucketstats::{histogram::Histogram, median};
///
/// assert_eq!(median(&Histogram::from_counts([1.0, 1.0, 1.0])), 1.0);
/// assert_eq!(median(&Histogram::from_counts([9.0, 1.0])), 0.0);
/// assert_eq!(median(&Histogram::from_counts([1.0; 6])), 2.5);
/// assert_eq!(median(&Histogram::from_counts([3.0, 4.0, 3.0, 4.0])), 1.5);
/// ```
#[must_use]
pub fn median(hist: &Histogram) -> f64 {
    distribution(hist).median()
}

#[must_use]
pub fn modes(hist: &Histogram) -> Vec<f64> {
    distribution(hist).modes().to_vec()
}

pub fn mode(hist: &Histogram) -> Result<f64, AmbiguityError> {
    distribution(hist).mode()
}

#[must_use]
pub fn variance(hist: &Histogram) -> f64 {
    distribution(hist).variance()
}

#[must_use]
pub fn std_dev(hist: &Histogram) -> f64 {
    distribution(hist).std_dev()
}

/// Shannon entropy in bits.
#[must_use]
pub fn entropy(hist: &Histogram) -> f64 {
    distribution(hist).entropy()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forwarders_agree_with_distribution() {
        let hist = Histogram::from_pairs([(1.0, 4.0), (2.0, 0.0), (5.0, 6.0), (7.0, 6.0)]).unwrap();
        let d = DiscreteDistribution::new(hist.clone());

        assert_eq!(&cumsum(&hist), d.cumsum());
        assert_eq!(&rcumsum(&hist), d.rcumsum());
        assert_eq!(&pmf(&hist), d.pmf());
        assert_eq!(&cmf(&hist), d.cmf());
        assert_eq!(&rcmf(&hist), d.rcmf());
        assert_eq!(mean(&hist).to_bits(), d.mean().to_bits());
        assert_eq!(median(&hist).to_bits(), d.median().to_bits());
        assert_eq!(modes(&hist), d.modes());
        assert_eq!(mode(&hist), d.mode());
        assert_eq!(variance(&hist).to_bits(), d.variance().to_bits());
        assert_eq!(std_dev(&hist).to_bits(), d.std_dev().to_bits());
        assert_eq!(entropy(&hist).to_bits(), d.entropy().to_bits());
    }

    #[test]
    fn test_cmf_uniform() {
        let hist = Histogram::from_counts([1.0; 5]);
        let cmf = cmf(&hist);
        for (c, expected) in cmf.weights().iter().zip([0.2, 0.4, 0.6, 0.8, 1.0]) {
            assert!((c - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_rcmf_uniform() {
        let hist = Histogram::from_counts([1.0; 5]);
        let rcmf = rcmf(&hist);
        for (r, expected) in rcmf.weights().iter().zip([1.0, 0.8, 0.6, 0.4, 0.2]) {
            assert!((r - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_rcumsum_does_not_modify_input() {
        let hist = Histogram::from_counts([1.0, 2.0, 3.0]);
        let before = hist.clone();
        let _ = rcumsum(&hist);
        assert_eq!(hist, before);
    }
}
