//! Survival analysis on binned, right-censored counts.
//!
//! A [`SurvivalPair`] holds two histograms on one support:
//!
//! - `total`: every subject leaving the risk set at each bin, whether its
//!   event was observed or it was censored there,
//! - `observed`: the subjects whose event was observed at each bin.
//!
//! The risk set at bin `i` is the reverse cumulative sum of `total` (everyone
//! still present at or beyond that bin). From it the pair derives the
//! Kaplan-Meier survival curve, its Greenwood variance, the Nelson-Aalen
//! cumulative hazard and its variance. Without censoring, `observed` is
//! simply `total`.
//!
//! Wherever the risk set is exhausted (size zero) a bin contributes no hazard:
//! divisions by the risk set go through [`series::safe_divide`] with a fill
//! of zero, so estimators stay finite at the tail.
//!
//! # Examples
//!
//! ```
//! use bucketstats::{histogram::Histogram, survival::SurvivalPair};
//!
//! // Five subjects, one event per bin, no censoring.
//! let pair = SurvivalPair::uncensored(Histogram::from_counts([1.0; 5]));
//! let km = pair.kaplan_meier();
//! assert!((km.weights()[0] - 0.8).abs() < 1e-12);
//! assert_eq!(km.weights()[4], 0.0);
//! ```

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    distribution::DiscreteDistribution,
    histogram::{Histogram, ValidationError},
    series,
};

/// Total and observed-event counts sharing one support.
#[derive(Debug, Clone, PartialEq)]
pub struct SurvivalPair {
    total: Histogram,
    observed: Histogram,
}

impl SurvivalPair {
    /// Pairs `total` counts with `observed` event counts.
    ///
    /// `observed` defaults to `total` (no censoring). When given, it must have
    /// exactly the same support as `total`.
    pub fn new(total: Histogram, observed: Option<Histogram>) -> Result<Self, ValidationError> {
        let observed = match observed {
            Some(observed) => {
                total.ensure_same_support(&observed)?;
                observed
            }
            None => total.clone(),
        };
        Ok(Self { total, observed })
    }

    /// A pair in which every subject's event was observed.
    #[must_use]
    pub fn uncensored(total: Histogram) -> Self {
        let observed = total.clone();
        Self { total, observed }
    }

    /// Bins raw `(time, is_censored)` observations by their distinct times.
    ///
    /// # Examples
    ///
    /// ```
    /// use bucketstats::survival::SurvivalPair;
    ///
    /// // Data: (time, is_censored)
    /// let pair = SurvivalPair::from_observations([(10, false), (20, true), (30, false)]);
    /// assert_eq!(pair.total().support(), &[10.0, 20.0, 30.0]);
    /// assert_eq!(pair.observed().weights(), &[1.0, 0.0, 1.0]);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_observations<I>(data: I) -> Self
    where
        I: IntoIterator<Item = (usize, bool)>,
    {
        let mut bins = BTreeMap::<usize, (usize, usize)>::new();
        for (time, is_censored) in data {
            let (total, events) = bins.entry(time).or_default();
            *total += 1;
            if !is_censored {
                *events += 1;
            }
        }

        let mut support = Vec::with_capacity(bins.len());
        let mut total = Vec::with_capacity(bins.len());
        let mut observed = Vec::with_capacity(bins.len());
        for (time, (count, events)) in bins {
            support.push(time as f64);
            total.push(count as f64);
            observed.push(events as f64);
        }
        let total = Histogram::from_sorted_parts(support, total);
        let observed = total.with_weights(observed);
        Self { total, observed }
    }

    #[must_use]
    pub fn total(&self) -> &Histogram {
        &self.total
    }

    #[must_use]
    pub fn observed(&self) -> &Histogram {
        &self.observed
    }

    fn at_risk_counts(&self) -> Vec<f64> {
        series::rcumsum(self.total.weights())
    }

    /// Risk set size at each bin.
    #[must_use]
    pub fn at_risk(&self) -> Histogram {
        self.total.with_weights(self.at_risk_counts())
    }

    /// Empirical survival function of `total`, ignoring censoring.
    #[must_use]
    pub fn survival(&self) -> Histogram {
        DiscreteDistribution::new(self.total.clone()).rcmf().clone()
    }

    fn hazard(&self) -> Vec<f64> {
        series::safe_divide(self.observed.weights(), &self.at_risk_counts(), 0.0)
    }

    /// Kaplan-Meier product-limit estimate of the survival function.
    #[must_use]
    pub fn kaplan_meier(&self) -> Histogram {
        let complement = self.hazard().iter().map(|h| 1.0 - h).collect::<Vec<_>>();
        self.total.with_weights(series::cumprod(&complement))
    }

    /// Greenwood's variance of the Kaplan-Meier estimate.
    #[must_use]
    pub fn var_kaplan_meier(&self) -> Histogram {
        let ni = self.at_risk_counts();
        let di = self.observed.weights();
        let denom = ni
            .iter()
            .zip(di)
            .map(|(n, d)| n * (n - d))
            .collect::<Vec<_>>();
        let inner = series::rcumsum(&series::safe_divide(di, &denom, 0.0));
        let km = self.kaplan_meier();
        let var = km
            .weights()
            .iter()
            .zip(inner)
            .map(|(s, g)| s * s * g)
            .collect();
        self.total.with_weights(var)
    }

    /// Nelson-Aalen estimate of the cumulative hazard.
    ///
    /// Bin-local hazards are summed from the last bin backwards.
    #[must_use]
    pub fn nelson_aalen(&self) -> Histogram {
        self.total.with_weights(series::rcumsum(&self.hazard()))
    }

    /// Variance of the Nelson-Aalen estimate.
    #[must_use]
    pub fn var_nelson_aalen(&self) -> Histogram {
        let var_km = self.var_kaplan_meier();
        let km_sq = self
            .kaplan_meier()
            .weights()
            .iter()
            .map(|s| s * s)
            .collect::<Vec<_>>();
        self.total
            .with_weights(series::safe_divide(var_km.weights(), &km_sq, 0.0))
    }

    /// The Kaplan-Meier curve restricted to bins with observed events.
    #[must_use]
    pub fn curve(&self) -> SurvivalCurve {
        let km = self.kaplan_meier();
        let var_km = self.var_kaplan_meier();
        let ni = self.at_risk_counts();

        let mut curve = SurvivalCurve::default();
        for (i, (time, events)) in self.observed.iter().enumerate() {
            if events > 0.0 {
                curve.times.push(time);
                curve.survival_prob.push(km.weights()[i]);
                curve.variance.push(var_km.weights()[i]);
                curve.at_risk.push(ni[i]);
                curve.events.push(events);
            }
        }
        curve
    }
}

/// Kaplan-Meier survival curve at the times where events were observed.
///
/// The curve stores parallel vectors; entry `i` of each describes `times[i]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SurvivalCurve {
    /// Bin keys with at least one observed event.
    pub times: Vec<f64>,
    /// Survival probability after the events at each time.
    pub survival_prob: Vec<f64>,
    /// Greenwood variance of the survival probability.
    pub variance: Vec<f64>,
    /// Risk set size at each time.
    pub at_risk: Vec<f64>,
    /// Observed events at each time.
    pub events: Vec<f64>,
}

impl SurvivalCurve {
    /// Time at which survival drops to or below 50%.
    ///
    /// Linear interpolation is used between neighbouring event times. Returns
    /// `None` when the curve is empty or never reaches 50%.
    ///
    /// # Examples
    ///
    /// ```
    /// use bucketstats::survival::SurvivalPair;
    ///
    /// let observations = [(10, false), (20, false), (30, false)];
    /// let curve = SurvivalPair::from_observations(observations).curve();
    /// let median = curve.median_survival().unwrap();
    /// assert!((median - 15.0).abs() < 1e-9);
    /// ```
    #[must_use]
    pub fn median_survival(&self) -> Option<f64> {
        let i = self.survival_prob.iter().position(|&s| s <= 0.5)?;
        if i == 0 {
            return Some(self.times[0]);
        }
        let (t0, t1) = (self.times[i - 1], self.times[i]);
        let (s0, s1) = (self.survival_prob[i - 1], self.survival_prob[i]);
        Some(t0 + (0.5 - s0) / (s1 - s0) * (t1 - t0))
    }

    /// Survival probability at `time` as a step function.
    ///
    /// Returns `1.0` before the first event time and the last known value
    /// after the last one.
    #[must_use]
    pub fn survival_at(&self, time: f64) -> f64 {
        let idx = self.times.partition_point(|&t| t <= time);
        if idx == 0 {
            1.0
        } else {
            self.survival_prob[idx - 1]
        }
    }
}

/// Empirical survival function of `x`; an alias of the reverse cmf.
#[must_use]
pub fn survival(x: &Histogram) -> Histogram {
    SurvivalPair::uncensored(x.clone()).survival()
}

/// Kaplan-Meier estimate for totals `x` and observed events `x_obs`.
///
/// # Examples
///
/// ```
/// use bucketstats::{histogram::Histogram, kaplan_meier};
///
/// let x = Histogram::from_counts([1.0; 5]);
/// let km = kaplan_meier(&x, None).unwrap();
/// let expected = [0.8, 0.6, 0.4, 0.2, 0.0];
/// assert!(km.weights().iter().zip(expected).all(|(a, b)| (a - b).abs() < 1e-9));
/// ```
pub fn kaplan_meier(
    x: &Histogram,
    x_obs: Option<&Histogram>,
) -> Result<Histogram, ValidationError> {
    Ok(SurvivalPair::new(x.clone(), x_obs.cloned())?.kaplan_meier())
}

/// Greenwood variance of the Kaplan-Meier estimate.
pub fn var_kaplan_meier(
    x: &Histogram,
    x_obs: Option<&Histogram>,
) -> Result<Histogram, ValidationError> {
    Ok(SurvivalPair::new(x.clone(), x_obs.cloned())?.var_kaplan_meier())
}

/// Nelson-Aalen cumulative hazard.
pub fn nelson_aalen(
    x: &Histogram,
    x_obs: Option<&Histogram>,
) -> Result<Histogram, ValidationError> {
    Ok(SurvivalPair::new(x.clone(), x_obs.cloned())?.nelson_aalen())
}

/// Variance of the Nelson-Aalen cumulative hazard.
pub fn var_nelson_aalen(
    x: &Histogram,
    x_obs: Option<&Histogram>,
) -> Result<Histogram, ValidationError> {
    Ok(SurvivalPair::new(x.clone(), x_obs.cloned())?.var_nelson_aalen())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-5;

    fn assert_close(actual: &Histogram, expected: &[f64]) {
        let weights = actual.weights();
        assert_eq!(weights.len(), expected.len(), "{weights:?} vs {expected:?}");
        for (a, e) in weights.iter().zip(expected) {
            assert!((a - e).abs() < TOL, "{weights:?} vs {expected:?}");
        }
    }

    fn uniform() -> Histogram {
        Histogram::from_counts([1.0; 5])
    }

    mod uncensored {
        use super::*;

        #[test]
        fn test_kaplan_meier() {
            assert_close(
                &kaplan_meier(&uniform(), None).unwrap(),
                &[0.8, 0.6, 0.4, 0.2, 0.0],
            );
        }

        #[test]
        fn test_var_kaplan_meier() {
            assert_close(
                &var_kaplan_meier(&uniform(), None).unwrap(),
                &[0.512, 0.27, 0.106_667, 0.02, 0.0],
            );
        }

        #[test]
        fn test_nelson_aalen() {
            assert_close(
                &nelson_aalen(&uniform(), None).unwrap(),
                &[2.283_333, 2.083_333, 1.833_333, 1.5, 1.0],
            );
        }

        #[test]
        fn test_var_nelson_aalen() {
            assert_close(
                &var_nelson_aalen(&uniform(), None).unwrap(),
                &[0.8, 0.75, 0.666_667, 0.5, 0.0],
            );
        }

        #[test]
        fn test_survival_is_rcmf() {
            assert_close(&survival(&uniform()), &[1.0, 0.8, 0.6, 0.4, 0.2]);
            let x = Histogram::from_counts([5.0, 6.0, 7.0, 8.0]);
            assert_close(&survival(&x), &[1.0, 0.807_692, 0.576_923, 0.307_692]);
        }

        #[test]
        fn test_explicit_observed_equal_to_total() {
            let x = uniform();
            assert_eq!(
                kaplan_meier(&x, Some(&x)).unwrap(),
                kaplan_meier(&x, None).unwrap()
            );
        }

        #[test]
        fn test_results_keep_support() {
            let x = Histogram::from_pairs([(1.0, 2.0), (3.0, 1.0), (8.0, 4.0)]).unwrap();
            let pair = SurvivalPair::uncensored(x.clone());
            for derived in [
                pair.at_risk(),
                pair.survival(),
                pair.kaplan_meier(),
                pair.var_kaplan_meier(),
                pair.nelson_aalen(),
                pair.var_nelson_aalen(),
            ] {
                assert_eq!(derived.support(), x.support());
            }
        }
    }

    mod censored {
        use super::*;

        fn pair() -> SurvivalPair {
            SurvivalPair::new(
                Histogram::from_counts([2.0, 2.0, 1.0]),
                Some(Histogram::from_counts([1.0, 1.0, 1.0])),
            )
            .unwrap()
        }

        #[test]
        fn test_at_risk() {
            assert_eq!(pair().at_risk().weights(), &[5.0, 3.0, 1.0]);
        }

        #[test]
        fn test_kaplan_meier() {
            assert_close(&pair().kaplan_meier(), &[0.8, 0.533_333, 0.0]);
        }

        #[test]
        fn test_nelson_aalen() {
            assert_close(&pair().nelson_aalen(), &[1.533_333, 1.333_333, 1.0]);
        }

        #[test]
        fn test_var_kaplan_meier_uses_observed_events() {
            // d / (n * (n - d)) per bin: 1/20, 1/6, then 0 where n == d
            assert_close(
                &pair().var_kaplan_meier(),
                &[0.138_666_7, 0.047_407_4, 0.0],
            );
        }

        #[test]
        fn test_var_nelson_aalen_uses_observed_events() {
            assert_close(
                &pair().var_nelson_aalen(),
                &[0.216_666_7, 0.166_666_7, 0.0],
            );
        }

        #[test]
        fn test_censoring_changes_variances() {
            let uncensored = SurvivalPair::uncensored(Histogram::from_counts([2.0, 2.0, 1.0]));
            let censored = pair();
            assert_ne!(
                uncensored.var_kaplan_meier().weights(),
                censored.var_kaplan_meier().weights()
            );
            assert_ne!(
                uncensored.var_nelson_aalen().weights(),
                censored.var_nelson_aalen().weights()
            );
        }

        #[test]
        fn test_inputs_untouched() {
            let x = Histogram::from_counts([2.0, 2.0, 1.0]);
            let x_obs = Histogram::from_counts([1.0, 1.0, 1.0]);
            let _ = var_nelson_aalen(&x, Some(&x_obs)).unwrap();
            assert_eq!(x.weights(), &[2.0, 2.0, 1.0]);
            assert_eq!(x_obs.weights(), &[1.0, 1.0, 1.0]);
        }

        #[test]
        fn test_mismatched_support_rejected() {
            let x = Histogram::from_counts([2.0, 2.0, 1.0]);
            let shorter = Histogram::from_counts([1.0, 1.0]);
            let shifted = Histogram::from_pairs([(0.0, 1.0), (1.0, 1.0), (3.0, 1.0)]).unwrap();

            let err = kaplan_meier(&x, Some(&shorter)).unwrap_err();
            assert!(err.is_support_mismatch());
            let err = nelson_aalen(&x, Some(&shifted)).unwrap_err();
            assert_eq!(err, ValidationError::SupportMismatch { position: 2 });
        }
    }

    mod exhausted_risk_set {
        use super::*;

        fn trailing_zeros() -> Histogram {
            Histogram::from_counts([1.0, 1.0, 0.0, 0.0])
        }

        #[test]
        fn test_kaplan_meier_stays_flat() {
            assert_close(
                &kaplan_meier(&trailing_zeros(), None).unwrap(),
                &[0.5, 0.0, 0.0, 0.0],
            );
        }

        #[test]
        fn test_var_kaplan_meier_is_finite() {
            assert_close(
                &var_kaplan_meier(&trailing_zeros(), None).unwrap(),
                &[0.125, 0.0, 0.0, 0.0],
            );
        }

        #[test]
        fn test_nelson_aalen_uses_zero_hazard() {
            let na = nelson_aalen(&trailing_zeros(), None).unwrap();
            assert!(na.weights().iter().all(|h| h.is_finite()));
            assert_close(&na, &[1.5, 1.0, 0.0, 0.0]);
        }

        #[test]
        fn test_var_nelson_aalen_fills_zero() {
            assert_close(
                &var_nelson_aalen(&trailing_zeros(), None).unwrap(),
                &[0.5, 0.0, 0.0, 0.0],
            );
        }

        #[test]
        fn test_empty_pair() {
            let pair = SurvivalPair::from_observations([]);
            assert!(pair.kaplan_meier().is_empty());
            assert!(pair.nelson_aalen().is_empty());
            assert_eq!(pair.curve(), SurvivalCurve::default());
        }
    }

    mod curve {
        use super::*;

        #[test]
        fn test_from_observations_with_censoring() {
            let pair = SurvivalPair::from_observations([(10, false), (20, true), (30, false)]);
            let curve = pair.curve();
            assert_eq!(curve.times, vec![10.0, 30.0]);
            assert_eq!(curve.at_risk, vec![3.0, 1.0]);
            assert_eq!(curve.events, vec![1.0, 1.0]);
            assert!((curve.survival_prob[0] - 2.0 / 3.0).abs() < 1e-12);
            assert_eq!(curve.survival_prob[1], 0.0);
        }

        #[test]
        fn test_ties_share_a_bin() {
            let pair =
                SurvivalPair::from_observations([(5, false), (5, false), (5, true), (9, false)]);
            assert_eq!(pair.total().weights(), &[3.0, 1.0]);
            assert_eq!(pair.observed().weights(), &[2.0, 1.0]);
            assert_close(&pair.kaplan_meier(), &[0.5, 0.0]);
        }

        #[test]
        fn test_survival_at_is_step_function() {
            let curve = SurvivalPair::from_observations([(10, false), (20, false)]).curve();
            assert_eq!(curve.survival_at(5.0), 1.0);
            assert_eq!(curve.survival_at(10.0), 0.5);
            assert_eq!(curve.survival_at(15.0), 0.5);
            assert_eq!(curve.survival_at(25.0), 0.0);
            assert_eq!(SurvivalCurve::default().survival_at(3.0), 1.0);
        }

        #[test]
        fn test_median_survival_first_point() {
            let curve =
                SurvivalPair::from_observations([(4, false), (4, false), (8, true)]).curve();
            assert_eq!(curve.median_survival(), Some(4.0));
        }

        #[test]
        fn test_median_survival_never_reached() {
            let curve =
                SurvivalPair::from_observations([(1, false), (2, true), (3, true), (4, true)])
                    .curve();
            assert_eq!(curve.median_survival(), None);
            assert_eq!(SurvivalCurve::default().median_survival(), None);
        }

        #[test]
        fn test_curve_skips_censor_only_bins() {
            let pair = SurvivalPair::new(
                Histogram::from_counts([1.0, 1.0, 1.0]),
                Some(Histogram::from_counts([1.0, 0.0, 1.0])),
            )
            .unwrap();
            let curve = pair.curve();
            assert_eq!(curve.times, vec![0.0, 2.0]);
            assert_eq!(curve.variance.len(), 2);
        }
    }
}
