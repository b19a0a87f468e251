//! Serializable reports combining several statistics.
//!
//! These bundle the per-distribution and per-bin results that a report or a
//! command line front end usually wants together:
//!
//! - [`DistributionSummary`]: central tendency, dispersion and entropy,
//! - [`MassTable`]: per-bin weight, pmf, cmf and rcmf,
//! - [`SurvivalTable`]: per-bin risk sets and survival estimators.

use serde::Serialize;

use crate::{distribution::DiscreteDistribution, survival::SurvivalPair};

/// Scalar statistics of a discrete distribution.
///
/// # Examples
///
/// ```
/// use bucketstats::{
///     distribution::DiscreteDistribution, histogram::Histogram, summary::DistributionSummary,
/// };
///
/// let dist = DiscreteDistribution::new(Histogram::from_counts([1.0, 1.0, 1.0, 4.0]));
/// let summary = DistributionSummary::new(&dist).unwrap();
/// assert_eq!(summary.total, 7.0);
/// assert_eq!(summary.modes, vec![3.0]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionSummary {
    /// Number of bins, including empty ones.
    pub bins: usize,
    /// Number of bins with positive weight.
    pub support_size: usize,
    pub total: f64,
    pub mean: f64,
    /// Median as a support position.
    pub median: f64,
    /// Median mapped back onto the support keys.
    pub median_key: f64,
    pub modes: Vec<f64>,
    pub variance: f64,
    pub std_dev: f64,
    /// Shannon entropy in bits.
    pub entropy: f64,
}

impl DistributionSummary {
    /// Summarizes `dist`.
    ///
    /// Returns `None` if the histogram has no bins.
    #[must_use]
    pub fn new(dist: &DiscreteDistribution) -> Option<Self> {
        if dist.histogram().is_empty() {
            return None;
        }
        Some(Self {
            bins: dist.histogram().len(),
            support_size: dist.support().len(),
            total: dist.sum(),
            mean: dist.mean(),
            median: dist.median(),
            median_key: dist.median_key(),
            modes: dist.modes().to_vec(),
            variance: dist.variance(),
            std_dev: dist.std_dev(),
            entropy: dist.entropy(),
        })
    }
}

/// One bin of a [`MassTable`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MassRow {
    pub key: f64,
    pub weight: f64,
    pub pmf: f64,
    pub cmf: f64,
    pub rcmf: f64,
}

/// Mass functions of a distribution, bin by bin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MassTable {
    pub rows: Vec<MassRow>,
}

impl MassTable {
    #[must_use]
    pub fn new(dist: &DiscreteDistribution) -> Self {
        let pmf = dist.pmf().weights();
        let cmf = dist.cmf().weights();
        let rcmf = dist.rcmf().weights();
        let rows = dist
            .histogram()
            .iter()
            .enumerate()
            .map(|(i, (key, weight))| MassRow {
                key,
                weight,
                pmf: pmf[i],
                cmf: cmf[i],
                rcmf: rcmf[i],
            })
            .collect();
        Self { rows }
    }
}

/// One bin of a [`SurvivalTable`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurvivalRow {
    pub key: f64,
    pub total: f64,
    pub observed: f64,
    pub at_risk: f64,
    pub survival: f64,
    pub kaplan_meier: f64,
    pub var_kaplan_meier: f64,
    pub nelson_aalen: f64,
    pub var_nelson_aalen: f64,
}

/// Survival estimators of a [`SurvivalPair`], bin by bin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurvivalTable {
    pub rows: Vec<SurvivalRow>,
    /// Interpolated time at which Kaplan-Meier survival reaches 50%.
    pub median_survival: Option<f64>,
}

impl SurvivalTable {
    #[must_use]
    pub fn new(pair: &SurvivalPair) -> Self {
        let at_risk = pair.at_risk();
        let survival = pair.survival();
        let km = pair.kaplan_meier();
        let var_km = pair.var_kaplan_meier();
        let na = pair.nelson_aalen();
        let var_na = pair.var_nelson_aalen();

        let rows = pair
            .total()
            .iter()
            .zip(pair.observed().weights())
            .enumerate()
            .map(|(i, ((key, total), &observed))| SurvivalRow {
                key,
                total,
                observed,
                at_risk: at_risk.weights()[i],
                survival: survival.weights()[i],
                kaplan_meier: km.weights()[i],
                var_kaplan_meier: var_km.weights()[i],
                nelson_aalen: na.weights()[i],
                var_nelson_aalen: var_na.weights()[i],
            })
            .collect();

        Self {
            rows,
            median_survival: pair.curve().median_survival(),
        }
    }
}
