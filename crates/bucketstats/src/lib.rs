//! Probability and survival statistics over binned histograms.
//!
//! This crate derives distribution statistics directly from aggregated count
//! data (a sorted numeric support with a weight per bin), without access to
//! the raw observations:
//!
//! - **Histograms**: validated support/weight containers, buildable from
//!   vectors, pairs, raw observations or JSON
//! - **Distributions**: pmf, cmf, rcmf, mean, median, modes, variance and
//!   entropy, computed lazily and cached
//! - **Survival analysis**: Kaplan-Meier and Nelson-Aalen estimators with
//!   their variances, for right-censored counts
//!
//! # Modules
//!
//! - [`histogram`]: the [`Histogram`] type and its validator
//! - [`series`]: running sums/products, rank search and safe division over
//!   slices (panics on length mismatch; [`Histogram::safe_divide`] is the
//!   checked variant)
//! - [`distribution`]: [`DiscreteDistribution`], the memoizing statistics engine
//! - [`probability`]: free functions forwarding to the engine
//! - [`survival`]: [`SurvivalPair`] and the survival estimators
//! - [`summary`]: serializable reports
//!
//! # Examples
//!
//! ## Describing a distribution
//!
//! ```
//! use bucketstats::{distribution::DiscreteDistribution, histogram::Histogram};
//!
//! let dist = DiscreteDistribution::new(Histogram::from_counts([1.0, 1.0, 1.0, 1.0, 1.0, 1.0]));
//! assert_eq!(dist.median(), 2.5);
//! assert!((dist.mean() - 2.5).abs() < 1e-12);
//! ```
//!
//! ## Free functions
//!
//! ```
//! use bucketstats::{cmf, histogram::Histogram};
//!
//! let hist = Histogram::from_counts([1.0, 1.0, 1.0, 1.0, 1.0]);
//! let cmf = cmf(&hist);
//! assert!((cmf.weights()[4] - 1.0).abs() < 1e-12);
//! ```
//!
//! ## Survival analysis
//!
//! ```
//! use bucketstats::{histogram::Histogram, nelson_aalen};
//!
//! let deaths = Histogram::from_counts([1.0, 1.0, 1.0, 1.0, 1.0]);
//! let hazard = nelson_aalen(&deaths, None).unwrap();
//! assert!((hazard.weights()[3] - 1.5).abs() < 1e-12);
//! ```

pub mod distribution;
pub mod histogram;
pub mod probability;
pub mod series;
pub mod summary;
pub mod survival;

pub use self::{
    distribution::{AmbiguityError, DiscreteDistribution},
    histogram::{Histogram, ValidationError},
    probability::{
        cmf, cumsum, entropy, mean, median, mode, modes, pmf, rcmf, rcumsum, std_dev, variance,
    },
    series::safe_divide,
    survival::{
        SurvivalCurve, SurvivalPair, kaplan_meier, nelson_aalen, survival, var_kaplan_meier,
        var_nelson_aalen,
    },
};
