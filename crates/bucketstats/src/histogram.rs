//! Validated histograms: a numeric, sorted support paired with bin weights.
//!
//! Every histogram that enters the crate from outside passes through the
//! validator here, whether it is built from vectors, from `(key, weight)`
//! pairs, or deserialized from JSON. Downstream code relies on the invariant
//! that the support is numeric (never NaN) and non-decreasing; ties are
//! allowed.
//!
//! # JSON shapes
//!
//! Deserialization accepts several layouts, all validated the same way:
//!
//! ```
//! use bucketstats::histogram::Histogram;
//!
//! let columns: Histogram =
//!     serde_json::from_str(r#"{"support": [0, 1, 2], "weights": [3, 4, 3]}"#).unwrap();
//! let keyed: Histogram = serde_json::from_str(r#"{"0": 3, "1": 4, "2": 3}"#).unwrap();
//! let pairs: Histogram = serde_json::from_str("[[0, 3], [1, 4], [2, 3]]").unwrap();
//! let counts: Histogram = serde_json::from_str("[3, 4, 3]").unwrap();
//!
//! assert_eq!(columns, keyed);
//! assert_eq!(columns, pairs);
//! assert_eq!(columns, counts);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reasons a histogram (or a pair of histograms) is rejected.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::IsVariant)]
pub enum ValidationError {
    /// The input is not a histogram container at all.
    #[display("expected a histogram (object, array of pairs, or array of weights); got {found}")]
    NotAHistogram { found: String },
    /// A key is NaN or cannot be read as a number.
    #[display("expected numeric key at position {position}; got {key}")]
    NonNumericKey { position: usize, key: String },
    /// A weight cannot be read as a number.
    #[display("expected numeric weight at position {position}; got {value}")]
    NonNumericWeight { position: usize, value: String },
    /// A key is smaller than the key before it.
    #[display(
        "expected monotonic increasing keys; got {key} at position {position} after {previous}"
    )]
    NonMonotonicKey {
        position: usize,
        previous: f64,
        key: f64,
    },
    /// Support and weights have different lengths.
    #[display("support has {support_len} keys but {weights_len} weights were given")]
    LengthMismatch {
        support_len: usize,
        weights_len: usize,
    },
    /// Two histograms that must share a support do not.
    #[display("histogram supports differ at position {position}")]
    SupportMismatch { position: usize },
}

/// A binned histogram: weights over a numeric, non-decreasing support.
///
/// Histograms are immutable. Operations that derive per-bin values (pmf,
/// survival curves, ...) return a new `Histogram` on the same support.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct Histogram {
    support: Vec<f64>,
    weights: Vec<f64>,
}

impl Histogram {
    /// Builds a histogram from its support and weights.
    ///
    /// # Examples
    ///
    /// ```
    /// use bucketstats::histogram::{Histogram, ValidationError};
    ///
    /// let hist = Histogram::new(vec![1.0, 2.0, 2.0, 5.0], vec![1.0, 0.0, 3.0, 1.0]).unwrap();
    /// assert_eq!(hist.len(), 4);
    ///
    /// let err = Histogram::new(vec![2.0, 1.0], vec![1.0, 1.0]).unwrap_err();
    /// assert!(err.is_non_monotonic_key());
    /// ```
    pub fn new(support: Vec<f64>, weights: Vec<f64>) -> Result<Self, ValidationError> {
        validate(&support, weights.len())?;
        Ok(Self { support, weights })
    }

    /// Builds a histogram over the support `0, 1, ..., n - 1`.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_counts<I>(weights: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let weights = weights.into_iter().collect::<Vec<_>>();
        let support = (0..weights.len()).map(|i| i as f64).collect();
        Self { support, weights }
    }

    /// Builds a histogram from `(key, weight)` pairs given in support order.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let (support, weights) = pairs.into_iter().unzip();
        Self::new(support, weights)
    }

    /// Counts raw observations into a histogram over their distinct values.
    ///
    /// # Examples
    ///
    /// ```
    /// use bucketstats::histogram::Histogram;
    ///
    /// let hist = Histogram::from_observations([3_u32, 1, 3, 3, 7]);
    /// assert_eq!(hist.support(), &[1.0, 3.0, 7.0]);
    /// assert_eq!(hist.weights(), &[1.0, 3.0, 1.0]);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_observations<I, K>(observations: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Ord + Into<f64>,
    {
        let mut counts = BTreeMap::<K, usize>::new();
        for value in observations {
            *counts.entry(value).or_default() += 1;
        }
        let (support, weights) = counts
            .into_iter()
            .map(|(key, count)| (key.into(), count as f64))
            .unzip();
        Self { support, weights }
    }

    /// Builds a histogram from a support already known to be valid.
    pub(crate) fn from_sorted_parts(support: Vec<f64>, weights: Vec<f64>) -> Self {
        debug_assert!(validate(&support, weights.len()).is_ok());
        Self { support, weights }
    }

    /// A new histogram on this support with the given weights.
    pub(crate) fn with_weights(&self, weights: Vec<f64>) -> Self {
        debug_assert_eq!(self.support.len(), weights.len());
        Self {
            support: self.support.clone(),
            weights,
        }
    }

    #[must_use]
    pub fn support(&self) -> &[f64] {
        &self.support
    }

    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.support.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.support.is_empty()
    }

    /// Iterates over `(key, weight)` pairs in support order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.support.iter().copied().zip(self.weights.iter().copied())
    }

    /// Sum of all weights.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// Weight of the first bin whose key equals `key`.
    #[must_use]
    pub fn get(&self, key: f64) -> Option<f64> {
        let idx = self.support.partition_point(|&k| k < key);
        (self.support.get(idx) == Some(&key)).then(|| self.weights[idx])
    }

    /// Applies `f` to every weight, keeping the support.
    #[must_use]
    pub fn map<F>(&self, f: F) -> Self
    where
        F: FnMut(f64) -> f64,
    {
        self.with_weights(self.weights.iter().copied().map(f).collect())
    }

    /// Checks that `other` has exactly the same support as `self`.
    pub fn ensure_same_support(&self, other: &Self) -> Result<(), ValidationError> {
        if let Some(position) = self
            .support
            .iter()
            .zip(&other.support)
            .position(|(a, b)| a != b)
        {
            return Err(ValidationError::SupportMismatch { position });
        }
        if self.len() != other.len() {
            return Err(ValidationError::SupportMismatch {
                position: usize::min(self.len(), other.len()),
            });
        }
        Ok(())
    }

    /// Divides bin by bin, using `fill` where `denom` has a zero weight.
    ///
    /// # Examples
    ///
    /// ```
    /// use bucketstats::histogram::Histogram;
    ///
    /// let numer = Histogram::from_counts([1.0, 1.0, 1.0]);
    /// let denom = Histogram::from_counts([0.0, 1.0, 2.0]);
    /// let ratio = numer.safe_divide(&denom, 0.0).unwrap();
    /// assert_eq!(ratio.weights(), &[0.0, 1.0, 0.5]);
    /// ```
    pub fn safe_divide(&self, denom: &Self, fill: f64) -> Result<Self, ValidationError> {
        self.ensure_same_support(denom)?;
        Ok(self.with_weights(crate::series::safe_divide(
            &self.weights,
            &denom.weights,
            fill,
        )))
    }
}

fn validate(support: &[f64], weights_len: usize) -> Result<(), ValidationError> {
    if support.len() != weights_len {
        return Err(ValidationError::LengthMismatch {
            support_len: support.len(),
            weights_len,
        });
    }
    if let Some(position) = support.iter().position(|k| k.is_nan()) {
        return Err(ValidationError::NonNumericKey {
            position,
            key: support[position].to_string(),
        });
    }
    if let Some(i) = support.windows(2).position(|w| w[1] < w[0]) {
        return Err(ValidationError::NonMonotonicKey {
            position: i + 1,
            previous: support[i],
            key: support[i + 1],
        });
    }
    Ok(())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn json_key(position: usize, value: &Value) -> Result<f64, ValidationError> {
    value.as_f64().ok_or_else(|| ValidationError::NonNumericKey {
        position,
        key: value.to_string(),
    })
}

fn json_weight(position: usize, value: &Value) -> Result<f64, ValidationError> {
    value
        .as_f64()
        .ok_or_else(|| ValidationError::NonNumericWeight {
            position,
            value: value.to_string(),
        })
}

fn json_column<F>(
    value: Option<&Value>,
    name: &str,
    mut item: F,
) -> Result<Vec<f64>, ValidationError>
where
    F: FnMut(usize, &Value) -> Result<f64, ValidationError>,
{
    let Some(Value::Array(items)) = value else {
        return Err(ValidationError::NotAHistogram {
            found: format!("object without a `{name}` array"),
        });
    };
    items.iter().enumerate().map(|(i, v)| item(i, v)).collect()
}

impl TryFrom<Value> for Histogram {
    type Error = ValidationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) if map.contains_key("support") || map.contains_key("weights") => {
                let support = json_column(map.get("support"), "support", json_key)?;
                let weights = json_column(map.get("weights"), "weights", json_weight)?;
                Self::new(support, weights)
            }
            Value::Object(map) => {
                let mut support = Vec::with_capacity(map.len());
                let mut weights = Vec::with_capacity(map.len());
                for (position, (key, weight)) in map.iter().enumerate() {
                    let key = key
                        .trim()
                        .parse::<f64>()
                        .map_err(|_| ValidationError::NonNumericKey {
                            position,
                            key: key.clone(),
                        })?;
                    support.push(key);
                    weights.push(json_weight(position, weight)?);
                }
                Self::new(support, weights)
            }
            Value::Array(items) if items.iter().all(Value::is_number) => {
                let weights = items
                    .iter()
                    .enumerate()
                    .map(|(i, v)| json_weight(i, v))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self::from_counts(weights))
            }
            Value::Array(items) => {
                let mut support = Vec::with_capacity(items.len());
                let mut weights = Vec::with_capacity(items.len());
                for (position, item) in items.iter().enumerate() {
                    let Some([key, weight]) = item.as_array().map(Vec::as_slice) else {
                        return Err(ValidationError::NotAHistogram {
                            found: format!("array item {item} at position {position}"),
                        });
                    };
                    support.push(json_key(position, key)?);
                    weights.push(json_weight(position, weight)?);
                }
                Self::new(support, weights)
            }
            other => Err(ValidationError::NotAHistogram {
                found: json_kind(&other).to_owned(),
            }),
        }
    }
}
