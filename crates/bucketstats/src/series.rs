//! Slice primitives shared by the distribution engine and the survival estimators.
//!
//! These play the part of an array/series library: running sums and products
//! in either direction, binary-search rank queries, and zero-safe division.
//! All of them are pure and return freshly allocated vectors aligned with
//! their input.

/// Forward running sum: `out[i] = values[0] + ... + values[i]`.
///
/// # Examples
///
/// ```
/// use bucketstats::series::cumsum;
///
/// assert_eq!(cumsum(&[1.0, 2.0, 3.0]), vec![1.0, 3.0, 6.0]);
/// ```
#[must_use]
pub fn cumsum(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .scan(0.0, |acc, &v| {
            *acc += v;
            Some(*acc)
        })
        .collect()
}

/// Reverse running sum: `out[i] = values[i] + ... + values[n - 1]`.
///
/// Accumulates from the tail, so `out[0]` is the total.
///
/// # Examples
///
/// ```
/// use bucketstats::series::rcumsum;
///
/// assert_eq!(rcumsum(&[0.0, 1.0, 2.0, 3.0, 4.0]), vec![10.0, 10.0, 9.0, 7.0, 4.0]);
/// ```
#[must_use]
pub fn rcumsum(values: &[f64]) -> Vec<f64> {
    let mut out = cumsum(&values.iter().rev().copied().collect::<Vec<_>>());
    out.reverse();
    out
}

/// Forward running product: `out[i] = values[0] * ... * values[i]`.
#[must_use]
pub fn cumprod(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .scan(1.0, |acc, &v| {
            *acc *= v;
            Some(*acc)
        })
        .collect()
}

/// Leftmost insertion point of `target` into non-decreasing `sorted`.
///
/// Returns the first position whose value is `>= target`.
#[must_use]
pub fn search_sorted_left(sorted: &[f64], target: f64) -> usize {
    sorted.partition_point(|&v| v < target)
}

/// Rightmost insertion point of `target` into non-decreasing `sorted`.
///
/// Returns the first position whose value is `> target`.
#[must_use]
pub fn search_sorted_right(sorted: &[f64], target: f64) -> usize {
    sorted.partition_point(|&v| v <= target)
}

/// Elementwise division with a fill value for zero denominators.
///
/// Wherever `denom[i] == 0.0` the result is `fill` instead of an infinity or
/// NaN. Other cells follow ordinary IEEE division.
///
/// # Panics
///
/// Panics if `numer` and `denom` have different lengths. For histograms use
/// [`Histogram::safe_divide`](crate::histogram::Histogram::safe_divide),
/// which reports mismatched supports as an error instead.
///
/// # Examples
///
/// ```
/// use bucketstats::series::safe_divide;
///
/// let result = safe_divide(&[1.0, 1.0, 1.0], &[0.0, 1.0, 2.0], 0.0);
/// assert_eq!(result, vec![0.0, 1.0, 0.5]);
/// ```
#[must_use]
pub fn safe_divide(numer: &[f64], denom: &[f64], fill: f64) -> Vec<f64> {
    assert_eq!(
        numer.len(),
        denom.len(),
        "numerator and denominator must have the same length"
    );
    numer
        .iter()
        .zip(denom)
        .map(|(&n, &d)| if d == 0.0 { fill } else { n / d })
        .collect()
}
