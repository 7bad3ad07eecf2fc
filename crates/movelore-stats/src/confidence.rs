//! Evidence saturation and confidence-weighted averaging.
//!
//! Statistics derived from few observations are noisy. Every consumer in movelore
//! treats evidence the same way: an observation count is mapped to a confidence in
//! `[0.0, 1.0]` that grows linearly until a saturation count and then stays at
//! `1.0`. Aggregates across several estimates are then averaged with those
//! confidences as weights.

/// Linear confidence that saturates at `saturate_at` observations.
///
/// Returns `1.0` for any count when `saturate_at` is not positive.
///
/// # Examples
///
/// ```
/// use movelore_stats::confidence::saturation;
///
/// assert_eq!(saturation(0, 50.0), 0.0);
/// assert_eq!(saturation(10, 50.0), 0.2);
/// assert_eq!(saturation(500, 50.0), 1.0);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn saturation(count: u64, saturate_at: f64) -> f64 {
    if saturate_at <= 0.0 {
        return 1.0;
    }
    (count as f64 / saturate_at).min(1.0)
}

/// Clamps `value` into `[0.0, 1.0]`, mapping NaN to `0.0`.
#[must_use]
pub fn clamp01(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Weighted mean of `(value, weight)` pairs.
///
/// Pairs with a non-positive weight are ignored. Returns `None` when no weight
/// remains.
#[must_use]
pub fn weighted_mean<I>(pairs: I) -> Option<f64>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let (sum, weight) = pairs
        .into_iter()
        .filter(|(_, w)| *w > 0.0)
        .fold((0.0, 0.0), |(sum, weight), (v, w)| (sum + v * w, weight + w));
    (weight > 0.0).then(|| sum / weight)
}
