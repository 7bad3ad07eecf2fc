use serde::{Deserialize, Serialize};

/// Summary of a distribution of per-record values (average scores,
/// priorities, value estimates).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DescriptiveStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Upper median for even counts.
    pub median: f64,
    /// Population variance.
    pub variance: f64,
    pub std_dev: f64,
}

impl DescriptiveStats {
    /// Summarises `values`, or returns `None` when there are none.
    ///
    /// Mean and variance are accumulated in one pass (Welford).
    ///
    /// ```
    /// # use movelore_stats::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::new([5.0, 2.0, 4.0, 1.0, 3.0]).unwrap();
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 5.0);
    /// assert!((stats.mean - 3.0).abs() < 1e-12);
    /// assert_eq!(stats.median, 3.0);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        if values.is_empty() {
            return None;
        }

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut mean = 0.0;
        let mut m2 = 0.0;
        let mut n = 0.0;
        for &v in &values {
            n += 1.0;
            min = min.min(v);
            max = max.max(v);
            let delta = v - mean;
            mean += delta / n;
            m2 += delta * (v - mean);
        }
        let variance = m2 / n;

        let mid = values.len() / 2;
        let (_, median, _) = values.select_nth_unstable_by(mid, f64::total_cmp);
        let median = *median;

        Some(Self {
            count: values.len(),
            min,
            max,
            mean,
            median,
            variance,
            std_dev: variance.sqrt(),
        })
    }

    /// Summarises integer values such as move scores.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_scores<I>(scores: I) -> Option<Self>
    where
        I: IntoIterator<Item = i64>,
    {
        Self::new(scores.into_iter().map(|s| s as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_none() {
        assert!(DescriptiveStats::new(std::iter::empty()).is_none());
        assert!(DescriptiveStats::from_scores(Vec::new()).is_none());
    }

    #[test]
    fn test_single_value() {
        let stats = DescriptiveStats::new([42.0]).unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.min, 42.0);
        assert_eq!(stats.median, 42.0);
        assert_eq!(stats.variance, 0.0);
    }

    #[test]
    fn test_variance() {
        let stats = DescriptiveStats::new([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((stats.mean - 5.0).abs() < 1e-12);
        assert!((stats.variance - 4.0).abs() < 1e-12);
        assert!((stats.std_dev - 2.0).abs() < 1e-12);
        assert_eq!(stats.median, 5.0);
    }

    #[test]
    fn test_scores_keep_sign() {
        let stats = DescriptiveStats::from_scores([-1000, 20, 50]).unwrap();
        assert_eq!(stats.min, -1000.0);
        assert_eq!(stats.max, 50.0);
        assert_eq!(stats.median, 20.0);
        assert!((stats.mean - (-310.0)).abs() < 1e-9);
    }
}
