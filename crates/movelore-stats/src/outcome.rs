use serde::{Deserialize, Serialize};

/// Win/loss/draw counters.
///
/// `total()` is always the sum of the three counters; there is no separate
/// observation count that could drift out of sync with them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeTally {
    pub wins: u64,
    pub losses: u64,
    pub draws: u64,
}

impl OutcomeTally {
    #[must_use]
    pub const fn new(wins: u64, losses: u64, draws: u64) -> Self {
        Self {
            wins,
            losses,
            draws,
        }
    }

    pub fn record_win(&mut self) {
        self.wins += 1;
    }

    pub fn record_loss(&mut self) {
        self.losses += 1;
    }

    pub fn record_draw(&mut self) {
        self.draws += 1;
    }

    #[must_use]
    pub const fn total(&self) -> u64 {
        self.wins + self.losses + self.draws
    }

    /// Points per game with a draw counted as half a win. `0.5` when empty.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn score_rate(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.5;
        }
        (self.wins as f64 + 0.5 * self.draws as f64) / total as f64
    }

    #[must_use]
    pub const fn merged(self, other: OutcomeTally) -> Self {
        Self {
            wins: self.wins + other.wins,
            losses: self.losses + other.losses,
            draws: self.draws + other.draws,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_rate() {
        assert_eq!(OutcomeTally::default().score_rate(), 0.5);
        assert_eq!(OutcomeTally::new(10, 2, 0).score_rate(), 10.0 / 12.0);
        assert_eq!(OutcomeTally::new(1, 1, 2).score_rate(), 0.5);
    }

    #[test]
    fn test_merged() {
        let merged = OutcomeTally::new(1, 2, 3).merged(OutcomeTally::new(4, 5, 6));
        assert_eq!(merged, OutcomeTally::new(5, 7, 9));
        assert_eq!(merged.total(), 21);
    }
}
