//! Statistical helpers for the movelore learning core.
//!
//! This crate collects the small pieces of arithmetic that the statistics store,
//! the lookup and the discovery pipeline share:
//!
//! - **Descriptive statistics**: mean, median, variance, standard deviation
//! - **Outcome tallies**: win/loss/draw counters with derived rates
//! - **Confidence**: saturation of an observation count and confidence-weighted means
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`outcome`]: Win/loss/draw counting
//! - [`confidence`]: Evidence saturation and confidence-weighted averaging
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use movelore_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! ```
//!
//! ## Tallying outcomes
//!
//! ```
//! use movelore_stats::outcome::OutcomeTally;
//!
//! let mut tally = OutcomeTally::default();
//! tally.record_win();
//! tally.record_win();
//! tally.record_loss();
//! assert_eq!(tally.total(), 3);
//! assert!((tally.score_rate() - 2.0 / 3.0).abs() < 1e-12);
//! ```
//!
//! ## Confidence-weighted averaging
//!
//! ```
//! use movelore_stats::confidence::{saturation, weighted_mean};
//!
//! assert_eq!(saturation(25, 50.0), 0.5);
//! let mean = weighted_mean([(10.0, 1.0), (20.0, 0.5)]).unwrap();
//! assert!((mean - 40.0 / 3.0).abs() < 1e-12);
//! ```

pub mod confidence;
pub mod descriptive;
pub mod outcome;
