//! Summary statistics for benchmark results.
//!
//! - [`descriptive`]: count, sum, min, max, mean, median, variance and
//!   standard deviation of a dataset
//!
//! # Examples
//!
//! ```
//! use tetrust_stats::descriptive::DescriptiveStats;
//!
//! let lines_per_episode = [12.0, 30.0, 18.0];
//! let stats = DescriptiveStats::new(lines_per_episode).unwrap();
//! assert_eq!(stats.count, 3);
//! assert_eq!(stats.sum, 60.0);
//! assert_eq!(stats.mean, 20.0);
//! assert_eq!(stats.median, 18.0);
//! ```

pub mod descriptive;
