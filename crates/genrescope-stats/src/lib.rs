//! Statistical primitives for the genrescope project.
//!
//! This crate has no knowledge of tracks or genres. It provides:
//!
//! - **Descriptive statistics**: mean, median, variance, standard deviation
//! - **Correlation**: Pearson coefficient with explicit undefined outcomes
//! - **Interpolation**: gap filling for equally spaced series with missing entries
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`correlation`]: Pearson correlation of paired observations
//! - [`interpolation`]: Filling `None` entries of a series
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use genrescope_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! ```
//!
//! ## Correlating two columns
//!
//! ```
//! use genrescope_stats::correlation::pearson;
//!
//! let pairs = [(0.1, 10.0), (0.5, 40.0), (0.9, 80.0)];
//! let r = pearson(pairs).value().unwrap();
//! assert!(r > 0.99);
//! ```
//!
//! ## Filling a sparse series
//!
//! ```
//! use genrescope_stats::interpolation::{InterpolationPolicy, fill_gaps};
//!
//! let filled = fill_gaps(&[Some(1.0), None, Some(3.0)], InterpolationPolicy::Linear);
//! assert_eq!(filled, vec![1.0, 2.0, 3.0]);
//! ```

pub mod correlation;
pub mod descriptive;
pub mod interpolation;
