//! Smoothers for raw sensor data
//!
//! Both smoothers keep their state for the lifetime of the control loop;
//! neither can be reset.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::{Error, Result};

/// Trait for signal smoothers
pub trait Smoother: Send + Sync {
    /// Feed a raw value and return the smoothed output
    fn feed(&mut self, value: f64) -> f64;

    /// Get the current smoothed value without updating
    ///
    /// `None` if the smoother has no value yet.
    fn value(&self) -> Option<f64>;
}

/// Median filter over the last `H` samples
///
/// Rejects isolated spikes better than averaging filters.
///
/// # Example
/// ```
/// use pidctl_core::{MedianSmoother, Smoother};
///
/// let mut median = MedianSmoother::new(5);
/// assert_eq!(median.value(), None);
/// median.feed(1.0);
/// median.feed(100.0);
/// assert_eq!(median.feed(2.0), 2.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedianSmoother {
    /// Window size
    window_size: usize,
    /// Last `window_size` samples, oldest first
    history: VecDeque<f64>,
    /// Median of `history`
    median: Option<f64>,
}

impl MedianSmoother {
    /// Create a new median smoother over `window_size` samples
    ///
    /// A window size of 0 is accepted (with a warning) and makes every
    /// output NaN.
    pub fn new(window_size: usize) -> Self {
        if window_size == 0 {
            tracing::warn!("median smoother created with an empty window");
        }
        Self {
            window_size,
            history: VecDeque::new(),
            median: None,
        }
    }

    /// Create a new median smoother, rejecting an empty window
    pub fn try_new(window_size: usize) -> Result<Self> {
        if window_size == 0 {
            return Err(Error::Config("median window size must be > 0".into()));
        }
        Ok(Self::new(window_size))
    }

    /// Get the window size
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Samples currently in the window, oldest first
    pub fn window(&self) -> &VecDeque<f64> {
        &self.history
    }
}

impl Smoother for MedianSmoother {
    fn feed(&mut self, value: f64) -> f64 {
        self.history.push_back(value);
        while self.history.len() > self.window_size {
            self.history.pop_front();
        }

        let median = super::median(self.history.iter().copied());
        self.median = Some(median);
        median
    }

    fn value(&self) -> Option<f64> {
        self.median
    }
}

impl Default for MedianSmoother {
    fn default() -> Self {
        Self::new(5)
    }
}

/// Exponential mean filter
///
/// `state = alpha * value + (1 - alpha) * state`, starting from 0. Higher
/// `alpha` follows the input more closely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeanSmoother {
    /// Blending coefficient (0-1)
    alpha: f64,
    /// Current smoothed value
    value: f64,
}

impl MeanSmoother {
    /// Create a new mean smoother
    ///
    /// `alpha` outside `[0, 1]` is accepted (with a warning); the output then
    /// overshoots or diverges.
    pub fn new(alpha: f64) -> Self {
        if !(0.0..=1.0).contains(&alpha) {
            tracing::warn!("mean smoother alpha {alpha} is outside [0, 1]");
        }
        Self { alpha, value: 0.0 }
    }

    /// Create a new mean smoother, rejecting `alpha` outside `[0, 1]`
    pub fn try_new(alpha: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&alpha) {
            return Err(Error::Config(format!(
                "alpha must be between 0 and 1, got {alpha}"
            )));
        }
        Ok(Self::new(alpha))
    }

    /// Get the alpha coefficient
    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl Smoother for MeanSmoother {
    #[inline]
    fn feed(&mut self, value: f64) -> f64 {
        self.value = self.alpha * value + (1.0 - self.alpha) * self.value;
        self.value
    }

    #[inline]
    fn value(&self) -> Option<f64> {
        Some(self.value)
    }
}

impl Default for MeanSmoother {
    fn default() -> Self {
        Self::new(0.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_median_before_feed() {
        let median = MedianSmoother::default();
        assert_eq!(median.value(), None);
        assert_eq!(median.window_size(), 5);
    }

    #[test]
    fn test_median_growing_window() {
        let mut median = MedianSmoother::new(5);
        assert_relative_eq!(median.feed(1.0), 1.0);
        assert_relative_eq!(median.feed(3.0), 2.0);
        assert_relative_eq!(median.feed(2.0), 2.0);
        assert_relative_eq!(median.feed(5.0), 2.5);
        assert_eq!(median.value(), Some(2.5));
    }

    #[test]
    fn test_median_window_truncation() {
        let mut median = MedianSmoother::new(3);
        for v in [10.0, 20.0, 30.0, 1.0, 2.0] {
            median.feed(v);
        }
        assert_eq!(median.window().iter().copied().collect::<Vec<_>>(), vec![30.0, 1.0, 2.0]);
        assert_eq!(median.value(), Some(2.0));
    }

    #[test]
    fn test_median_rejects_spike() {
        let mut median = MedianSmoother::new(3);
        median.feed(1.0);
        median.feed(1.0);
        assert_relative_eq!(median.feed(1000.0), 1.0);
    }

    #[test]
    fn test_median_empty_window() {
        let mut median = MedianSmoother::new(0);
        assert!(median.feed(1.0).is_nan());
        assert!(median.window().is_empty());
        assert!(MedianSmoother::try_new(0).is_err());
    }

    #[test]
    fn test_mean_smoothing() {
        let mut mean = MeanSmoother::new(0.5);
        assert_eq!(mean.value(), Some(0.0));
        assert_relative_eq!(mean.feed(10.0), 5.0);
        assert_relative_eq!(mean.feed(0.0), 2.5);
        assert_eq!(mean.value(), Some(2.5));
    }

    #[test]
    fn test_mean_alpha_extremes() {
        let mut passthrough = MeanSmoother::new(1.0);
        assert_relative_eq!(passthrough.feed(7.0), 7.0);

        let mut frozen = MeanSmoother::new(0.0);
        assert_relative_eq!(frozen.feed(7.0), 0.0);
    }

    #[test]
    fn test_mean_alpha_validation() {
        assert!(MeanSmoother::try_new(1.5).is_err());
        assert!(MeanSmoother::try_new(-0.1).is_err());
        assert!(MeanSmoother::try_new(f64::NAN).is_err());
        assert_relative_eq!(MeanSmoother::try_new(0.3).unwrap().alpha(), 0.3);
        assert_relative_eq!(MeanSmoother::default().alpha(), 0.1);
    }
}
