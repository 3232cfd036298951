//! Signal smoothing
//!
//! Smoothers reduce sensor noise before a measurement reaches a controller.

mod filter;

pub use filter::{MeanSmoother, MedianSmoother, Smoother};

/// Median of a set of samples
///
/// Even-length inputs average the two middle elements. Returns NaN for an
/// empty input or if any sample is NaN.
pub fn median<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let mut sorted: Vec<f64> = values.into_iter().collect();
    if sorted.is_empty() || sorted.iter().any(|v| v.is_nan()) {
        return f64::NAN;
    }
    sorted.sort_unstable_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_median_odd() {
        assert_relative_eq!(median([3.0, 1.0, 2.0]), 2.0);
        assert_relative_eq!(median([7.0]), 7.0);
    }

    #[test]
    fn test_median_even() {
        assert_relative_eq!(median([1.0, 3.0, 2.0, 5.0]), 2.5);
        assert_relative_eq!(median([-1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_median_degenerate() {
        assert!(median(std::iter::empty::<f64>()).is_nan());
        assert!(median([1.0, f64::NAN, 2.0]).is_nan());
    }
}
