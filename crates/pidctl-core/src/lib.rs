//! pidctl-core: discrete-time feedback controllers and signal smoothers
//!
//! Building blocks for periodic control loops: the caller samples a
//! measurement, optionally smooths it, feeds it to a controller and applies
//! the returned correction. Scheduling the loop and talking to hardware is
//! left to the caller.
//!
//! # Modules
//!
//! - [`control`] - PD, saturated PID and windowed PID controllers
//! - [`math`] - Median and exponential-mean smoothers
//!
//! # Data flow
//!
//! ```text
//!   raw sample        smoothed            correction
//! ─────────────► Smoother ─────────► Controller ─────────►
//! ```
//!
//! # Example
//! ```
//! use pidctl_core::{Controller, MeanSmoother, Pid, PidConfig, Smoother};
//!
//! let mut smoother = MeanSmoother::new(0.5);
//! let mut pid = Pid::new(PidConfig::new(1.0, 2.0, 0.0, 0.1).with_integral_limits(-5.0, 5.0));
//!
//! let measured = smoother.feed(0.8);
//! let correction = pid.feedback(measured);
//! assert_eq!(pid.peek_feedback(), correction);
//! ```

#![warn(unused_must_use)]

pub mod control;
pub mod math;

// Re-exports for convenience
pub use control::{
    AnyController, Controller, ControllerConfig, ErrorTerms, Pd, PdConfig, PdState, Pid, PidConfig,
    PidWindowed, PidWindowedConfig,
};
pub use math::{MeanSmoother, MedianSmoother, Smoother};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Error types for pidctl-core
///
/// Controllers and smoothers never fail while running. Errors only come
/// from the validating constructors (`try_new`, `try_build`).
///
/// # Example
/// ```
/// use pidctl_core::{Error, Pid, PidConfig};
///
/// let config = PidConfig::default().with_integral_limits(1.0, -1.0);
/// match Pid::try_new(config) {
///     Ok(_) => unreachable!(),
///     Err(Error::Config(msg)) => assert!(msg.contains("i_min")),
///     Err(e) => panic!("unexpected error: {e}"),
/// }
/// ```
#[derive(Debug, thiserror::Error)]
#[must_use = "errors must be handled or explicitly ignored with let _ = ..."]
#[non_exhaustive]
pub enum Error {
    /// Invalid configuration parameter.
    /// Handle by: fixing the parameter, or using the non-validating `new`
    /// constructor if degraded behavior is acceptable.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for pidctl-core operations
pub type Result<T> = std::result::Result<T, Error>;
