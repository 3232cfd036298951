//! PID controller with saturated integral
//!
//! The integral error is a running sum of proportional errors, clamped to
//! `[i_min, i_max]` after every update to prevent windup.

use serde::{Deserialize, Serialize};

use super::{ensure_not_nan, Controller, ErrorTerms, PdConfig, PdState};
use crate::{Error, Result};

/// PID controller configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PidConfig {
    /// Set-point the controller drives the measurement towards
    pub reference: f64,
    /// Proportional gain
    pub p: f64,
    /// Derivative gain
    pub d: f64,
    /// Integral gain
    pub i: f64,
    /// Lower saturation bound of the integral error (f64::NEG_INFINITY for no limit)
    #[serde(with = "super::limit")]
    pub i_min: f64,
    /// Upper saturation bound of the integral error (f64::INFINITY for no limit)
    #[serde(with = "super::limit")]
    pub i_max: f64,
}

impl Default for PidConfig {
    fn default() -> Self {
        Self {
            reference: 0.0,
            p: 0.0,
            d: 0.0,
            i: 0.0,
            i_min: f64::NEG_INFINITY,
            i_max: f64::INFINITY,
        }
    }
}

impl PidConfig {
    /// Create a new PID config with an unbounded integral
    pub fn new(reference: f64, p: f64, d: f64, i: f64) -> Self {
        Self {
            reference,
            p,
            d,
            i,
            ..Default::default()
        }
    }

    /// Set the saturation bounds of the integral error
    pub fn with_integral_limits(mut self, i_min: f64, i_max: f64) -> Self {
        self.i_min = i_min;
        self.i_max = i_max;
        self
    }

    /// Set the reference
    pub fn with_reference(mut self, reference: f64) -> Self {
        self.reference = reference;
        self
    }

    /// The proportional/derivative part of this config
    pub fn pd(&self) -> PdConfig {
        PdConfig::new(self.reference, self.p, self.d)
    }

    /// Check for NaN parameters and inverted integral bounds
    pub fn validate(&self) -> Result<()> {
        self.pd().validate()?;
        ensure_not_nan("i", self.i)?;
        ensure_not_nan("i_min", self.i_min)?;
        ensure_not_nan("i_max", self.i_max)?;
        if self.i_min > self.i_max {
            return Err(Error::Config(format!(
                "i_min ({}) is greater than i_max ({})",
                self.i_min, self.i_max
            )));
        }
        Ok(())
    }
}

/// PID controller with saturated integral
///
/// # Example
/// ```
/// use pidctl_core::{Controller, Pid, PidConfig};
///
/// let config = PidConfig::new(0.0, 0.0, 0.0, 1.0).with_integral_limits(-1.0, 1.0);
/// let mut pid = Pid::new(config);
///
/// for _ in 0..10 {
///     pid.feedback(100.0);
/// }
/// assert_eq!(pid.err_i(), 1.0);
/// assert_eq!(pid.peek_feedback(), 1.0);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pid {
    config: PidConfig,
    state: PdState,
    err_i: f64,
    feedback: f64,
}

impl Pid {
    /// Create a new PID controller
    ///
    /// The configuration is not rejected if invalid; a warning is logged.
    /// With `i_min > i_max` the integral error is pinned to `i_min` after
    /// every update.
    pub fn new(config: PidConfig) -> Self {
        if let Err(e) = config.validate() {
            tracing::warn!("PID controller created with invalid config: {e}");
        }
        Self::from_config(config)
    }

    /// Create a new PID controller, rejecting invalid configurations
    pub fn try_new(config: PidConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    fn from_config(config: PidConfig) -> Self {
        Self {
            state: PdState::new(config.reference),
            config,
            err_i: 0.0,
            feedback: 0.0,
        }
    }

    /// Update the controller with a new measured value
    #[inline]
    pub fn feedback(&mut self, value: f64) -> f64 {
        let err_p = value - self.config.reference;
        self.err_i += err_p;

        // Both bounds are always checked; the low bound wins if they cross.
        if self.err_i > self.config.i_max {
            self.err_i = self.config.i_max;
        }
        if self.err_i < self.config.i_min {
            self.err_i = self.config.i_min;
        }

        self.feedback = self.state.update(&self.config.pd(), value) + self.config.i * self.err_i;
        self.feedback
    }

    /// Get the last computed output
    #[inline]
    pub fn peek_feedback(&self) -> f64 {
        self.feedback
    }

    /// Sum of the gains (P + D + I)
    pub fn weight(&self) -> f64 {
        self.config.p + self.config.d + self.config.i
    }

    /// Reset the error state, including the integral
    pub fn reset(&mut self) {
        self.state.reset(self.config.reference);
        self.err_i = 0.0;
    }

    /// Get the configuration
    pub fn config(&self) -> &PidConfig {
        &self.config
    }

    /// Get the proportional/derivative error state
    pub fn state(&self) -> &PdState {
        &self.state
    }

    pub fn reference(&self) -> f64 {
        self.config.reference
    }

    pub fn last_value(&self) -> f64 {
        self.state.last_value
    }

    pub fn err_p(&self) -> f64 {
        self.state.err_p
    }

    pub fn err_d(&self) -> f64 {
        self.state.err_d
    }

    /// Saturated integral error
    pub fn err_i(&self) -> f64 {
        self.err_i
    }

    /// Get the last error terms
    pub fn terms(&self) -> ErrorTerms {
        ErrorTerms {
            p: self.state.err_p,
            d: self.state.err_d,
            i: self.err_i,
        }
    }
}

impl Default for Pid {
    fn default() -> Self {
        Self::from_config(PidConfig::default())
    }
}

impl Controller for Pid {
    fn feedback(&mut self, value: f64) -> f64 {
        Pid::feedback(self, value)
    }

    fn peek_feedback(&self) -> f64 {
        Pid::peek_feedback(self)
    }

    fn weight(&self) -> f64 {
        Pid::weight(self)
    }

    fn reset(&mut self) {
        Pid::reset(self)
    }
}
