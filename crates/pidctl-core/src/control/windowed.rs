//! PID controller with a moving-window integral
//!
//! Instead of accumulating every error since the last reset, the integral
//! error is the sum of the last `i_len` proportional errors.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::{ensure_not_nan, Controller, ErrorTerms, PdConfig, PdState};
use crate::{Error, Result};

/// Windowed PID controller configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PidWindowedConfig {
    /// Set-point the controller drives the measurement towards
    pub reference: f64,
    /// Proportional gain
    pub p: f64,
    /// Derivative gain
    pub d: f64,
    /// Integral gain
    pub i: f64,
    /// Number of past errors summed into the integral
    pub i_len: usize,
}

impl Default for PidWindowedConfig {
    fn default() -> Self {
        Self {
            reference: 0.0,
            p: 0.0,
            d: 0.0,
            i: 0.0,
            i_len: 10,
        }
    }
}

impl PidWindowedConfig {
    /// Create a new config with the default window of 10 errors
    pub fn new(reference: f64, p: f64, d: f64, i: f64) -> Self {
        Self {
            reference,
            p,
            d,
            i,
            ..Default::default()
        }
    }

    /// Set the integral window length
    pub fn with_window(mut self, i_len: usize) -> Self {
        self.i_len = i_len;
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

    /// Check for NaN parameters and an empty window
    pub fn validate(&self) -> Result<()> {
        self.pd().validate()?;
        ensure_not_nan("i", self.i)?;
        if self.i_len == 0 {
            return Err(Error::Config("i_len must be > 0".into()));
        }
        Ok(())
    }
}

/// PID controller with a moving-window integral
///
/// # Example
/// ```
/// use pidctl_core::{Controller, PidWindowed, PidWindowedConfig};
///
/// let mut pid = PidWindowed::new(PidWindowedConfig::new(0.0, 0.0, 0.0, 1.0).with_window(3));
/// for value in [1.0, 2.0, 3.0, 4.0] {
///     pid.feedback(value);
/// }
/// assert_eq!(pid.history().iter().copied().collect::<Vec<_>>(), vec![2.0, 3.0, 4.0]);
/// assert_eq!(pid.err_i(), 9.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PidWindowed {
    config: PidWindowedConfig,
    state: PdState,
    /// Proportional errors, oldest first
    history: VecDeque<f64>,
    err_i: f64,
    feedback: f64,
}

impl PidWindowed {
    /// Create a new windowed PID controller
    ///
    /// The configuration is not rejected if invalid; a warning is logged.
    /// With `i_len == 0` the window stays empty and the integral is always 0.
    /// Slice-based implementations that keep `history[-i_len:]` would keep
    /// the whole history in that case instead; this one never holds more
    /// than `i_len` errors.
    pub fn new(config: PidWindowedConfig) -> Self {
        if let Err(e) = config.validate() {
            tracing::warn!("windowed PID controller created with invalid config: {e}");
        }
        Self::from_config(config)
    }

    /// Create a new windowed PID controller, rejecting invalid configurations
    pub fn try_new(config: PidWindowedConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    fn from_config(config: PidWindowedConfig) -> Self {
        Self {
            state: PdState::new(config.reference),
            history: VecDeque::new(),
            config,
            err_i: 0.0,
            feedback: 0.0,
        }
    }

    /// Update the controller with a new measured value
    pub fn feedback(&mut self, value: f64) -> f64 {
        let err_p = value - self.config.reference;

        self.history.push_back(err_p);
        while self.history.len() > self.config.i_len {
            self.history.pop_front();
        }
        self.err_i = self.history.iter().sum();

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

    /// Reset the error state and clear the error window
    pub fn reset(&mut self) {
        self.state.reset(self.config.reference);
        self.err_i = 0.0;
        self.history.clear();
    }

    /// Get the configuration
    pub fn config(&self) -> &PidWindowedConfig {
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

    /// Sum of the errors in the window
    pub fn err_i(&self) -> f64 {
        self.err_i
    }

    /// Errors currently in the window, oldest first
    pub fn history(&self) -> &VecDeque<f64> {
        &self.history
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

impl Default for PidWindowed {
    fn default() -> Self {
        Self::from_config(PidWindowedConfig::default())
    }
}

impl Controller for PidWindowed {
    fn feedback(&mut self, value: f64) -> f64 {
        PidWindowed::feedback(self, value)
    }

    fn peek_feedback(&self) -> f64 {
        PidWindowed::peek_feedback(self)
    }

    fn weight(&self) -> f64 {
        PidWindowed::weight(self)
    }

    fn reset(&mut self) {
        PidWindowed::reset(self)
    }
}
