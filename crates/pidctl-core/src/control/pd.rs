//! PD controller
//!
//! The proportional/derivative computation shared by every controller.

use serde::{Deserialize, Serialize};

use super::{ensure_not_nan, Controller, ErrorTerms};
use crate::Result;

/// PD controller configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdConfig {
    /// Set-point the controller drives the measurement towards
    pub reference: f64,
    /// Proportional gain
    pub p: f64,
    /// Derivative gain
    pub d: f64,
}

impl PdConfig {
    /// Create a new PD config
    pub fn new(reference: f64, p: f64, d: f64) -> Self {
        Self { reference, p, d }
    }

    /// Set the reference
    pub fn with_reference(mut self, reference: f64) -> Self {
        self.reference = reference;
        self
    }

    /// Check that no parameter is NaN
    pub fn validate(&self) -> Result<()> {
        ensure_not_nan("reference", self.reference)?;
        ensure_not_nan("p", self.p)?;
        ensure_not_nan("d", self.d)
    }
}

/// Error state shared by every controller
///
/// Holds the proportional/derivative bookkeeping only; the reference and
/// gains are passed in by the owning controller on every update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PdState {
    /// Last measured value
    pub last_value: f64,
    /// Proportional error
    pub err_p: f64,
    /// Derivative error
    pub err_d: f64,
}

impl PdState {
    /// Fresh state for a controller tracking `reference`
    pub fn new(reference: f64) -> Self {
        Self {
            last_value: reference,
            err_p: 0.0,
            err_d: 0.0,
        }
    }

    /// Compute `P*errP + D*errD` for a new measured value
    ///
    /// `errD = errP - last_value`, where `last_value` is the previous
    /// measurement, not the previous proportional error.
    #[inline]
    pub fn update(&mut self, config: &PdConfig, value: f64) -> f64 {
        self.err_p = value - config.reference;
        self.err_d = self.err_p - self.last_value;

        self.last_value = value;

        config.p * self.err_p + config.d * self.err_d
    }

    /// Return to the state of a fresh controller tracking `reference`
    pub fn reset(&mut self, reference: f64) {
        *self = Self::new(reference);
        tracing::trace!(reference, "controller error state reset");
    }
}

/// PD controller
///
/// Output is `P*errP + D*errD` with `errP = value - reference` and
/// `errD = errP - last_value`, `last_value` being the previous *measured
/// value* (the reference before the first update).
///
/// # Example
/// ```
/// use pidctl_core::{Controller, Pd, PdConfig};
///
/// let mut pd = Pd::new(PdConfig::new(0.0, 1.0, 0.0));
/// assert_eq!(pd.feedback(3.5), 3.5);
/// assert_eq!(pd.peek_feedback(), 3.5);
/// assert_eq!(pd.weight(), 1.0);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pd {
    config: PdConfig,
    state: PdState,
    feedback: f64,
}

impl Pd {
    /// Create a new PD controller
    ///
    /// The configuration is not rejected if invalid; a warning is logged.
    pub fn new(config: PdConfig) -> Self {
        if let Err(e) = config.validate() {
            tracing::warn!("PD controller created with invalid config: {e}");
        }
        Self::from_config(config)
    }

    /// Create a new PD controller, rejecting invalid configurations
    pub fn try_new(config: PdConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    fn from_config(config: PdConfig) -> Self {
        Self {
            state: PdState::new(config.reference),
            feedback: 0.0,
            config,
        }
    }

    /// Update the controller with a new measured value
    #[inline]
    pub fn feedback(&mut self, value: f64) -> f64 {
        self.feedback = self.state.update(&self.config, value);
        self.feedback
    }

    /// Get the last computed output
    #[inline]
    pub fn peek_feedback(&self) -> f64 {
        self.feedback
    }

    /// Sum of the gains (P + D)
    pub fn weight(&self) -> f64 {
        self.config.p + self.config.d
    }

    /// Reset the error state
    pub fn reset(&mut self) {
        self.state.reset(self.config.reference);
    }

    /// Get the configuration
    pub fn config(&self) -> &PdConfig {
        &self.config
    }

    /// Get the current error state
    pub fn state(&self) -> &PdState {
        &self.state
    }

    pub fn reference(&self) -> f64 {
        self.config.reference
    }

    /// Last measured value seen by [`feedback`](Self::feedback)
    pub fn last_value(&self) -> f64 {
        self.state.last_value
    }

    pub fn err_p(&self) -> f64 {
        self.state.err_p
    }

    pub fn err_d(&self) -> f64 {
        self.state.err_d
    }

    /// Get the last error terms
    pub fn terms(&self) -> ErrorTerms {
        ErrorTerms {
            p: self.state.err_p,
            d: self.state.err_d,
            i: 0.0,
        }
    }
}

impl Default for Pd {
    fn default() -> Self {
        Self::from_config(PdConfig::default())
    }
}

impl Controller for Pd {
    fn feedback(&mut self, value: f64) -> f64 {
        Pd::feedback(self, value)
    }

    fn peek_feedback(&self) -> f64 {
        Pd::peek_feedback(self)
    }

    fn weight(&self) -> f64 {
        Pd::weight(self)
    }

    fn reset(&mut self) {
        Pd::reset(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_unit_proportional_passes_value_through() {
        for value in [-1e6, -3.25, -1.0, 0.0, 0.5, 2.0, 42.0, 1e9] {
            let mut pd = Pd::new(PdConfig::new(0.0, 1.0, 0.0));
            assert_eq!(pd.feedback(value), value);
        }
    }

    #[test]
    fn test_derivative_uses_previous_measurement() {
        let mut pd = Pd::new(PdConfig::new(1.0, 0.0, 1.0));

        // errP = 3 - 1 = 2, errD = 2 - last_value(=reference=1) = 1
        assert_relative_eq!(pd.feedback(3.0), 1.0);
        assert_relative_eq!(pd.err_d(), 1.0);

        // errP = 5 - 1 = 4, errD = 4 - 3 = 1
        assert_relative_eq!(pd.feedback(5.0), 1.0);
        assert_relative_eq!(pd.last_value(), 5.0);
    }

    #[test]
    fn test_combined_terms() {
        let mut pd = Pd::new(PdConfig::new(2.0, 0.5, 0.25));
        // errP = 4, errD = 4 - 2 = 2 -> 0.5*4 + 0.25*2
        assert_relative_eq!(pd.feedback(6.0), 2.5);
        assert_eq!(
            pd.terms(),
            ErrorTerms {
                p: 4.0,
                d: 2.0,
                i: 0.0
            }
        );
    }

    #[test]
    fn test_peek_is_idempotent() {
        let mut pd = Pd::new(PdConfig::new(0.0, 2.0, 1.0));
        assert_eq!(pd.peek_feedback(), 0.0);

        let out = pd.feedback(1.5);
        for _ in 0..5 {
            assert_eq!(pd.peek_feedback(), out);
        }
        assert_eq!(pd.last_value(), 1.5);
        assert_eq!(pd.err_p(), 1.5);
    }

    #[test]
    fn test_weight() {
        let pd = Pd::new(PdConfig::new(10.0, 0.7, 0.2));
        assert_relative_eq!(pd.weight(), 0.9);
    }

    #[test]
    fn test_reset_keeps_config_and_feedback() {
        let config = PdConfig::new(3.0, 1.0, 0.5);
        let mut pd = Pd::new(config);
        pd.feedback(7.0);
        let out = pd.feedback(8.0);

        pd.reset();
        assert_eq!(pd.err_p(), 0.0);
        assert_eq!(pd.err_d(), 0.0);
        assert_eq!(pd.last_value(), 3.0);
        assert_eq!(pd.peek_feedback(), out);
        assert_eq!(*pd.config(), config);
    }

    #[test]
    fn test_reset_behaves_like_fresh_instance() {
        let config = PdConfig::new(-1.0, 0.3, 0.9);
        let mut used = Pd::new(config);
        for v in [0.0, 4.0, -2.0] {
            used.feedback(v);
        }
        used.reset();

        let mut fresh = Pd::new(config);
        assert_eq!(used.feedback(2.5), fresh.feedback(2.5));
    }

    #[test]
    fn test_try_new_rejects_nan() {
        assert!(Pd::try_new(PdConfig::new(f64::NAN, 1.0, 0.0)).is_err());
        assert!(Pd::try_new(PdConfig::new(0.0, 1.0, f64::NAN)).is_err());
        assert!(Pd::try_new(PdConfig::new(0.0, 1.0, 0.0)).is_ok());
    }
}
