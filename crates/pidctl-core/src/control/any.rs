//! Controller selected at runtime
//!
//! [`ControllerConfig`] is a tagged description of any controller variant,
//! and [`AnyController`] holds whichever variant it built.

use serde::{Deserialize, Serialize};

use super::{Controller, ErrorTerms, Pd, PdConfig, Pid, PidConfig, PidWindowed, PidWindowedConfig};
use crate::Result;

/// Configuration of any controller variant
///
/// Serialized with a `kind` tag:
///
/// ```
/// use pidctl_core::{Controller, ControllerConfig};
///
/// let config: ControllerConfig =
///     serde_json::from_str(r#"{ "kind": "pid_windowed", "p": 1.0, "i": 0.5, "i_len": 4 }"#)
///         .unwrap();
/// let mut controller = config.build();
/// assert_eq!(controller.weight(), 1.5);
/// assert_eq!(controller.feedback(2.0), 3.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ControllerConfig {
    Pd(PdConfig),
    Pid(PidConfig),
    PidWindowed(PidWindowedConfig),
}

impl ControllerConfig {
    /// Check the wrapped configuration
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Pd(c) => c.validate(),
            Self::Pid(c) => c.validate(),
            Self::PidWindowed(c) => c.validate(),
        }
    }

    /// Build the controller, accepting invalid configurations
    pub fn build(self) -> AnyController {
        match self {
            Self::Pd(c) => AnyController::Pd(Pd::new(c)),
            Self::Pid(c) => AnyController::Pid(Pid::new(c)),
            Self::PidWindowed(c) => AnyController::PidWindowed(PidWindowed::new(c)),
        }
    }

    /// Build the controller, rejecting invalid configurations
    pub fn try_build(self) -> Result<AnyController> {
        Ok(match self {
            Self::Pd(c) => AnyController::Pd(Pd::try_new(c)?),
            Self::Pid(c) => AnyController::Pid(Pid::try_new(c)?),
            Self::PidWindowed(c) => AnyController::PidWindowed(PidWindowed::try_new(c)?),
        })
    }

    /// Set-point of the wrapped configuration
    pub fn reference(&self) -> f64 {
        match self {
            Self::Pd(c) => c.reference,
            Self::Pid(c) => c.reference,
            Self::PidWindowed(c) => c.reference,
        }
    }
}

impl From<PdConfig> for ControllerConfig {
    fn from(config: PdConfig) -> Self {
        Self::Pd(config)
    }
}

impl From<PidConfig> for ControllerConfig {
    fn from(config: PidConfig) -> Self {
        Self::Pid(config)
    }
}

impl From<PidWindowedConfig> for ControllerConfig {
    fn from(config: PidWindowedConfig) -> Self {
        Self::PidWindowed(config)
    }
}

/// Any controller variant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AnyController {
    Pd(Pd),
    Pid(Pid),
    PidWindowed(PidWindowed),
}

impl AnyController {
    /// Get the last error terms
    pub fn terms(&self) -> ErrorTerms {
        match self {
            Self::Pd(c) => c.terms(),
            Self::Pid(c) => c.terms(),
            Self::PidWindowed(c) => c.terms(),
        }
    }

    pub fn reference(&self) -> f64 {
        match self {
            Self::Pd(c) => c.reference(),
            Self::Pid(c) => c.reference(),
            Self::PidWindowed(c) => c.reference(),
        }
    }
}

impl Controller for AnyController {
    fn feedback(&mut self, value: f64) -> f64 {
        match self {
            Self::Pd(c) => c.feedback(value),
            Self::Pid(c) => c.feedback(value),
            Self::PidWindowed(c) => c.feedback(value),
        }
    }

    fn peek_feedback(&self) -> f64 {
        match self {
            Self::Pd(c) => c.peek_feedback(),
            Self::Pid(c) => c.peek_feedback(),
            Self::PidWindowed(c) => c.peek_feedback(),
        }
    }

    fn weight(&self) -> f64 {
        match self {
            Self::Pd(c) => c.weight(),
            Self::Pid(c) => c.weight(),
            Self::PidWindowed(c) => c.weight(),
        }
    }

    fn reset(&mut self) {
        match self {
            Self::Pd(c) => c.reset(),
            Self::Pid(c) => c.reset(),
            Self::PidWindowed(c) => c.reset(),
        }
    }
}

impl From<Pd> for AnyController {
    fn from(controller: Pd) -> Self {
        Self::Pd(controller)
    }
}

impl From<Pid> for AnyController {
    fn from(controller: Pid) -> Self {
        Self::Pid(controller)
    }
}

impl From<PidWindowed> for AnyController {
    fn from(controller: PidWindowed) -> Self {
        Self::PidWindowed(controller)
    }
}
