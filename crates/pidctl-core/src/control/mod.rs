//! Feedback controllers
//!
//! Three controllers share one proportional/derivative computation ([`Pd`]).
//! [`Pid`] and [`PidWindowed`] own a `Pd` and add their own integral term on
//! top of it:
//!
//! ```text
//! Pd           P*errP + D*errD
//! Pid          Pd + I*errI   (errI accumulated, saturated to [i_min, i_max])
//! PidWindowed  Pd + I*errI   (errI summed over the last i_len errors)
//! ```

mod any;
mod pd;
mod pid;
mod windowed;

pub use any::{AnyController, ControllerConfig};
pub use pd::{Pd, PdConfig, PdState};
pub use pid::{Pid, PidConfig};
pub use windowed::{PidWindowed, PidWindowedConfig};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Common interface of all controllers
///
/// A control-loop driver calls [`feedback`](Controller::feedback) once per
/// tick with the measured value and applies the returned correction.
pub trait Controller: Send + Sync {
    /// Compute a new correction from a measured value
    fn feedback(&mut self, value: f64) -> f64;

    /// Get the last computed correction without updating
    ///
    /// Returns `0.0` before the first call to [`feedback`](Controller::feedback).
    fn peek_feedback(&self) -> f64;

    /// Sum of the gains used by this controller
    fn weight(&self) -> f64;

    /// Reset the error state
    ///
    /// Reference and gains are kept. The cached feedback value is not cleared.
    fn reset(&mut self);
}

/// Error terms from the last update
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorTerms {
    /// Proportional error (value - reference)
    pub p: f64,
    /// Derivative error
    pub d: f64,
    /// Integral error (always 0 for a PD controller)
    pub i: f64,
}

fn ensure_not_nan(name: &str, value: f64) -> Result<()> {
    if value.is_nan() {
        return Err(Error::Config(format!("{name} must not be NaN")));
    }
    Ok(())
}

/// Serde helper for bounds that may be infinite
///
/// Finite values are written as numbers, infinities as `"inf"` / `"-inf"`
/// (JSON has no representation for them). Both forms are accepted back.
pub(crate) mod limit {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S>(value: &f64, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if value.is_nan() {
            serializer.serialize_str("nan")
        } else if *value == f64::INFINITY {
            serializer.serialize_str("inf")
        } else if *value == f64::NEG_INFINITY {
            serializer.serialize_str("-inf")
        } else {
            serializer.serialize_f64(*value)
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Repr::deserialize(deserializer)? {
            Repr::Number(value) => Ok(value),
            Repr::Text(text) => match text.to_ascii_lowercase().as_str() {
                "inf" | "+inf" | "infinity" => Ok(f64::INFINITY),
                "-inf" | "-infinity" => Ok(f64::NEG_INFINITY),
                "nan" => Ok(f64::NAN),
                other => Err(D::Error::custom(format!(
                    "expected a number, \"inf\" or \"-inf\", got {other:?}"
                ))),
            },
        }
    }
}
