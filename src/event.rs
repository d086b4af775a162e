//! Labeled intervals and the time units they are stored in.

use serde::{Deserialize, Serialize};

use crate::error::LabelPlotError;
use crate::store::DatasetAttrs;

/// A named time span stored as one record.
///
/// `start` and `stop` are in the dataset's raw units. A record may briefly
/// hold `start > stop` while a label is being resized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexEvent {
    /// Label name, usually a single lowercase letter.
    pub name: String,
    /// Raw start time.
    pub start: f64,
    /// Raw stop time.
    pub stop: f64,
}

impl ComplexEvent {
    /// Create a new record.
    pub fn new(name: impl Into<String>, start: f64, stop: f64) -> Self {
        Self {
            name: name.into(),
            start,
            stop,
        }
    }

    /// Create a zero-width record at `t`.
    pub fn instant(name: impl Into<String>, t: f64) -> Self {
        Self::new(name, t, t)
    }
}

/// Units of the raw times in a dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeUnits {
    /// Milliseconds; displayed as seconds.
    Milliseconds,
    /// Sample indices at the given rate; displayed as seconds.
    Samples { sampling_rate: f64 },
    /// Anything else; displayed unscaled.
    Other,
}

impl TimeUnits {
    /// Resolve units from dataset attributes.
    pub fn from_attrs(attrs: &DatasetAttrs) -> Result<Self, LabelPlotError> {
        match attrs.units.as_deref() {
            Some("ms") => Ok(Self::Milliseconds),
            Some("samples") => {
                let rate = attrs
                    .sampling_rate
                    .ok_or(LabelPlotError::MissingSamplingRate)?;
                if !rate.is_finite() || rate <= 0.0 {
                    return Err(LabelPlotError::InvalidSamplingRate { rate });
                }
                Ok(Self::Samples {
                    sampling_rate: rate,
                })
            }
            _ => Ok(Self::Other),
        }
    }

    /// Divisor mapping raw times to display times.
    pub fn scaling_factor(self) -> f64 {
        match self {
            Self::Milliseconds => 1000.0,
            Self::Samples { sampling_rate } => sampling_rate,
            Self::Other => 1.0,
        }
    }
}
