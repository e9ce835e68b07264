//! Profile shapes: how a value ramps from its start toward its target

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::SIGMOID_COMPLETION;
use crate::error::FlowError;

/// Timing of a ramp in whole periods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ramp {
    /// Periods before any output
    pub delay_periods: u32,
    /// Periods to go from start to (effectively) target
    pub scale_up_periods: u32,
}

impl Ramp {
    pub fn new(delay_periods: u32, scale_up_periods: u32) -> Self {
        Self { delay_periods, scale_up_periods }
    }

    /// Whether `period` falls inside the leading zero window
    pub fn is_delayed(&self, period: usize) -> bool {
        period < self.delay_periods as usize
    }
}

/// Closed set of profile shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileFunction {
    /// Logistic ramp reaching 95% of the delta at the end of the scale-up
    Sigmoid,
    /// Straight-line ramp capped at the target
    Linear,
    /// Full target from the end of the delay onward
    Step,
    /// One-time payment at the end of the delay
    Single,
}

impl ProfileFunction {
    pub const ALL: [ProfileFunction; 4] = [
        ProfileFunction::Sigmoid,
        ProfileFunction::Linear,
        ProfileFunction::Step,
        ProfileFunction::Single,
    ];

    /// Step has no ramp, every other shape needs at least two scale-up periods
    pub fn requires_ramp(self) -> bool {
        !matches!(self, ProfileFunction::Step)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProfileFunction::Sigmoid => "sigmoid",
            ProfileFunction::Linear => "linear",
            ProfileFunction::Step => "step",
            ProfileFunction::Single => "single",
        }
    }

    /// Raw delta over `start` at `period`.
    ///
    /// The caller adds `start` back to obtain the absolute value and is
    /// responsible for zeroing periods inside the delay.
    pub fn delta(self, period: usize, ramp: &Ramp, target: f64, start: f64) -> f64 {
        let span = target - start;
        let x = period as f64;
        let delay = ramp.delay_periods as f64;
        let scale_up = ramp.scale_up_periods as f64;

        match self {
            ProfileFunction::Step => span,
            ProfileFunction::Linear => {
                let m = span / scale_up;
                let b = -m * delay;
                (m * x + b).min(span)
            }
            ProfileFunction::Single => {
                if period == ramp.delay_periods as usize {
                    span
                } else {
                    -start
                }
            }
            ProfileFunction::Sigmoid => {
                // Midpoint sits halfway through the scale-up; k is chosen so the
                // curve hits SIGMOID_COMPLETION of the span at x_end.
                let x_naught = delay + scale_up / 2.0;
                let x_end = delay + scale_up;
                let k = (1.0 / SIGMOID_COMPLETION - 1.0).ln() / (x_naught - x_end);
                (span / (1.0 + (-k * (x - x_naught)).exp())).min(span)
            }
        }
    }
}

impl fmt::Display for ProfileFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileFunction {
    type Err = FlowError;

    /// Accepts canonical ids and the labels used on planning sheets
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sigmoid" | "logistic" => Ok(ProfileFunction::Sigmoid),
            "linear" => Ok(ProfileFunction::Linear),
            "step" | "continuous" => Ok(ProfileFunction::Step),
            "single" | "single pmt." | "single pmt" => Ok(ProfileFunction::Single),
            _ => {
                log::warn!("rejecting unknown profile label {:?}", s);
                Err(FlowError::UnknownProfileFunction { label: s.to_string() })
            }
        }
    }
}
