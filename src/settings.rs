//! # Settings Module
//!
//! ## Purpose
//! Holds the parameters of a Sillén diagram that do not belong to any acid: the swept pH
//! range, the number of sweep points and the axis preset handed to plotting tools.
//!
//! ## Key Features
//! - **Defaults**: pH 0 to 14 with 100 points and the full log c axis (-14 to 0)
//! - **Serde support**: every field is optional in JSON, missing ones take the defaults
//! - **Validation**: `sweep()` turns the settings into a checked `PhSweep`
//!
//! ## Usage Pattern
//! ```rust
//! use Sillen::settings::DiagramSettings;
//!
//! let mut settings = DiagramSettings::new();
//! settings.set_pH_range(2.0, 12.0);
//! settings.set_sample_count(201);
//! let sweep = settings.sweep().unwrap();
//! assert_eq!(sweep.len(), 201);
//! ```
//!
//! ## Axis presets
//! | half_scale | x axis | y axis |
//! |------------|--------|--------|
//! | false | pH_min .. pH_max | -14 .. 0 |
//! | true  | pH_min .. pH_max | -7 .. 0 |

use crate::SillenDiagram::diagram::{DiagramError, PhSweep};
use serde::{Deserialize, Serialize};

#[allow(non_snake_case)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramSettings {
    pub pH_min: f64,
    pub pH_max: f64,
    /// number of sweep points, both ends included
    pub sample_count: usize,
    /// show only the upper half of the log c axis
    pub half_scale: bool,
}

impl Default for DiagramSettings {
    fn default() -> Self {
        Self {
            pH_min: 0.0,
            pH_max: 14.0,
            sample_count: 100,
            half_scale: false,
        }
    }
}

#[allow(non_snake_case)]
impl DiagramSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_pH_range(&mut self, pH_min: f64, pH_max: f64) {
        self.pH_min = pH_min;
        self.pH_max = pH_max;
    }

    pub fn set_sample_count(&mut self, sample_count: usize) {
        self.sample_count = sample_count;
    }

    pub fn pH_range(&self) -> (f64, f64) {
        (self.pH_min, self.pH_max)
    }

    /// checked sweep grid described by these settings
    pub fn sweep(&self) -> Result<PhSweep, DiagramError> {
        PhSweep::new(self.pH_min, self.pH_max, self.sample_count)
    }

    /// ((x_min, x_max), (y_min, y_max)) for a log c vs pH chart
    pub fn axis_limits(&self) -> ((f64, f64), (f64, f64)) {
        let y = if self.half_scale {
            (-7.0, 0.0)
        } else {
            (-14.0, 0.0)
        };
        ((self.pH_min, self.pH_max), y)
    }
}
