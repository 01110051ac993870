//! # Sillén Diagram Generator
//!
//! ## Aim
//! Sweeps pH over a range, evaluates every acid and the water lines at each point and assembles
//! log10(concentration) series aligned to the sweep, ready for an external plotting tool.
//!
//! ## Main Data Structures and Logic
//! - `PhSweep`: validated ascending grid of pH points, both ends included
//! - `SpeciesSeries`: label, origin (`SeriesKind`) and log10 c values of one curve
//! - `DiagramDataset`: the sweep plus all series in insertion order:
//!   acid species (acid by acid, fully protonated first), then H+ and OH-, then the
//!   optional proton balance curves
//! - `DiagramError`: malformed range or sample count
//!
//! ## Key Methods
//! - `generate()`: species and water curves
//! - `generate_with_proton_balance()`: additionally the left/right proton balance sums for
//!   chosen reference protonation levels
//! - `DiagramDataset::proton_balance_crossing()`: pH where both balance curves meet, i.e. the pH
//!   of a solution prepared from the reference species
//!
//! Non-positive concentrations (possible only in linear sums) are mapped to `LOG_FLOOR`
//! instead of failing.
use crate::AcidBase::acid::{Acid, AcidError};
use crate::AcidBase::water::{free_proton_and_hydroxide, log_free_proton_and_hydroxide};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// log10 value written for zero or negative concentrations
pub const LOG_FLOOR: f64 = f64::NEG_INFINITY;
pub const PROTON_LABEL: &str = "H+";
pub const HYDROXIDE_LABEL: &str = "OH-";
pub const BALANCE_LEFT_LABEL: &str = "PB left";
pub const BALANCE_RIGHT_LABEL: &str = "PB right";

/// error types of the diagram generator
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DiagramError {
    #[error("Invalid range: {0}")]
    InvalidRange(String),
    #[error("Acid error: {0}")]
    Acid(#[from] AcidError),
}

/// log10 that maps zero, negative and NaN concentrations to `LOG_FLOOR`
pub fn log10_or_floor(c: f64) -> f64 {
    if c > 0.0 { c.log10() } else { LOG_FLOOR }
}

/// ascending grid of pH values, `lo` and `hi` included
#[derive(Debug, Clone, PartialEq)]
pub struct PhSweep {
    points: Vec<f64>,
}

impl PhSweep {
    pub fn new(lo: f64, hi: f64, sample_count: usize) -> Result<Self, DiagramError> {
        if !lo.is_finite() || !hi.is_finite() {
            return Err(DiagramError::InvalidRange(format!(
                "pH bounds must be finite, got [{}, {}]",
                lo, hi
            )));
        }
        if lo >= hi {
            return Err(DiagramError::InvalidRange(format!(
                "lower pH bound {} must be below upper bound {}",
                lo, hi
            )));
        }
        if sample_count < 2 {
            return Err(DiagramError::InvalidRange(format!(
                "at least 2 samples are needed, got {}",
                sample_count
            )));
        }
        let step = (hi - lo) / (sample_count - 1) as f64;
        let mut points: Vec<f64> = (0..sample_count).map(|i| lo + step * i as f64).collect();
        // pin the end exactly
        points[sample_count - 1] = hi;
        if !step.is_finite() || lo + step == lo || points.windows(2).any(|w| w[0] >= w[1]) {
            return Err(DiagramError::InvalidRange(format!(
                "[{}, {}] is too narrow to hold {} distinct points",
                lo, hi, sample_count
            )));
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn lo(&self) -> f64 {
        self.points[0]
    }

    pub fn hi(&self) -> f64 {
        self.points[self.points.len() - 1]
    }
}

/// where a series comes from; renderers style water and balance lines differently
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeriesKind {
    /// protonation state `index` of acid number `acid`
    Species { acid: usize, index: usize },
    Proton,
    Hydroxide,
    ProtonBalanceLeft,
    ProtonBalanceRight,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesSeries {
    pub label: String,
    pub kind: SeriesKind,
    /// log10 concentrations, one per sweep point; `LOG_FLOOR` is stored as null in JSON
    #[serde(with = "floor_as_null")]
    pub log_c: Vec<f64>,
}

impl SpeciesSeries {
    fn new(label: String, kind: SeriesKind, capacity: usize) -> Self {
        Self {
            label,
            kind,
            log_c: Vec::with_capacity(capacity),
        }
    }
}

/// pH sweep and every log10 c series aligned to it
#[allow(non_snake_case)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DiagramDatasetRecord", into = "DiagramDatasetRecord")]
pub struct DiagramDataset {
    pH: Vec<f64>,
    series: Vec<SpeciesSeries>,
}

/// on-disk shape of a dataset, checked before it becomes a `DiagramDataset`
#[allow(non_snake_case)]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagramDatasetRecord {
    pub pH: Vec<f64>,
    pub series: Vec<SpeciesSeries>,
}

impl TryFrom<DiagramDatasetRecord> for DiagramDataset {
    type Error = DiagramError;

    fn try_from(record: DiagramDatasetRecord) -> Result<Self, Self::Error> {
        if record.pH.iter().any(|pH| !pH.is_finite()) {
            return Err(DiagramError::InvalidRange(
                "pH values must be finite".to_string(),
            ));
        }
        if record.pH.windows(2).any(|w| w[0] >= w[1]) {
            return Err(DiagramError::InvalidRange(
                "pH values must be strictly ascending".to_string(),
            ));
        }
        if let Some(s) = record.series.iter().find(|s| s.log_c.len() != record.pH.len()) {
            return Err(DiagramError::InvalidRange(format!(
                "series '{}' has {} values for {} pH points",
                s.label,
                s.log_c.len(),
                record.pH.len()
            )));
        }
        Ok(Self {
            pH: record.pH,
            series: record.series,
        })
    }
}

impl From<DiagramDataset> for DiagramDatasetRecord {
    fn from(dataset: DiagramDataset) -> Self {
        Self {
            pH: dataset.pH,
            series: dataset.series,
        }
    }
}

#[allow(non_snake_case)]
impl DiagramDataset {
    pub fn pH(&self) -> &[f64] {
        &self.pH
    }

    pub fn series(&self) -> &[SpeciesSeries] {
        &self.series
    }

    /// number of sweep points
    pub fn len(&self) -> usize {
        self.pH.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pH.is_empty()
    }

    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.label.as_str()).collect()
    }

    pub fn get(&self, label: &str) -> Option<&[f64]> {
        self.series
            .iter()
            .find(|s| s.label == label)
            .map(|s| s.log_c.as_slice())
    }

    fn get_kind(&self, kind: SeriesKind) -> Option<&[f64]> {
        self.series
            .iter()
            .find(|s| s.kind == kind)
            .map(|s| s.log_c.as_slice())
    }

    /// all series of acid number `acid`, fully protonated first
    pub fn species_of_acid(&self, acid: usize) -> Vec<&SpeciesSeries> {
        self.series
            .iter()
            .filter(|s| matches!(s.kind, SeriesKind::Species { acid: a, .. } if a == acid))
            .collect()
    }

    /// label -> log10 c mapping
    pub fn to_map(&self) -> HashMap<String, Vec<f64>> {
        self.series
            .iter()
            .map(|s| (s.label.clone(), s.log_c.clone()))
            .collect()
    }

    /// pH where the left and right proton balance curves cross, interpolated linearly
    /// between sweep points. `None` without balance curves or without a crossing.
    pub fn proton_balance_crossing(&self) -> Option<f64> {
        let left = self.get_kind(SeriesKind::ProtonBalanceLeft)?;
        let right = self.get_kind(SeriesKind::ProtonBalanceRight)?;
        let diff: Vec<f64> = left.iter().zip(right.iter()).map(|(l, r)| l - r).collect();
        for i in 0..diff.len() {
            let d0 = diff[i];
            if !d0.is_finite() {
                continue;
            }
            if d0 == 0.0 {
                return Some(self.pH[i]);
            }
            if i + 1 == diff.len() {
                break;
            }
            let d1 = diff[i + 1];
            if d1.is_finite() && d0.signum() != d1.signum() {
                let (x0, x1) = (self.pH[i], self.pH[i + 1]);
                return Some(x0 + (x1 - x0) * d0 / (d0 - d1));
            }
        }
        None
    }
}

// label of a new series; repeated labels get the 1-based acid number appended
fn unique_label(label: String, acid: usize, taken: &mut HashSet<String>) -> String {
    let label = if taken.contains(&label) {
        format!("{}#{}", label, acid + 1)
    } else {
        label
    };
    taken.insert(label.clone());
    label
}

/// Sillén diagram data for the given acids.
///
/// # Arguments
/// * `acids` - acid systems to plot, borrowed for the duration of the sweep
/// * `pH_range` - (lo, hi) with lo < hi
/// * `sample_count` - number of sweep points, at least 2
///
/// # Returns
/// species series of every acid, followed by the H+ and OH- lines
#[allow(non_snake_case)]
pub fn generate(
    acids: &[Acid],
    pH_range: (f64, f64),
    sample_count: usize,
) -> Result<DiagramDataset, DiagramError> {
    let sweep = PhSweep::new(pH_range.0, pH_range.1, sample_count)?;
    generate_on_sweep(acids, &sweep, None)
}

/// Like `generate`, plus proton balance curves.
///
/// `reference_levels[k]` is the protonation state of acid `k` that was put into solution
/// (`None` leaves the acid out of the balance). Species more protonated than the reference
/// count on the left side weighted by the protons they gained, less protonated ones count on
/// the right side weighted by the protons they lost. [H+] opens the left sum, [OH-] the right.
#[allow(non_snake_case)]
pub fn generate_with_proton_balance(
    acids: &[Acid],
    reference_levels: &[Option<usize>],
    pH_range: (f64, f64),
    sample_count: usize,
) -> Result<DiagramDataset, DiagramError> {
    let sweep = PhSweep::new(pH_range.0, pH_range.1, sample_count)?;
    generate_on_sweep(acids, &sweep, Some(reference_levels))
}

/// core of the generator, shared by the public entry points
#[allow(non_snake_case)]
pub fn generate_on_sweep(
    acids: &[Acid],
    sweep: &PhSweep,
    reference_levels: Option<&[Option<usize>]>,
) -> Result<DiagramDataset, DiagramError> {
    if let Some(levels) = reference_levels {
        check_reference_levels(acids, levels)?;
    }
    if acids.is_empty() {
        warn!("no acids given, the diagram holds only the H+ and OH- lines");
    }
    let m = sweep.len();
    // water and balance lines keep their plain labels, clashing species get suffixed
    let mut taken: HashSet<String> = [PROTON_LABEL, HYDROXIDE_LABEL]
        .iter()
        .map(|l| l.to_string())
        .collect();
    if reference_levels.is_some() {
        taken.insert(BALANCE_LEFT_LABEL.to_string());
        taken.insert(BALANCE_RIGHT_LABEL.to_string());
    }
    let mut series: Vec<SpeciesSeries> = Vec::new();
    for (k, acid) in acids.iter().enumerate() {
        for j in 0..acid.species_count() {
            let label = unique_label(acid.species_label(j)?, k, &mut taken);
            series.push(SpeciesSeries::new(
                label,
                SeriesKind::Species { acid: k, index: j },
                m,
            ));
        }
    }
    let mut proton = SpeciesSeries::new(PROTON_LABEL.to_string(), SeriesKind::Proton, m);
    let mut hydroxide = SpeciesSeries::new(HYDROXIDE_LABEL.to_string(), SeriesKind::Hydroxide, m);
    let mut balance = reference_levels.map(|_| {
        (
            SpeciesSeries::new(
                BALANCE_LEFT_LABEL.to_string(),
                SeriesKind::ProtonBalanceLeft,
                m,
            ),
            SpeciesSeries::new(
                BALANCE_RIGHT_LABEL.to_string(),
                SeriesKind::ProtonBalanceRight,
                m,
            ),
        )
    });

    for &pH in sweep.points() {
        let mut offset = 0;
        for acid in acids {
            let log_c = acid.log_species_concentrations(pH);
            for (j, l) in log_c.into_iter().enumerate() {
                let value = if l.is_nan() { LOG_FLOOR } else { l };
                series[offset + j].log_c.push(value);
            }
            offset += acid.species_count();
        }
        let (log_H, log_OH) = log_free_proton_and_hydroxide(pH);
        proton.log_c.push(log_H);
        hydroxide.log_c.push(log_OH);

        if let (Some((left, right)), Some(levels)) = (balance.as_mut(), reference_levels) {
            let (sum_left, sum_right) = proton_balance_sums(acids, levels, pH);
            left.log_c.push(log10_or_floor(sum_left));
            right.log_c.push(log10_or_floor(sum_right));
        }
    }

    series.push(proton);
    series.push(hydroxide);
    if let Some((left, right)) = balance {
        series.push(left);
        series.push(right);
    }
    debug!(
        "generated {} series over {} points, pH {} .. {}",
        series.len(),
        m,
        sweep.lo(),
        sweep.hi()
    );
    Ok(DiagramDataset {
        pH: sweep.points().to_vec(),
        series,
    })
}

fn check_reference_levels(acids: &[Acid], levels: &[Option<usize>]) -> Result<(), DiagramError> {
    if levels.len() != acids.len() {
        return Err(DiagramError::InvalidRange(format!(
            "{} reference levels given for {} acids",
            levels.len(),
            acids.len()
        )));
    }
    for (k, (acid, level)) in acids.iter().zip(levels.iter()).enumerate() {
        if let Some(r) = level {
            if *r > acid.n() {
                return Err(DiagramError::InvalidRange(format!(
                    "reference level {} of acid #{} ({}) exceeds its {} dissociable protons",
                    r,
                    k + 1,
                    acid.name(),
                    acid.n()
                )));
            }
        }
    }
    info!("proton balance reference levels: {:?}", levels);
    Ok(())
}

/// (left, right) sides of the proton balance at one pH, mol/L
#[allow(non_snake_case)]
pub fn proton_balance_sums(acids: &[Acid], levels: &[Option<usize>], pH: f64) -> (f64, f64) {
    let (H, OH) = free_proton_and_hydroxide(pH);
    let mut left = H;
    let mut right = OH;
    for (acid, level) in acids.iter().zip(levels.iter()) {
        let Some(r) = level else { continue };
        for (j, c) in acid.species_concentrations(pH).into_iter().enumerate() {
            if j < *r {
                left += (r - j) as f64 * c;
            } else if j > *r {
                right += (j - r) as f64 * c;
            }
        }
    }
    (left, right)
}

/// JSON has no -inf: floor values are written as null and read back as `LOG_FLOOR`
mod floor_as_null {
    use super::LOG_FLOOR;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(values: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
        let values: Vec<Option<f64>> = values
            .iter()
            .map(|v| if v.is_finite() { Some(*v) } else { None })
            .collect();
        values.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
        let values: Vec<Option<f64>> = Vec::deserialize(deserializer)?;
        Ok(values
            .into_iter()
            .map(|v| v.unwrap_or(LOG_FLOOR))
            .collect())
    }
}
