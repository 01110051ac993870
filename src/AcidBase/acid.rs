//! # Polyprotic Acid Model
//!
//! ## Aim
//! Equilibrium speciation of one polyprotic acid/conjugate base system. Given the pKa ladder
//! and the total analytical concentration C the module returns, for any pH, the concentration
//! of every protonation state H_nA ... A.
//!
//! ## Main Data Structures and Logic
//! - `Acid`: immutable value object (pKa ladder, C, display name, charge of the fully deprotonated form)
//! - `AcidRecord`: serde shape of an acid as it appears in task files
//! - `AcidError`: construction and indexing errors
//!
//! The fraction of state j (0 = fully protonated) is
//!
//! ```text
//!           Ka_1 * ... * Ka_j * [H+]^(n-j)
//! alpha_j = -------------------------------------------
//!           sum_k ( Ka_1 * ... * Ka_k * [H+]^(n-k) )
//! ```
//!
//! Reference: Gambi, A., Toniolo, R. Acid-base logarithmic diagrams with computer algebra systems.
//! ChemTexts 2, 9 (2016). https://doi.org/10.1007/s40828-016-0029-1
//!
//! ## Interesting Features
//! - weights are built as log10 values and normalised against the largest one, so neither
//!   many dissociable protons nor pH far away from the pKa ladder overflow or underflow
//! - log10 concentrations are computed directly in log space and stay finite where the
//!   linear concentrations already underflow to zero
//!
//! ## Usage
//! ```rust
//! use Sillen::AcidBase::acid::Acid;
//! let acetic = Acid::new(vec![4.5], 0.01).unwrap();
//! let c = acetic.species_concentrations(4.5);
//! assert!((c[0] - 0.005).abs() < 1e-12);
//! assert_eq!(acetic.species_label(1).unwrap(), "A-");
//! ```
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// error types of the acid model
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AcidError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Species index {index} out of range: acid has {n} dissociable protons")]
    SpeciesIndex { index: usize, n: usize },
}

/// Input shape of an acid in task files and JSON
/// ```json
/// { "name": "PO4", "pKa": [2.15, 7.2, 12.35], "C": 0.1, "charge": -3 }
/// ```
#[allow(non_snake_case)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcidRecord {
    #[serde(default)]
    pub name: Option<String>,
    pub pKa: Vec<f64>,
    pub C: f64,
    /// charge of the fully deprotonated form
    #[serde(default)]
    pub charge: Option<i32>,
}

/// One polyprotic acid/base system. Constructed once, immutable thereafter.
#[allow(non_snake_case)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AcidRecord", into = "AcidRecord")]
pub struct Acid {
    pKa: Vec<f64>,
    C: f64,
    name: String,
    /// charge of the fully deprotonated form
    charge: i32,
}

#[allow(non_snake_case)]
impl Acid {
    /// acid named "A" whose fully protonated form is neutral
    pub fn new(pKa: Vec<f64>, C: f64) -> Result<Self, AcidError> {
        Self::with_name(pKa, C, "A", None)
    }

    /// # Arguments
    /// * `pKa` - ladder of pKa values, one per dissociable proton
    /// * `C` - total analytical concentration, mol/L
    /// * `name` - formula of the fully deprotonated form, used in species labels
    /// * `charge` - charge of the fully deprotonated form; `None` means `-n`
    pub fn with_name(
        pKa: Vec<f64>,
        C: f64,
        name: &str,
        charge: Option<i32>,
    ) -> Result<Self, AcidError> {
        if pKa.is_empty() {
            return Err(AcidError::InvalidInput(
                "pKa sequence must contain at least one value".to_string(),
            ));
        }
        if let Some(bad) = pKa.iter().find(|p| !p.is_finite()) {
            return Err(AcidError::InvalidInput(format!(
                "pKa values must be finite, got {}",
                bad
            )));
        }
        if !C.is_finite() || C <= 0.0 {
            return Err(AcidError::InvalidInput(format!(
                "total concentration must be positive, got {}",
                C
            )));
        }
        if name.trim().is_empty() {
            return Err(AcidError::InvalidInput("acid name is empty".to_string()));
        }
        if name.contains('$') {
            return Err(AcidError::InvalidInput(format!(
                "invalid character '$' in acid name '{}'",
                name
            )));
        }
        let n = pKa.len() as i32;
        Ok(Self {
            pKa,
            C,
            name: name.trim().to_string(),
            charge: charge.unwrap_or(-n),
        })
    }

    pub fn pKa(&self) -> &[f64] {
        &self.pKa
    }

    pub fn Ka(&self) -> Vec<f64> {
        self.pKa.iter().map(|p| 10f64.powf(-p)).collect()
    }

    /// total analytical concentration, mol/L
    pub fn C(&self) -> f64 {
        self.C
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// charge of the fully deprotonated form
    pub fn charge(&self) -> i32 {
        self.charge
    }

    /// number of dissociable protons
    pub fn n(&self) -> usize {
        self.pKa.len()
    }

    /// number of protonation states, n + 1
    pub fn species_count(&self) -> usize {
        self.pKa.len() + 1
    }

    fn check_index(&self, j: usize) -> Result<(), AcidError> {
        if j > self.n() {
            return Err(AcidError::SpeciesIndex {
                index: j,
                n: self.n(),
            });
        }
        Ok(())
    }

    /// log10 of the unnormalised weight of every state:
    /// w_j = -(pKa_1 + ... + pKa_j) - (n - j) * pH
    fn log_weights(&self, pH: f64) -> Vec<f64> {
        let n = self.n();
        if pH.is_infinite() {
            // in the limit only one end of the ladder is left
            let dominant = if pH > 0.0 { n } else { 0 };
            return (0..=n)
                .map(|j| if j == dominant { 0.0 } else { f64::NEG_INFINITY })
                .collect();
        }
        let mut weights = Vec::with_capacity(n + 1);
        weights.push(-(n as f64) * pH);
        let mut sum_pKa = 0.0;
        for (i, pKa) in self.pKa.iter().enumerate() {
            sum_pKa += pKa;
            let protons = n - (i + 1);
            weights.push(-sum_pKa - protons as f64 * pH);
        }
        weights
    }

    /// weights shifted so the largest is 10^0, and their sum
    fn scaled_weights(&self, pH: f64) -> (Vec<f64>, f64, f64) {
        let log_w = self.log_weights(pH);
        let max = log_w.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let scaled: Vec<f64> = log_w.iter().map(|w| 10f64.powf(w - max)).collect();
        let sum: f64 = scaled.iter().sum();
        (scaled, max, sum)
    }

    /// fractions of all n + 1 protonation states at the given pH, summing to 1
    pub fn alpha_fractions(&self, pH: f64) -> Vec<f64> {
        let (scaled, _, sum) = self.scaled_weights(pH);
        scaled.into_iter().map(|w| w / sum).collect()
    }

    /// fraction of protonation state `j` (0 = fully protonated, n = fully deprotonated)
    pub fn alpha(&self, j: usize, pH: f64) -> Result<f64, AcidError> {
        self.check_index(j)?;
        Ok(self.alpha_fractions(pH)[j])
    }

    /// log10 of the fractions, evaluated without leaving log space
    pub fn log_alpha_fractions(&self, pH: f64) -> Vec<f64> {
        let log_w = self.log_weights(pH);
        let (_, max, sum) = self.scaled_weights(pH);
        let log_sum = max + sum.log10();
        log_w.into_iter().map(|w| w - log_sum).collect()
    }

    /// equilibrium concentrations of the n + 1 protonation states, mol/L
    pub fn species_concentrations(&self, pH: f64) -> Vec<f64> {
        self.alpha_fractions(pH)
            .into_iter()
            .map(|a| (a * self.C).clamp(0.0, self.C))
            .collect()
    }

    /// concentration of protonation state `j`, mol/L
    pub fn c(&self, j: usize, pH: f64) -> Result<f64, AcidError> {
        self.check_index(j)?;
        Ok(self.species_concentrations(pH)[j])
    }

    /// log10 of every species concentration
    pub fn log_species_concentrations(&self, pH: f64) -> Vec<f64> {
        let log_C = self.C.log10();
        self.log_alpha_fractions(pH)
            .into_iter()
            .map(|la| log_C + la)
            .collect()
    }

    pub fn logc(&self, j: usize, pH: f64) -> Result<f64, AcidError> {
        self.check_index(j)?;
        Ok(self.log_species_concentrations(pH)[j])
    }

    /// charge of protonation state `j`
    pub fn species_charge(&self, j: usize) -> Result<i32, AcidError> {
        self.check_index(j)?;
        Ok(self.charge + (self.n() - j) as i32)
    }

    /// sum of z_j * c_j, mol/L of elementary charge
    pub fn charge_contribution(&self, pH: f64) -> f64 {
        let n = self.n() as i32;
        self.species_concentrations(pH)
            .iter()
            .enumerate()
            .map(|(j, c)| (self.charge + n - j as i32) as f64 * c)
            .sum()
    }

    /// average number of bound protons per acid molecule (Bjerrum formation function)
    pub fn mean_protonation(&self, pH: f64) -> f64 {
        let n = self.n();
        self.alpha_fractions(pH)
            .iter()
            .enumerate()
            .map(|(j, a)| (n - j) as f64 * a)
            .sum()
    }

    /// plain text label of state `j`, e.g. "H2A", "HA-", "A2-"
    pub fn species_label(&self, j: usize) -> Result<String, AcidError> {
        let z = self.species_charge(j)?;
        let protons = self.n() - j;
        let head = match protons {
            0 => String::new(),
            1 => "H".to_string(),
            p => format!("H{}", p),
        };
        Ok(format!("{}{}{}", head, self.name, charge_suffix(z)))
    }

    /// TeX label of state `j`, e.g. "$H_{2}PO_{4}^{-}$"
    pub fn species_label_tex(&self, j: usize) -> Result<String, AcidError> {
        let z = self.species_charge(j)?;
        let protons = self.n() - j;
        let head = match protons {
            0 => String::new(),
            1 => "H".to_string(),
            p => format!("H_{{{}}}", p),
        };
        Ok(format!(
            "${}{}^{{{}}}$",
            head,
            tex_formula(&self.name),
            charge_suffix(z)
        ))
    }

    /// labels of all states from fully protonated to fully deprotonated
    pub fn species_labels(&self) -> Vec<String> {
        (0..=self.n())
            .filter_map(|j| self.species_label(j).ok())
            .collect()
    }
}

fn charge_suffix(z: i32) -> String {
    match z {
        0 => String::new(),
        1 => "+".to_string(),
        -1 => "-".to_string(),
        z if z > 0 => format!("{}+", z),
        z => format!("{}-", -z),
    }
}

// digits of a formula become subscripts: PO4 -> PO_{4}
fn tex_formula(name: &str) -> String {
    let mut out = String::new();
    let mut digits = String::new();
    for ch in name.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }
        if !digits.is_empty() {
            out.push_str(&format!("_{{{}}}", digits));
            digits.clear();
        }
        out.push(ch);
    }
    if !digits.is_empty() {
        out.push_str(&format!("_{{{}}}", digits));
    }
    out
}

impl TryFrom<AcidRecord> for Acid {
    type Error = AcidError;
    fn try_from(record: AcidRecord) -> Result<Self, Self::Error> {
        let name = record.name.unwrap_or_else(|| "A".to_string());
        Acid::with_name(record.pKa, record.C, &name, record.charge)
    }
}

impl From<Acid> for AcidRecord {
    fn from(acid: Acid) -> Self {
        AcidRecord {
            name: Some(acid.name),
            pKa: acid.pKa,
            C: acid.C,
            charge: Some(acid.charge),
        }
    }
}
