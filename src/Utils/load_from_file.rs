use crate::AcidBase::acid::{Acid, AcidRecord};
use crate::SillenDiagram::diagram::{
    DiagramDataset, DiagramError, generate_on_sweep,
};
use crate::settings::DiagramSettings;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One acid entry of the ACIDS section: the acid itself and, optionally, the protonation
/// state that was put into solution (reference level of the proton balance)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskAcid {
    #[serde(flatten)]
    pub acid: AcidRecord,
    #[serde(default)]
    pub reference_level: Option<usize>,
}

/// everything needed to draw one Sillén diagram
#[derive(Debug, Clone, PartialEq)]
pub struct SillenTask {
    pub acids: Vec<Acid>,
    pub reference_levels: Vec<Option<usize>>,
    pub settings: DiagramSettings,
}

impl SillenTask {
    pub fn new(acids: Vec<Acid>, settings: DiagramSettings) -> Self {
        let reference_levels = vec![None; acids.len()];
        Self {
            acids,
            reference_levels,
            settings,
        }
    }

    pub fn has_proton_balance(&self) -> bool {
        self.reference_levels.iter().any(|r| r.is_some())
    }

    /// generates the dataset; proton balance curves are added when any reference level is set
    pub fn run(&self) -> Result<DiagramDataset, DiagramError> {
        let sweep = self.settings.sweep()?;
        let levels = if self.has_proton_balance() {
            Some(self.reference_levels.as_slice())
        } else {
            None
        };
        generate_on_sweep(&self.acids, &sweep, levels)
    }
}

pub struct LoadData {
    pub file_name: String,
}

impl LoadData {
    pub fn new(file_name: String) -> Self {
        LoadData { file_name }
    }
    pub fn load_task(&self) -> Result<SillenTask, String> {
        load_task_from_file(&self.file_name)
    }
    pub fn load_acids(&self) -> Result<Vec<TaskAcid>, String> {
        let lines = read_lines(&self.file_name)?;
        parse_acids_section(&lines, &self.file_name)
    }
}

fn read_lines(file_name: &str) -> Result<Vec<String>, String> {
    let path = Path::new(file_name);
    if !path.exists() {
        return Err(format!("File '{}' does not exist", file_name));
    }
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => return Err(format!("Failed to open file '{}': {}", file_name, e)),
    };
    let reader = BufReader::new(file);
    Ok(reader.lines().map_while(Result::ok).collect())
}

/// Text between `header` (a line equal to it, case-insensitive) and the next header line
/// (a non-empty line of capitals and underscores only) or the end of the document.
/// `None` if the header is missing.
fn extract_section(lines: &[String], header: &str) -> Option<String> {
    let mut start_index = None;
    for (i, line) in lines.iter().enumerate() {
        if line.trim().to_uppercase() == header {
            start_index = Some(i + 1);
            break;
        }
    }
    let start_index = start_index?;

    let mut end_index = lines.len();
    for (i, line) in lines.iter().enumerate().skip(start_index) {
        let trimmed = line.trim();
        if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_uppercase() || c == '_') {
            end_index = i;
            break;
        }
    }
    Some(lines[start_index..end_index].join("\n"))
}

fn parse_acids_section(lines: &[String], file_name: &str) -> Result<Vec<TaskAcid>, String> {
    let section = extract_section(lines, "ACIDS")
        .ok_or_else(|| format!("No 'ACIDS' header found in file '{}'", file_name))?;
    let acids: Vec<TaskAcid> = serde_json::from_str(&section).map_err(|e| {
        format!(
            "Error parsing ACIDS section of '{}' at line {}, column {}: {}",
            file_name,
            e.line(),
            e.column(),
            e
        )
    })?;
    if acids.is_empty() {
        warn!("ACIDS section of '{}' is empty", file_name);
    }
    Ok(acids)
}

fn parse_settings_section(lines: &[String], file_name: &str) -> Result<DiagramSettings, String> {
    match extract_section(lines, "SETTINGS") {
        Some(section) if !section.trim().is_empty() => serde_json::from_str(&section)
            .map_err(|e| format!("Error parsing SETTINGS section of '{}': {}", file_name, e)),
        _ => {
            info!("no SETTINGS in '{}', using defaults", file_name);
            Ok(DiagramSettings::default())
        }
    }
}

/// Parses a task document of the form
/// ```text
/// ACIDS
/// [
///   { "name": "PO4", "pKa": [2.15, 7.2, 12.35], "C": 0.1, "charge": -3, "reference_level": 1 }
/// ]
/// SETTINGS
/// { "pH_min": 0.0, "pH_max": 14.0, "sample_count": 200 }
/// ```
/// ACIDS is required, SETTINGS is optional. Every acid is validated on load.
pub fn load_task_from_file(file_name: &str) -> Result<SillenTask, String> {
    let lines = read_lines(file_name)?;
    let task_acids = parse_acids_section(&lines, file_name)?;
    let settings = parse_settings_section(&lines, file_name)?;

    let mut acids = Vec::with_capacity(task_acids.len());
    let mut reference_levels = Vec::with_capacity(task_acids.len());
    for (k, task_acid) in task_acids.into_iter().enumerate() {
        let acid = Acid::try_from(task_acid.acid)
            .map_err(|e| format!("Acid #{} in '{}': {}", k + 1, file_name, e))?;
        if let Some(r) = task_acid.reference_level {
            if r > acid.n() {
                return Err(format!(
                    "Acid #{} in '{}': reference level {} exceeds {} dissociable protons",
                    k + 1,
                    file_name,
                    r,
                    acid.n()
                ));
            }
        }
        acids.push(acid);
        reference_levels.push(task_acid.reference_level);
    }
    // settings are checked here so a bad range is reported together with the file name
    settings
        .sweep()
        .map_err(|e| format!("SETTINGS in '{}': {}", file_name, e))?;
    info!(
        "loaded {} acids from '{}', pH {} .. {} with {} points",
        acids.len(),
        file_name,
        settings.pH_min,
        settings.pH_max,
        settings.sample_count
    );
    Ok(SillenTask {
        acids,
        reference_levels,
        settings,
    })
}
