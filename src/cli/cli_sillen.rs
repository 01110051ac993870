use super::cli_main::prompt;
use crate::AcidBase::acid::Acid;
use crate::SillenDiagram::diagram::DiagramDataset;
use crate::SillenDiagram::diagram_output::pretty_print_acids;
use crate::Utils::load_from_file::{SillenTask, load_task_from_file};
use crate::settings::DiagramSettings;
use log::{error, info};

pub fn diagram_from_file_menu() {
    println!("\n=== Sillén diagram from task file ===");
    if let Err(e) = run_from_file() {
        error!("{}", e);
        println!("Error: {}", e);
    }
}

pub fn manual_diagram_menu() {
    println!("\n=== Sillén diagram: manual input ===");
    if let Err(e) = run_manual() {
        error!("{}", e);
        println!("Error: {}", e);
    }
}

fn run_from_file() -> Result<(), String> {
    let file_name = prompt("Path to task file: ")?;
    let task = load_task_from_file(&file_name)?;
    run_task(&task)
}

#[allow(non_snake_case)]
fn run_manual() -> Result<(), String> {
    let count: usize = prompt("Number of acid systems: ")?
        .parse()
        .map_err(|e| format!("Invalid number: {}", e))?;
    let mut acids = Vec::with_capacity(count);
    let mut reference_levels = Vec::with_capacity(count);
    for k in 0..count {
        println!("--- acid #{} ---", k + 1);
        let name = prompt("Name of the fully deprotonated form [A]: ")?;
        let name = if name.is_empty() { "A".to_string() } else { name };
        let pKa = parse_pKa_list(&prompt("pKa values (space or comma separated): ")?)?;
        let C: f64 = prompt("Total concentration, mol/L: ")?
            .parse()
            .map_err(|e| format!("Invalid concentration: {}", e))?;
        let charge = parse_optional_charge(&prompt(
            "Charge of the fully deprotonated form [-n]: ",
        )?)?;
        let level = parse_reference_level(&prompt(
            "Reference level for the proton balance (empty for none): ",
        )?)?;
        let acid = Acid::with_name(pKa, C, &name, charge).map_err(|e| e.to_string())?;
        acids.push(acid);
        reference_levels.push(level);
    }

    let mut settings = DiagramSettings::new();
    let range = prompt("pH range 'lo hi' [0 14]: ")?;
    if !range.is_empty() {
        let bounds = parse_pKa_list(&range)?;
        if bounds.len() != 2 {
            return Err("pH range needs exactly two numbers".to_string());
        }
        settings.set_pH_range(bounds[0], bounds[1]);
    }
    let samples = prompt("Number of points [100]: ")?;
    if !samples.is_empty() {
        settings.set_sample_count(
            samples
                .parse()
                .map_err(|e| format!("Invalid number of points: {}", e))?,
        );
    }
    let task = SillenTask {
        acids,
        reference_levels,
        settings,
    };
    run_task(&task)
}

fn run_task(task: &SillenTask) -> Result<(), String> {
    pretty_print_acids(&task.acids);
    let dataset = task.run().map_err(|e| e.to_string())?;
    let step = (dataset.len() / 15).max(1);
    dataset.pretty_print(step);
    save_if_requested(&dataset)
}

fn save_if_requested(dataset: &DiagramDataset) -> Result<(), String> {
    let file_name = prompt("Save dataset as JSON (empty to skip): ")?;
    if file_name.is_empty() {
        return Ok(());
    }
    dataset.save_to_file(&file_name)?;
    info!("dataset with {} series written", dataset.series_count());
    Ok(())
}

/// "2.15, 7.2 12.35" -> [2.15, 7.2, 12.35]
#[allow(non_snake_case)]
pub fn parse_pKa_list(input: &str) -> Result<Vec<f64>, String> {
    input
        .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>()
                .map_err(|e| format!("Invalid number '{}': {}", s, e))
        })
        .collect()
}

pub fn parse_optional_charge(input: &str) -> Result<Option<i32>, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    input
        .parse::<i32>()
        .map(Some)
        .map_err(|e| format!("Invalid charge '{}': {}", input, e))
}

pub fn parse_reference_level(input: &str) -> Result<Option<usize>, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    input
        .parse::<usize>()
        .map(Some)
        .map_err(|e| format!("Invalid reference level '{}': {}", input, e))
}
