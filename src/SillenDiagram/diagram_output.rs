use super::diagram::{DiagramDataset, SeriesKind};
use crate::AcidBase::acid::Acid;
use log::info;
use nalgebra::{DMatrix, DVector};
use prettytable::{Cell, Row, Table, row};
use std::fs::File;
use std::io::{BufReader, BufWriter};

////////////////////////INPUT/OUTPUT////////////////////////////////////////////////////////

/// Prints a summary of the acids: pKa ladder, total concentration and species labels
#[allow(non_snake_case)]
pub fn pretty_print_acids(acids: &[Acid]) {
    println!("__________acid systems__________");
    let mut table = Table::new();
    table.add_row(row!["#", "name", "pKa", "C, mol/L", "species"]);
    for (k, acid) in acids.iter().enumerate() {
        let pKa: Vec<String> = acid.pKa().iter().map(|p| format!("{}", p)).collect();
        table.add_row(row![
            k + 1,
            acid.name(),
            pKa.join(", "),
            acid.C(),
            acid.species_labels().join(", "),
        ]);
    }
    table.printstd();
    println!("_____________________________________________________________");
}

impl DiagramDataset {
    /// table of the dataset with a row for every `step`-th sweep point (the last point is always shown)
    pub fn table(&self, step: usize) -> Table {
        let step = step.max(1);
        let mut table = Table::new();
        let mut header = vec![Cell::new("pH")];
        header.extend(self.series().iter().map(|s| Cell::new(&s.label)));
        table.add_row(Row::new(header));

        let last = self.len().saturating_sub(1);
        for i in (0..self.len()).filter(|i| i % step == 0 || *i == last) {
            let mut cells = vec![Cell::new(&format!("{:.2}", self.pH()[i]))];
            for s in self.series() {
                let value = s.log_c[i];
                let text = if value.is_finite() {
                    format!("{:.3}", value)
                } else {
                    "-inf".to_string()
                };
                cells.push(Cell::new(&text));
            }
            table.add_row(Row::new(cells));
        }
        table
    }

    /// Prints log10 c of every series at every `step`-th pH
    pub fn pretty_print(&self, step: usize) {
        println!(
            "__________Sillén diagram: {} series over {} pH points__________",
            self.series_count(),
            self.len()
        );
        self.table(step).printstd();
        if let Some(pH) = self.proton_balance_crossing() {
            println!("proton balance curves cross at pH = {:.3}", pH);
        }
        println!("_____________________________________________________________");
    }

    /// pH as a vector and the series as matrix columns (rows follow the sweep),
    /// the layout plot windows take
    pub fn to_matrix(&self) -> (DVector<f64>, DMatrix<f64>) {
        let x = DVector::from_column_slice(self.pH());
        let y = DMatrix::from_fn(self.len(), self.series_count(), |i, j| {
            self.series()[j].log_c[i]
        });
        (x, y)
    }

    /// labels of the series of one kind: acid species, water lines or balance curves
    pub fn labels_where(&self, predicate: impl Fn(&SeriesKind) -> bool) -> Vec<String> {
        self.series()
            .iter()
            .filter(|s| predicate(&s.kind))
            .map(|s| s.label.clone())
            .collect()
    }

    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(self).map_err(|e| format!("Failed to serialize dataset: {}", e))
    }

    /// Saves the dataset as JSON
    pub fn save_to_file(&self, file_name: &str) -> Result<(), String> {
        let file = File::create(file_name)
            .map_err(|e| format!("Failed to create file '{}': {}", file_name, e))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)
            .map_err(|e| format!("Failed to write dataset to '{}': {}", file_name, e))?;
        info!("Sillén dataset saved to {}", file_name);
        Ok(())
    }

    pub fn load_from_file(file_name: &str) -> Result<Self, String> {
        let file = File::open(file_name)
            .map_err(|e| format!("Failed to open file '{}': {}", file_name, e))?;
        let dataset: DiagramDataset = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| format!("Failed to parse dataset in '{}': {}", file_name, e))?;
        Ok(dataset)
    }
}
