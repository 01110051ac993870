use crate::AcidBase::acid::Acid;
use crate::AcidBase::water::free_proton_and_hydroxide;
use crate::SillenDiagram::diagram::{generate, generate_with_proton_balance};
use crate::SillenDiagram::diagram_output::pretty_print_acids;
use crate::settings::DiagramSettings;
use approx::assert_relative_eq;

#[allow(non_snake_case)]
pub fn sillen_examples(task: usize) {
    //
    match task {
        0 => {
            // acetic acid, the textbook monoprotic case
            let acetic = Acid::with_name(vec![4.75], 0.1, "Ac", None).unwrap();
            pretty_print_acids(&[acetic.clone()]);
            for pH in [2.0, 4.75, 7.0] {
                let c = acetic.species_concentrations(pH);
                println!("pH {}: [HAc] = {:.3e}, [Ac-] = {:.3e}", pH, c[0], c[1]);
            }
            let c = acetic.species_concentrations(4.75);
            assert_relative_eq!(c[0], c[1], epsilon = 1e-15);
            let dataset = generate(&[acetic], (0.0, 14.0), 15).unwrap();
            dataset.pretty_print(1);
        }
        1 => {
            // phosphoric acid, labels built from PO4(3-)
            let phosphate = Acid::with_name(vec![2.15, 7.2, 12.35], 0.1, "PO4", Some(-3)).unwrap();
            pretty_print_acids(&[phosphate.clone()]);
            let settings = DiagramSettings::default();
            let dataset = generate(&[phosphate.clone()], settings.pH_range(), 29).unwrap();
            dataset.pretty_print(2);
            println!(
                "charge carried by phosphate at pH 7.2: {:.4} mol/L",
                phosphate.charge_contribution(7.2)
            );
            println!(
                "mean number of bound protons at pH 7.2: {:.3}",
                phosphate.mean_protonation(7.2)
            );
        }
        2 => {
            // two systems on one diagram: carbonate and ammonium
            let carbonate = Acid::with_name(vec![6.35, 10.33], 1e-3, "CO3", Some(-2)).unwrap();
            let ammonium = Acid::with_name(vec![9.25], 1e-2, "NH3", Some(0)).unwrap();
            let acids = vec![carbonate, ammonium];
            pretty_print_acids(&acids);
            let dataset = generate(&acids, (4.0, 12.0), 17).unwrap();
            dataset.pretty_print(1);
            let (x, y) = dataset.to_matrix();
            println!("matrix view: {} pH values x {} series", x.len(), y.ncols());
        }
        3 => {
            // 0.1 M NaHCO3: HCO3- is the reference level, the balance curves cross at the solution pH
            let carbonate = Acid::with_name(vec![6.35, 10.33], 0.1, "CO3", Some(-2)).unwrap();
            let dataset =
                generate_with_proton_balance(&[carbonate], &[Some(1)], (0.0, 14.0), 1401).unwrap();
            dataset.pretty_print(100);
            let pH = dataset.proton_balance_crossing().unwrap();
            let (H, OH) = free_proton_and_hydroxide(pH);
            println!("pH of 0.1 M NaHCO3: {:.3}, [H+] = {:.3e}, [OH-] = {:.3e}", pH, H, OH);
            assert_relative_eq!(pH, 8.34, epsilon = 0.02);
        }
        4 => {
            // ten protons and pH far outside the pKa ladder: log c stays finite
            let pKa: Vec<f64> = (0..10).map(|i| 1.0 + 1.2 * i as f64).collect();
            let acid = Acid::with_name(pKa, 1e-3, "L", None).unwrap();
            let logc = acid.log_species_concentrations(-50.0);
            println!("log c at pH -50: {:?}", logc);
            let c = acid.species_concentrations(60.0);
            println!("c at pH 60: {:?}", c);
            assert!(logc.iter().all(|l| l.is_finite()));
        }
        _ => {
            println!("no such example");
        }
    }
}
