/////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// TESTS
//////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use crate::AcidBase::acid::Acid;
    use crate::SillenDiagram::diagram::{
        DiagramDataset, DiagramError, LOG_FLOOR, PhSweep, SeriesKind, generate,
        generate_on_sweep, generate_with_proton_balance, log10_or_floor, proton_balance_sums,
    };
    use approx::assert_relative_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn carbonate() -> Acid {
        Acid::with_name(vec![6.35, 10.33], 1e-3, "CO3", Some(-2)).unwrap()
    }

    fn phosphate() -> Acid {
        Acid::with_name(vec![2.15, 7.2, 12.35], 0.1, "PO4", Some(-3)).unwrap()
    }

    // JSON float parsing may differ from the written value in the last bit
    fn assert_datasets_close(a: &DiagramDataset, b: &DiagramDataset) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.pH().iter().zip(b.pH().iter()) {
            assert_relative_eq!(*x, *y, max_relative = 1e-14);
        }
        assert_eq!(a.labels(), b.labels());
        for (sa, sb) in a.series().iter().zip(b.series().iter()) {
            assert_eq!(sa.kind, sb.kind);
            assert_eq!(sa.log_c.len(), sb.log_c.len());
            for (x, y) in sa.log_c.iter().zip(sb.log_c.iter()) {
                if x.is_finite() {
                    assert_relative_eq!(*x, *y, max_relative = 1e-14);
                } else {
                    assert_eq!(*y, LOG_FLOOR);
                }
            }
        }
    }

    #[test]
    fn test_sweep_points() {
        let sweep = PhSweep::new(0.0, 14.0, 15).unwrap();
        assert_eq!(sweep.len(), 15);
        for (i, pH) in sweep.points().iter().enumerate() {
            assert_relative_eq!(*pH, i as f64, epsilon = 1e-12);
        }
        assert_eq!(sweep.lo(), 0.0);
        assert_eq!(sweep.hi(), 14.0);

        let sweep = PhSweep::new(1.3, 9.7, 1000).unwrap();
        assert_eq!(sweep.hi(), 9.7);
        assert!(sweep.points().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_invalid_range() {
        let acid = carbonate();
        for (range, m) in [((7.0, 7.0), 100), ((8.0, 2.0), 100), ((0.0, 14.0), 1), ((0.0, 14.0), 0)] {
            assert!(matches!(
                generate(&[acid.clone()], range, m),
                Err(DiagramError::InvalidRange(_))
            ));
        }
        assert!(matches!(
            generate(&[acid], (f64::NAN, 14.0), 10),
            Err(DiagramError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_sweep_too_narrow_for_sample_count() {
        // the step is far below one ulp of 1.0, the points would repeat
        assert!(matches!(
            PhSweep::new(1.0, 1.0 + 1e-15, 1000),
            Err(DiagramError::InvalidRange(_))
        ));
        // hi - lo overflows
        assert!(matches!(
            PhSweep::new(-1e308, 1e308, 10),
            Err(DiagramError::InvalidRange(_))
        ));
        let sweep = PhSweep::new(1.0, 1.0 + 1e-12, 3).unwrap();
        assert!(sweep.points().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_series_alignment() {
        let acids = vec![carbonate(), phosphate()];
        for m in [2, 3, 57, 500] {
            let dataset = generate(&acids, (0.0, 14.0), m).unwrap();
            assert_eq!(dataset.len(), m);
            assert!(dataset.pH().windows(2).all(|w| w[0] < w[1]));
            // 3 + 4 species plus H+ and OH-
            assert_eq!(dataset.series_count(), 9);
            for s in dataset.series() {
                assert_eq!(s.log_c.len(), m);
            }
        }
    }

    #[test]
    fn test_labels_and_kinds() {
        let dataset = generate(&[carbonate(), phosphate()], (0.0, 14.0), 10).unwrap();
        assert_eq!(
            dataset.labels(),
            vec![
                "H2CO3", "HCO3-", "CO32-", "H3PO4", "H2PO4-", "HPO42-", "PO43-", "H+", "OH-"
            ]
        );
        assert_eq!(dataset.series()[4].kind, SeriesKind::Species { acid: 1, index: 1 });
        assert_eq!(dataset.series()[7].kind, SeriesKind::Proton);
        assert_eq!(dataset.series()[8].kind, SeriesKind::Hydroxide);
        assert_eq!(dataset.species_of_acid(1).len(), 4);
        let map = dataset.to_map();
        assert_eq!(map.len(), 9);
        assert_eq!(map["HCO3-"], dataset.get("HCO3-").unwrap().to_vec());
        assert!(dataset.get("NH4+").is_none());
    }

    #[test]
    fn test_duplicate_labels_are_suffixed() {
        let a = Acid::new(vec![4.75], 0.1).unwrap();
        let b = Acid::new(vec![3.0], 0.01).unwrap();
        let dataset = generate(&[a, b], (0.0, 14.0), 5).unwrap();
        assert_eq!(dataset.labels(), vec!["HA", "A-", "HA#2", "A-#2", "H+", "OH-"]);
        assert_eq!(dataset.to_map().len(), 6);
    }

    #[test]
    fn test_species_labels_never_shadow_water_and_balance_lines() {
        // water written as an acid: its deprotonated form is labelled OH- as well
        let water = Acid::with_name(vec![15.7], 55.5, "OH", Some(-1)).unwrap();
        let dataset = generate(&[water.clone()], (0.0, 14.0), 3).unwrap();
        assert_eq!(dataset.labels(), vec!["HOH", "OH-#1", "H+", "OH-"]);
        assert_eq!(dataset.to_map().len(), dataset.series_count());
        assert_relative_eq!(dataset.get("OH-").unwrap()[0], -14.0, epsilon = 1e-12);
        assert_eq!(dataset.get("OH-#1").unwrap(), dataset.series()[1].log_c.as_slice());

        let dataset = generate_with_proton_balance(&[water], &[Some(0)], (0.0, 14.0), 3).unwrap();
        assert_eq!(dataset.to_map().len(), dataset.series_count());
        assert_eq!(dataset.series_count(), 6);
    }

    #[test]
    fn test_series_values_match_acid_model() {
        let acid = phosphate();
        let dataset = generate(&[acid.clone()], (0.0, 14.0), 29).unwrap();
        for (i, pH) in dataset.pH().iter().enumerate() {
            let logc = acid.log_species_concentrations(*pH);
            for j in 0..4 {
                assert_eq!(dataset.series()[j].log_c[i], logc[j]);
            }
            assert_relative_eq!(dataset.get("H+").unwrap()[i], -pH, epsilon = 1e-12);
            assert_relative_eq!(dataset.get("OH-").unwrap()[i], pH - 14.0, epsilon = 1e-12);
        }
        // H2PO4- and HPO42- meet at pKa2
        let dataset = generate(&[acid], (7.0, 7.4), 3).unwrap();
        let h2po4 = dataset.get("H2PO4-").unwrap()[1];
        let hpo4 = dataset.get("HPO42-").unwrap()[1];
        assert_relative_eq!(h2po4, hpo4, epsilon = 1e-9);
        assert_relative_eq!(h2po4, (0.05f64).log10(), epsilon = 1e-3);
    }

    #[test]
    fn test_water_only_diagram() {
        let dataset = generate(&[], (0.0, 14.0), 8).unwrap();
        assert_eq!(dataset.labels(), vec!["H+", "OH-"]);
        assert!(dataset.proton_balance_crossing().is_none());
    }

    #[test]
    fn test_log_floor() {
        assert_eq!(log10_or_floor(0.0), LOG_FLOOR);
        assert_eq!(log10_or_floor(-1.0), LOG_FLOOR);
        assert_eq!(log10_or_floor(f64::NAN), LOG_FLOOR);
        assert_relative_eq!(log10_or_floor(1e-3), -3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_proton_balance_validation() {
        let acids = vec![carbonate()];
        assert!(matches!(
            generate_with_proton_balance(&acids, &[Some(3)], (0.0, 14.0), 10),
            Err(DiagramError::InvalidRange(_))
        ));
        assert!(matches!(
            generate_with_proton_balance(&acids, &[Some(0), None], (0.0, 14.0), 10),
            Err(DiagramError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_proton_balance_sums_weight_by_protons() {
        let acid = carbonate();
        let pH = 9.0;
        let c = acid.species_concentrations(pH);
        let H = 1e-9;
        let OH = 1e-5;
        // reference H2CO3: HCO3- lost one proton, CO32- lost two
        let (left, right) = proton_balance_sums(&[acid.clone()], &[Some(0)], pH);
        assert_relative_eq!(left, H, max_relative = 1e-9);
        assert_relative_eq!(right, OH + c[1] + 2.0 * c[2], max_relative = 1e-9);
        // reference CO32-: HCO3- gained one proton, H2CO3 gained two
        let (left, right) = proton_balance_sums(&[acid.clone()], &[Some(2)], pH);
        assert_relative_eq!(left, H + 2.0 * c[0] + c[1], max_relative = 1e-9);
        assert_relative_eq!(right, OH, max_relative = 1e-9);
        // acid left out of the balance
        let (left, right) = proton_balance_sums(&[acid], &[None], pH);
        assert_relative_eq!(left, H, max_relative = 1e-9);
        assert_relative_eq!(right, OH, max_relative = 1e-9);
    }

    #[test]
    fn test_pure_water_crossing_is_neutral() {
        let dataset = generate_with_proton_balance(&[], &[], (0.0, 14.0), 141).unwrap();
        let pH = dataset.proton_balance_crossing().unwrap();
        assert_relative_eq!(pH, 7.0, epsilon = 1e-9);
    }

    #[test]
    fn test_sodium_bicarbonate_solution_pH() {
        // amphoteric HCO3-: pH close to (pKa1 + pKa2) / 2
        let acid = Acid::with_name(vec![6.35, 10.33], 0.1, "CO3", Some(-2)).unwrap();
        let dataset = generate_with_proton_balance(&[acid], &[Some(1)], (0.0, 14.0), 1401).unwrap();
        let pH = dataset.proton_balance_crossing().unwrap();
        assert_relative_eq!(pH, 8.34, epsilon = 0.02);
    }

    #[test]
    fn test_dataset_json_round_trip_keeps_floor() {
        let dataset = generate_with_proton_balance(
            &[phosphate()],
            &[Some(0)],
            (0.0, 14.0),
            15,
        )
        .unwrap();
        let json = dataset.to_json().unwrap();
        let back: DiagramDataset = serde_json::from_str(&json).unwrap();
        assert_datasets_close(&back, &dataset);

        // a floor value is written as null and read back as the floor
        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value["series"][0]["log_c"][0] = serde_json::Value::Null;
        let back: DiagramDataset = serde_json::from_value(value).unwrap();
        assert_eq!(back.series()[0].log_c[0], LOG_FLOOR);
        assert_eq!(back.series()[0].log_c.len(), 15);
        assert!(back.to_json().unwrap().contains("null"));
    }

    #[test]
    fn test_misaligned_dataset_is_rejected() {
        let short_series =
            r#"{"pH":[0.0,7.0,14.0],"series":[{"label":"H+","kind":"Proton","log_c":[0.0]}]}"#;
        assert!(serde_json::from_str::<DiagramDataset>(short_series).is_err());
        let repeated_pH = r#"{"pH":[0.0,7.0,7.0],"series":[]}"#;
        assert!(serde_json::from_str::<DiagramDataset>(repeated_pH).is_err());
        let descending_pH =
            r#"{"pH":[14.0,7.0],"series":[{"label":"H+","kind":"Proton","log_c":[-14.0,-7.0]}]}"#;
        assert!(serde_json::from_str::<DiagramDataset>(descending_pH).is_err());
        let aligned =
            r#"{"pH":[7.0,14.0],"series":[{"label":"H+","kind":"Proton","log_c":[-7.0,null]}]}"#;
        let dataset = serde_json::from_str::<DiagramDataset>(aligned).unwrap();
        assert_eq!(dataset.to_matrix().1.ncols(), 1);

        // a file with one value dropped from a series does not load
        let dataset = generate(&[carbonate()], (0.0, 14.0), 8).unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&dataset.to_json().unwrap()).unwrap();
        value["series"][1]["log_c"].as_array_mut().unwrap().pop();
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", value).unwrap();
        let err = DiagramDataset::load_from_file(file.path().to_str().unwrap()).unwrap_err();
        assert!(err.contains("HCO3-"));
    }

    #[test]
    fn test_dataset_file_round_trip() {
        let dataset = generate(&[carbonate()], (2.0, 12.0), 11).unwrap();
        let file = NamedTempFile::new().unwrap();
        let file_name = file.path().to_str().unwrap();
        dataset.save_to_file(file_name).unwrap();
        let loaded = DiagramDataset::load_from_file(file_name).unwrap();
        assert_datasets_close(&loaded, &dataset);

        let mut broken = NamedTempFile::new().unwrap();
        writeln!(broken, "{{ not json").unwrap();
        assert!(DiagramDataset::load_from_file(broken.path().to_str().unwrap()).is_err());
        assert!(DiagramDataset::load_from_file("no_such_dataset.json").is_err());
    }

    #[test]
    fn test_matrix_view_and_table() {
        let dataset = generate(&[carbonate()], (0.0, 14.0), 8).unwrap();
        let (x, y) = dataset.to_matrix();
        assert_eq!(x.len(), 8);
        assert_eq!(y.nrows(), 8);
        assert_eq!(y.ncols(), 5);
        assert_eq!(y[(3, 1)], dataset.series()[1].log_c[3]);
        assert_eq!(x[7], 14.0);

        // header plus every 3rd point plus the last one: 0, 3, 6, 7
        let table = dataset.table(3);
        assert_eq!(table.len(), 5);
        let water = dataset.labels_where(|k| matches!(k, SeriesKind::Proton | SeriesKind::Hydroxide));
        assert_eq!(water, vec!["H+".to_string(), "OH-".to_string()]);
    }

    #[test]
    fn test_generate_on_custom_sweep() {
        let sweep = PhSweep::new(4.0, 10.0, 7).unwrap();
        let dataset = generate_on_sweep(&[carbonate()], &sweep, None).unwrap();
        assert_eq!(dataset.pH(), sweep.points());
        assert!(dataset.get("PB left").is_none());
    }
}
