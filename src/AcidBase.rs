/// polyprotic acid model: alpha fractions, species concentrations, labels and charges
/// # Examples
/// ```
/// use Sillen::AcidBase::acid::Acid;
/// use approx::assert_relative_eq;
/// // phosphoric acid, labels are built from the fully deprotonated form PO4(3-)
/// let phosphate = Acid::with_name(vec![2.15, 7.2, 12.35], 0.1, "PO4", Some(-3)).unwrap();
/// assert_eq!(phosphate.species_labels(), vec!["H3PO4", "H2PO4-", "HPO42-", "PO43-"]);
/// let c = phosphate.species_concentrations(7.2);
/// assert_relative_eq!(c.iter().sum::<f64>(), 0.1, max_relative = 1e-12);
/// assert_relative_eq!(c[1], c[2], max_relative = 1e-6);
/// ```
pub mod acid;
/// ion product of water, free [H+] and [OH-]
pub mod water;
