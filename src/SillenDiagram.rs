/// pH sweep and log10 c series of acids, water and proton balance
/// # Examples
/// ```
/// use Sillen::AcidBase::acid::Acid;
/// use Sillen::SillenDiagram::diagram::generate_with_proton_balance;
/// use approx::assert_relative_eq;
/// // 0.1 M acetic acid dissolved as HA: the balance curves cross at the solution pH
/// let acetic = Acid::with_name(vec![4.75], 0.1, "Ac", None).unwrap();
/// let dataset = generate_with_proton_balance(&[acetic], &[Some(0)], (0.0, 14.0), 1401).unwrap();
/// assert_eq!(dataset.labels(), vec!["HAc", "Ac-", "H+", "OH-", "PB left", "PB right"]);
/// let pH = dataset.proton_balance_crossing().unwrap();
/// assert_relative_eq!(pH, 2.878, epsilon = 0.01);
/// ```
pub mod diagram;
/// tables, JSON export and matrix views of diagram datasets
pub mod diagram_output;
mod diagram_tests;
