//! Autoprotolysis of water: the universal [H+] and [OH-] reference lines of every Sillén diagram.

/// ion product of water at 25 °C
pub const K_W: f64 = 1e-14;
/// -log10(K_W)
pub const PK_W: f64 = 14.0;

/// ([H+], [OH-]) in mol/L at the given pH
#[allow(non_snake_case)]
pub fn free_proton_and_hydroxide(pH: f64) -> (f64, f64) {
    let H = 10f64.powf(-pH);
    let OH = K_W / H;
    (H, OH)
}

/// (log10[H+], log10[OH-]) at the given pH, exact straight lines of slope -1 and +1
#[allow(non_snake_case)]
pub fn log_free_proton_and_hydroxide(pH: f64) -> (f64, f64) {
    (-pH, pH - PK_W)
}
