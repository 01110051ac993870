#[allow(non_snake_case)]
pub mod AcidBase;
#[allow(non_snake_case)]
pub mod Examples;
#[allow(non_snake_case)]
pub mod SillenDiagram;
#[allow(non_snake_case)]
pub mod Utils;
pub mod cli;
pub mod settings;
