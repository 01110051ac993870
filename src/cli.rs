pub mod cli_examples;
pub mod cli_main;
pub mod cli_sillen;
