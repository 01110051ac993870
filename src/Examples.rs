/// worked examples: monoprotic, triprotic, mixed systems, proton balance and extreme pH
pub mod sillen_examples;
