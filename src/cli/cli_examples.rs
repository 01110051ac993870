use super::cli_main::get_user_input;
use crate::Examples::sillen_examples::sillen_examples;
use std::io::{self, Write};

pub fn examples_menu() {
    loop {
        println!("\n=== Examples ===");
        println!("1. Acetic acid");
        println!("2. Phosphoric acid");
        println!("3. Carbonate and ammonium");
        println!("4. Sodium bicarbonate solution pH (proton balance)");
        println!("5. Acid with many protons far from the swept range");
        println!("0. Back to main menu");
        print!("Enter your choice: ");
        let _ = io::stdout().flush();

        let Ok(choice) = get_user_input() else { break };
        match choice.trim() {
            "1" => sillen_examples(0),
            "2" => sillen_examples(1),
            "3" => sillen_examples(2),
            "4" => sillen_examples(3),
            "5" => sillen_examples(4),
            "0" => break,
            _ => println!("Invalid choice. Please try again."),
        }
    }
}
