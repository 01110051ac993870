use super::cli_examples::examples_menu;
use super::cli_sillen::{diagram_from_file_menu, manual_diagram_menu};
use std::io::{self, Write};

pub fn run_interactive_menu() {
    loop {
        show_main_menu();
        let choice = match get_user_input() {
            Ok(choice) => choice,
            Err(e) => {
                println!("{}", e);
                break;
            }
        };

        match choice.trim() {
            "1" => diagram_from_file_menu(),
            "2" => manual_diagram_menu(),
            "3" => examples_menu(),
            "0" => {
                println!("Goodbye!");
                break;
            }
            _ => println!("Invalid choice. Please try again."),
        }
    }
}
/* colors
Blue (\x1b[34m) - Welcome header text

Yellow (\x1b[33m) - Menu options (1, 2, 3, 0)

Cyan (\x1b[36m) - "Enter your choice:" prompt

Reset (\x1b[0m) - Returns to normal color after each colored section
*/
fn show_main_menu() {
    println!(
        "\x1b[34m\n Welcome to Sillen: speciation of polyprotic acids and log c - pH diagrams \n \x1b[0m"
    );
    println!("\x1b[33m1. Diagram from task file\x1b[0m");
    println!("\x1b[33m2. Enter acids manually\x1b[0m");
    println!("\x1b[33m3. Examples\x1b[0m");
    println!("\x1b[33m0. Exit\x1b[0m");
    print!("\x1b[36mEnter your choice: \x1b[0m");
    let _ = io::stdout().flush();
}

/// reads one line from stdin; end of input is an error so that menus stop looping
pub fn get_user_input() -> Result<String, String> {
    let mut input = String::new();
    match io::stdin().read_line(&mut input) {
        Ok(0) => Err("End of input".to_string()),
        Ok(_) => Ok(input),
        Err(e) => Err(format!("Failed to read input: {}", e)),
    }
}

/// prints the prompt and reads the answer
pub fn prompt(text: &str) -> Result<String, String> {
    print!("{}", text);
    let _ = io::stdout().flush();
    get_user_input().map(|s| s.trim().to_string())
}
