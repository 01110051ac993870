use Sillen::cli::cli_main::run_interactive_menu;
use simplelog::{ColorChoice, Config, LevelFilter, SimpleLogger, TermLogger, TerminalMode};

pub fn main() {
    if TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .is_err()
    {
        let _ = SimpleLogger::init(LevelFilter::Info, Config::default());
    }
    run_interactive_menu();
}
