use clap::Parser;
use tuck::cli::commands::Cli;
use tuck::cli::handlers;

fn main() {
    let cli = Cli::parse();

    // No subcommand launches the TUI
    if let Err(e) = handlers::dispatch(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
