use clap::Parser;
use remark::cli::commands::Cli;
use remark::cli::handlers;
use remark::logging::{self, LogTarget};

fn main() {
    let cli = Cli::parse();

    match cli.command {
        None => {
            // No subcommand → launch TUI
            logging::init(LogTarget::FileOnly);
            if let Err(e) = remark::tui::run(cli.project_dir.as_deref()) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(_) => {
            logging::init(LogTarget::Stderr);
            if let Err(e) = handlers::dispatch(cli) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
