use clap::Parser;
use toolcrib::cli::commands::Cli;
use toolcrib::cli::handlers;
use toolcrib::io::{config_io, logging};

fn main() {
    let cli = Cli::parse();
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(config_io::default_data_dir);

    // Ephemeral runs leave nothing behind, not even a log file
    logging::init_tracing((!cli.ephemeral).then_some(data_dir.as_path()));

    let result = match cli.command {
        // No subcommand → launch TUI
        None => toolcrib::tui::run(&data_dir, cli.ephemeral),
        Some(command) => handlers::dispatch(command, &data_dir, cli.ephemeral, cli.json),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "exiting with error");
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
