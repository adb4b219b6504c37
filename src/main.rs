use clap::Parser;
use taskease::cli::commands::Cli;
use taskease::cli::handlers;
use tracing_subscriber::EnvFilter;

fn main() {
    // Warnings only by default; RUST_LOG=taskease=debug traces every mutation
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("taskease=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = handlers::dispatch(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
