use anc::{cli, log_error, logger, ui};

#[tokio::main]
async fn main() {
    if let Err(e) = logger::init() {
        eprintln!("Failed to initialize logging: {e}");
    }

    if let Err(e) = cli::main().await {
        log_error!("Exiting with error: {:#}", e);
        ui::print_error(&format!("Error: {e:#}"));
        std::process::exit(1);
    }
}
