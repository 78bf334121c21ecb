/// Blockrun CLI
///
/// Loads, inspects and runs persisted block programs from the terminal.
use blockrun_core::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run_cli().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
