//! Kodegen Bundler MSI - Windows installer bundler for MinGW-linked Rust applications.
//!
//! Builds the application, gathers its runtime, and links an `.msi` with WiX.

use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging, info by default
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Run CLI and get exit code
    let exit_code = match kodegen_bundler_msi::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
