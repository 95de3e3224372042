pub mod api;
pub mod core;
pub mod shared;

use clap::Parser;
use std::process::ExitCode;

use crate::api::cli::Cli;

pub use crate::core::features::unit_converter::{convert, ConversionError, ConversionResult};
pub use crate::core::history::{ConversionHistory, HistoryEntry, MAX_HISTORY_SIZE};

pub fn run() -> ExitCode {
    // A missing .env is fine; the environment and settings file still apply
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    shared::telemetry::init(cli.verbose);

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(api::dispatch(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
