pub mod error;
pub mod settings;
pub mod telemetry;
pub mod types;
