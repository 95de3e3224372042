//! Command handlers
//!
//! Each submodule exposes a pure-ish handler returning a response DTO from
//! `shared::types`, plus a `run` wrapper that prints it as text or JSON.
//!
//! - `convert`: one-shot conversion
//! - `units`: category listing
//! - `assistant`: AI explanation
//! - `session`: interactive loop with history

pub mod assistant;
pub mod convert;
pub mod session;
pub mod units;

use serde::Serialize;

use crate::shared::error::AppResult;

/// Pretty JSON on stdout.
pub(crate) fn print_json<T: Serialize>(value: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
