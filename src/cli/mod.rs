//! Command-line interface module.

mod args;
pub mod build;
pub mod query;
pub mod serve;

pub use args::{Cli, Commands, QueryArgs};

use anyhow::Result;
use serde::Serialize;

/// Serialize command output, compact or pretty-printed.
pub fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}
