use std::sync::OnceLock;

use crate::settings::Settings;

/// The process-wide settings cell: `main.rs` sets it once, right after
/// loading `Settings`, so anything later in the process that needs to know
/// what the running server was configured with can read it back without a
/// reference threaded down from `main`.
pub static SETTINGS: OnceLock<Settings> = OnceLock::new();
