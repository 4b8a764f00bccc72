// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Logging for the docsplit crates
//!
//! Events go to stderr through `emit_term`, so stdout stays free for
//! command output.
//!
//! Usage:
//! - Set DOCSPLIT_LOG=off (default) - no logs
//! - Set DOCSPLIT_LOG=info - one line per collection and per rename
//! - Set DOCSPLIT_LOG=debug - every named list and parsed document

use std::sync::Once;

// Re-export emit so macros can use it
pub use emit;

pub const LOG_ENV: &str = "DOCSPLIT_LOG";

static INIT: Once = Once::new();

/// Minimum level for a `DOCSPLIT_LOG` value. `Ok(None)` means logging is
/// off; an unknown value is returned as the error.
pub fn parse_level(value: &str) -> Result<Option<emit::Level>, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "off" => Ok(None),
        "debug" => Ok(Some(emit::Level::Debug)),
        "info" => Ok(Some(emit::Level::Info)),
        "warn" => Ok(Some(emit::Level::Warn)),
        "error" => Ok(Some(emit::Level::Error)),
        other => Err(other.to_string()),
    }
}

/// Initialize diagnostics based on the DOCSPLIT_LOG environment variable
///
/// Safe to call more than once; only the first call has an effect.
pub fn init_diagnostics() {
    INIT.call_once(|| {
        let value = std::env::var(LOG_ENV).unwrap_or_default();
        let level = match parse_level(&value) {
            Ok(None) => return,
            Ok(Some(level)) => level,
            Err(unknown) => {
                // Logging is not set up yet, so this one goes straight to stderr.
                eprintln!("Warning: Unknown {LOG_ENV} value '{unknown}', using 'info'");
                emit::Level::Info
            }
        };

        let rt = emit::setup()
            .emit_to(emit_term::stderr())
            .emit_when(emit::level::min_filter(level))
            .init();

        // The runtime lives for the whole process.
        std::mem::forget(rt);
    });
}

// The logging macros are re-exports rather than `macro_rules!` wrappers:
// a wrapper's hygiene hides the caller's locals from `emit`'s template
// captures such as `{count}`.

/// Log detailed diagnostics
pub use emit::debug as log_debug;

// Short-name versions

pub use emit::{debug, info, warn};
