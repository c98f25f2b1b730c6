//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `spycat_core` linkage.
//! - Own process-wide logging initialization, as any host of the core must.
//! - Keep output deterministic for quick local sanity checks.

use spycat_core::db::migrations::latest_version;
use spycat_core::db::open_db_in_memory;
use spycat_core::{default_log_level, init_logging};
use std::path::PathBuf;

fn main() {
    match default_log_dir().to_str() {
        Some(dir) => {
            if let Err(err) = init_logging(default_log_level(), dir) {
                eprintln!("spycat_cli logging disabled: {err}");
            }
        }
        None => eprintln!("spycat_cli logging disabled: log dir is not valid UTF-8"),
    }

    println!("spycat_core version={}", spycat_core::core_version());
    match open_db_in_memory() {
        Ok(_conn) => println!("spycat_core schema_version={}", latest_version()),
        Err(err) => {
            eprintln!("spycat_core db bootstrap failed: {err}");
            std::process::exit(1);
        }
    }
}

/// Log directory for the smoke binary. Core logging requires an absolute
/// path, so this derives one from the system temp directory.
fn default_log_dir() -> PathBuf {
    std::env::temp_dir().join("spycat-logs")
}
