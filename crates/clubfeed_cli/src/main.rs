//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `clubfeed_core` linkage and
//!   schema bootstrap.
//! - Keep output deterministic for quick local sanity checks.

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Ok(log_dir) = std::env::var("CLUBFEED_LOG_DIR") {
        if let Err(err) = clubfeed_core::init_logging(clubfeed_core::default_log_level(), &log_dir)
        {
            eprintln!("logging init failed: {err}");
        }
    }

    println!("clubfeed_core version={}", clubfeed_core::core_version());

    match clubfeed_core::db::open_db_in_memory() {
        Ok(_) => {
            println!(
                "clubfeed_core schema_version={} status=ok",
                clubfeed_core::db::migrations::latest_version()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("clubfeed_core bootstrap failed: {err}");
            ExitCode::FAILURE
        }
    }
}
