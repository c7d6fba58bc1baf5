//! CLI smoke entry point.
//!
//! Prints deterministic probe output to verify `fileshare_core` linkage and
//! that a fresh in-memory database migrates and seeds its default categories.

use fileshare_core::db::open_db_in_memory;
use fileshare_core::{CategoryService, SqliteCategoryRepository};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("fileshare_core ping={}", fileshare_core::ping());
    println!("fileshare_core version={}", fileshare_core::core_version());

    let categories = open_db_in_memory()
        .map_err(|err| err.to_string())
        .and_then(|conn| {
            let repo = SqliteCategoryRepository::try_new(&conn).map_err(|err| err.to_string())?;
            CategoryService::new(repo)
                .list_categories()
                .map_err(|err| err.to_string())
        });

    match categories {
        Ok(categories) => {
            println!("fileshare_core default_categories={}", categories.len());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("fileshare_core probe failed: {err}");
            ExitCode::FAILURE
        }
    }
}
