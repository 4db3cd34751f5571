//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `datz_core` linkage.
//! - Print catalog diagnostics for the configured database (`status`).
//! - Keep output deterministic for quick local sanity checks.

use datz_core::db::{open_db, open_db_in_memory};
use datz_core::{CatalogStore, CoreConfig, SqliteKeyValueRepository};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("datz_core ping={}", datz_core::ping());
    println!("datz_core version={}", datz_core::core_version());

    let config = CoreConfig::from_env();
    if let Some(log_dir) = config.log_dir.as_deref() {
        if let Err(err) = datz_core::init_logging(&config.log_level, log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let result = match std::env::args().nth(1).as_deref() {
        None => probe(),
        Some("status") => status(&config),
        Some(other) => Err(format!("unknown command `{other}`; expected `status`")),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Seeds a throwaway in-memory catalog.
fn probe() -> Result<(), String> {
    let conn = open_db_in_memory().map_err(|err| err.to_string())?;
    let repo = SqliteKeyValueRepository::try_new(&conn).map_err(|err| err.to_string())?;
    let mut catalog = CatalogStore::new(repo);
    let launch = catalog.bootstrap().map_err(|err| err.to_string())?;
    println!("catalog launch={launch:?} presets={}", catalog.preset_years().len());
    Ok(())
}

/// Reports on the persisted catalog without modifying it beyond the
/// name-list write-back `load` performs.
fn status(config: &CoreConfig) -> Result<(), String> {
    let conn = open_db(&config.db_path).map_err(|err| err.to_string())?;
    let repo = SqliteKeyValueRepository::try_new(&conn).map_err(|err| err.to_string())?;
    let mut catalog = CatalogStore::new(repo);

    println!("catalog db={}", config.db_path.display());
    if catalog.is_first_launch().map_err(|err| err.to_string())? {
        println!("catalog state=first_launch");
        return Ok(());
    }

    catalog.load().map_err(|err| err.to_string())?;
    println!("catalog years={}", catalog.all_names().len());
    for (index, name) in catalog.all_names().iter().enumerate() {
        let marker = if catalog.active_index() == Some(index) { "*" } else { " " };
        println!("{marker} {index}: {name}");
    }
    if let Some(active) = catalog.active_year() {
        println!(
            "active subjects={} total_coef={}",
            active.subjects.len(),
            active.total_coef()
        );
    }
    match catalog.verify_consistency() {
        Ok(()) => println!("consistency=ok"),
        Err(err) => println!("consistency=error ({err})"),
    }
    Ok(())
}
