//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose catalog operations to Dart via FRB.
//! - Translate core errors into simple response envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every call opens the catalog, runs one operation and drops it; no
//!   catalog state survives between calls.
//! - Read-only calls never seed defaults, so they cannot clear stored years.

use datz_core::db::open_db;
use datz_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    CatalogError, CatalogStore, CoreConfig, LaunchState, SqliteKeyValueRepository, SubjectMeta,
    Year,
};
use log::warn;
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::OnceLock;

static CATALOG_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// One subject row for display.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectView {
    pub name: String,
    pub coef: f32,
    /// Sub-subjects of a composite; empty for plain subjects.
    pub parts: Vec<SubjectView>,
}

/// One year for display.
#[derive(Debug, Clone, PartialEq)]
pub struct YearView {
    pub name: String,
    pub subjects: Vec<SubjectView>,
    pub total_coef: f32,
}

/// Generic action response envelope for catalog calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Stable error code on failure (`corrupt_state`, `year_not_found`, ...).
    pub error_code: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl CatalogActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            error_code: None,
            message: message.into(),
        }
    }

    fn failure(operation: &str, err: &CallError) -> Self {
        Self {
            ok: false,
            error_code: Some(err.code().to_string()),
            message: format!("{operation} failed: {err}"),
        }
    }
}

/// Launch envelope returned by `catalog_bootstrap`.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogBootstrapResponse {
    pub ok: bool,
    pub first_launch: bool,
    pub year_names: Vec<String>,
    pub active_year: Option<YearView>,
    pub message: String,
}

/// Runs the launch flow: seed on first launch, otherwise restore.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Corrupt persisted state is reported with `ok=false`; nothing is reset
///   implicitly. The shell may call `catalog_reset` then bootstrap again.
#[flutter_rust_bridge::frb(sync)]
pub fn catalog_bootstrap() -> CatalogBootstrapResponse {
    let outcome = with_catalog(|catalog| {
        let launch = catalog.bootstrap()?;
        Ok((
            launch,
            catalog.all_names().to_vec(),
            catalog.active_year().map(to_year_view),
        ))
    });

    match outcome {
        Ok((launch, year_names, active_year)) => CatalogBootstrapResponse {
            ok: true,
            first_launch: launch == LaunchState::FirstLaunch,
            message: format!("Catalog ready with {} year(s).", year_names.len()),
            year_names,
            active_year,
        },
        Err(err) => CatalogBootstrapResponse {
            ok: false,
            first_launch: false,
            year_names: Vec::new(),
            active_year: None,
            message: format!("catalog_bootstrap failed: {err}"),
        },
    }
}

/// Lists stored year names in catalog order. Empty on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn catalog_list_names() -> Vec<String> {
    with_restored_catalog(|catalog| Ok(catalog.all_names().to_vec())).unwrap_or_else(|err| {
        warn!("event=ffi_list_names module=ffi status=error error={err}");
        Vec::new()
    })
}

/// Returns the active year, or `None` when nothing is stored yet.
#[flutter_rust_bridge::frb(sync)]
pub fn catalog_active_year() -> Option<YearView> {
    with_restored_catalog(|catalog| Ok(catalog.active_year().map(to_year_view)))
        .ok()
        .flatten()
}

/// Lists built-in preset templates in positional order.
#[flutter_rust_bridge::frb(sync)]
pub fn catalog_list_presets() -> Vec<YearView> {
    datz_core::model::preset::preset_years()
        .iter()
        .map(to_year_view)
        .collect()
}

/// Copies preset `index` into the catalog, selects it and saves.
///
/// `name` overrides the preset display name when non-blank.
#[flutter_rust_bridge::frb(sync)]
pub fn catalog_add_preset(index: u32, name: Option<String>) -> CatalogActionResponse {
    let result = with_loaded_catalog(|catalog| {
        let override_name = name.as_deref().map(str::trim).filter(|value| !value.is_empty());
        let stored = catalog.add_preset(index as usize, override_name)?;
        catalog.select_year(&stored)?;
        catalog.save()?;
        Ok(stored)
    });
    match result {
        Ok(stored) => CatalogActionResponse::success(format!("Year {stored} added.")),
        Err(err) => CatalogActionResponse::failure("catalog_add_preset", &err),
    }
}

/// Makes `name` the active year and persists the selection.
#[flutter_rust_bridge::frb(sync)]
pub fn catalog_select_year(name: String) -> CatalogActionResponse {
    let result = with_loaded_catalog(|catalog| {
        catalog.select_year(name.trim())?;
        Ok(catalog.save()?)
    });
    match result {
        Ok(()) => CatalogActionResponse::success("Year selected."),
        Err(err) => CatalogActionResponse::failure("catalog_select_year", &err),
    }
}

/// Deletes a year and re-saves the selection so the persisted index keeps
/// pointing at the active year. When the deleted year was active, the first
/// remaining year becomes active.
#[flutter_rust_bridge::frb(sync)]
pub fn catalog_delete_year(name: String) -> CatalogActionResponse {
    let result = with_loaded_catalog(|catalog| {
        catalog.delete(name.trim())?;
        if catalog.active_year().is_none() {
            if let Some(first) = catalog.all_names().first().cloned() {
                catalog.select_year(&first)?;
            }
        }
        if catalog.active_year().is_some() {
            catalog.save()?;
        }
        Ok(())
    });
    match result {
        Ok(()) => CatalogActionResponse::success("Year deleted."),
        Err(err) => CatalogActionResponse::failure("catalog_delete_year", &err),
    }
}

/// Updates one top-level subject coefficient of the active year and saves.
#[flutter_rust_bridge::frb(sync)]
pub fn catalog_set_subject_coef(subject_index: u32, coef: f32) -> CatalogActionResponse {
    let result = with_loaded_catalog(|catalog| {
        let year = catalog.active_year_mut().ok_or(CatalogError::NoActiveYear)?;
        let Some(subject) = year.subjects.get_mut(subject_index as usize) else {
            return Err(CallError::InvalidInput(format!(
                "subject index {subject_index} out of range"
            )));
        };
        subject.coef = coef;
        catalog.save()?;
        Ok(())
    });
    match result {
        Ok(()) => CatalogActionResponse::success("Coefficient updated."),
        Err(err) => CatalogActionResponse::failure("catalog_set_subject_coef", &err),
    }
}

/// Clears the first-launch marker so the next bootstrap re-seeds.
#[flutter_rust_bridge::frb(sync)]
pub fn catalog_reset() -> CatalogActionResponse {
    match with_catalog(|catalog| Ok(catalog.reset()?)) {
        Ok(()) => CatalogActionResponse::success("Catalog reset."),
        Err(err) => CatalogActionResponse::failure("catalog_reset", &err),
    }
}

/// FFI-local error wrapper.
#[derive(Debug)]
enum CallError {
    Open(String),
    Catalog(CatalogError),
    InvalidInput(String),
}

impl CallError {
    fn code(&self) -> &'static str {
        match self {
            Self::Open(_) => "db_open",
            Self::Catalog(err) => err.code(),
            Self::InvalidInput(_) => "invalid_input",
        }
    }
}

impl std::fmt::Display for CallError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open(message) | Self::InvalidInput(message) => write!(f, "{message}"),
            Self::Catalog(err) => write!(f, "{err}"),
        }
    }
}

impl From<CatalogError> for CallError {
    fn from(value: CatalogError) -> Self {
        Self::Catalog(value)
    }
}

type Catalog<'conn> = CatalogStore<SqliteKeyValueRepository<'conn>>;

fn resolve_catalog_db_path() -> PathBuf {
    CATALOG_DB_PATH
        .get_or_init(|| CoreConfig::from_env().db_path)
        .clone()
}

fn open_catalog_connection() -> Result<Connection, CallError> {
    open_db(resolve_catalog_db_path())
        .map_err(|err| CallError::Open(format!("catalog DB open failed: {err}")))
}

fn with_catalog<T>(
    f: impl FnOnce(&mut Catalog<'_>) -> Result<T, CallError>,
) -> Result<T, CallError> {
    let conn = open_catalog_connection()?;
    let repo = SqliteKeyValueRepository::try_new(&conn)
        .map_err(|err| CallError::Open(format!("catalog repo init failed: {err}")))?;
    let mut catalog = CatalogStore::new(repo);
    f(&mut catalog)
}

/// Like `with_catalog`, restoring persisted state without seeding.
///
/// Before the first save the catalog stays empty and nothing is written.
fn with_restored_catalog<T>(
    f: impl FnOnce(&mut Catalog<'_>) -> Result<T, CallError>,
) -> Result<T, CallError> {
    with_catalog(|catalog| {
        if !catalog.is_first_launch()? {
            catalog.load()?;
        }
        f(catalog)
    })
}

/// Like `with_catalog`, after running `bootstrap`. Used by mutating calls only.
fn with_loaded_catalog<T>(
    f: impl FnOnce(&mut Catalog<'_>) -> Result<T, CallError>,
) -> Result<T, CallError> {
    with_catalog(|catalog| {
        catalog.bootstrap()?;
        f(catalog)
    })
}

fn to_subject_view(subject: &SubjectMeta) -> SubjectView {
    SubjectView {
        name: subject.name.clone(),
        coef: subject.coef,
        parts: subject
            .combi_meta
            .as_ref()
            .map(|combi| combi.subjects.iter().map(to_subject_view).collect())
            .unwrap_or_default(),
    }
}

fn to_year_view(year: &Year) -> YearView {
    YearView {
        name: year.name.clone(),
        subjects: year.subjects.iter().map(to_subject_view).collect(),
        total_coef: year.total_coef(),
    }
}
