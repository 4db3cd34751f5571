//! Year catalog store over a flat key-value repository.
//!
//! # Responsibility
//! - Own the ordered list of year names, the active year and the presets.
//! - Translate catalog operations into key-value reads and writes.
//!
//! # Invariants
//! - Every mutation of the name list is written through to `allNames`
//!   before the in-memory list changes.
//! - Operations touching several keys run in one repository transaction;
//!   in-memory state changes only after it commits.
//! - After `load()` and `save()`, `active_year.name == all_names[activeIndex]`.
//! - Year names are unique within the catalog.
//! - Corrupt or missing persisted state is reported, never repaired silently.

use crate::model::preset;
use crate::model::year::{Year, YearValidationError};
use crate::repo::kv_repo::{KeyValueRepository, RepoError};
use log::{debug, error, info, warn};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Key holding the JSON array of year names.
pub const ALL_NAMES_KEY: &str = "allNames";
/// Key holding the active offset into `allNames`.
pub const ACTIVE_INDEX_KEY: &str = "activeIndex";
/// Key whose presence means the catalog has been saved at least once.
pub const FIRST_LAUNCH_KEY: &str = "firstLaunch";
/// Sentinel written under `FIRST_LAUNCH_KEY`.
pub const NOT_FIRST_LAUNCH: &str = "not first launch";
/// Prefix separating year records from the bookkeeping keys above.
pub const YEAR_KEY_PREFIX: &str = "KEY_";

/// Builds the storage key for a year name.
pub fn gen_key(name: &str) -> String {
    format!("{YEAR_KEY_PREFIX}{name}")
}

/// Recovers the year name from a storage key.
///
/// Returns `None` for keys outside the year namespace.
pub fn de_gen_key(key: &str) -> Option<&str> {
    key.strip_prefix(YEAR_KEY_PREFIX)
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog-level error returned at the store boundary.
#[derive(Debug)]
pub enum CatalogError {
    /// Persisted state is absent, malformed or inconsistent.
    CorruptCatalogState { key: String, reason: String },
    YearNotFound(String),
    DuplicateYearName(String),
    NoActiveYear,
    PresetNotFound(usize),
    Validation(YearValidationError),
    Repo(RepoError),
}

impl CatalogError {
    fn corrupt(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CorruptCatalogState {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error describes unusable persisted state.
    pub fn is_corrupt_state(&self) -> bool {
        matches!(self, Self::CorruptCatalogState { .. })
    }

    /// Stable snake_case code for logs and FFI envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            Self::CorruptCatalogState { .. } => "corrupt_state",
            Self::YearNotFound(_) => "year_not_found",
            Self::DuplicateYearName(_) => "duplicate_year",
            Self::NoActiveYear => "no_active_year",
            Self::PresetNotFound(_) => "preset_not_found",
            Self::Validation(_) => "validation",
            Self::Repo(_) => "repo",
        }
    }
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CorruptCatalogState { key, reason } => {
                write!(f, "corrupt catalog state at `{key}`: {reason}")
            }
            Self::YearNotFound(name) => write!(f, "year not found: {name}"),
            Self::DuplicateYearName(name) => write!(f, "year already exists: {name}"),
            Self::NoActiveYear => write!(f, "no active year selected"),
            Self::PresetNotFound(index) => write!(f, "preset index out of range: {index}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for CatalogError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<YearValidationError> for CatalogError {
    fn from(value: YearValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Outcome of `CatalogStore::bootstrap`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchState {
    /// No save has happened yet; defaults and presets were seeded.
    FirstLaunch,
    /// Persisted names and the active year were restored.
    Restored,
}

/// Explicit catalog state object; construct once and pass to callers.
pub struct CatalogStore<R: KeyValueRepository> {
    repo: R,
    all_names: Vec<String>,
    active_year: Option<Year>,
    preset_years: Vec<Year>,
}

impl<R: KeyValueRepository> CatalogStore<R> {
    /// Creates an empty store. Nothing is read until `load`/`bootstrap`.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            all_names: Vec::new(),
            active_year: None,
            preset_years: Vec::new(),
        }
    }

    pub fn all_names(&self) -> &[String] {
        &self.all_names
    }

    pub fn active_year(&self) -> Option<&Year> {
        self.active_year.as_ref()
    }

    /// Mutable access to the active year. Changes persist on `save`.
    pub fn active_year_mut(&mut self) -> Option<&mut Year> {
        self.active_year.as_mut()
    }

    /// Position of the active year in `all_names`.
    pub fn active_index(&self) -> Option<usize> {
        let active = self.active_year.as_ref()?;
        self.all_names.iter().position(|name| *name == active.name)
    }

    pub fn preset_years(&self) -> &[Year] {
        &self.preset_years
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Runs the process-start flow.
    ///
    /// First launch seeds defaults and presets. Later launches restore the
    /// persisted catalog and also expose presets for adding new years.
    pub fn bootstrap(&mut self) -> CatalogResult<LaunchState> {
        let state = if self.is_first_launch()? {
            self.load_default_values()?;
            LaunchState::FirstLaunch
        } else {
            self.load()?;
            LaunchState::Restored
        };
        self.load_preset_years();
        info!(
            "event=catalog_bootstrap module=catalog status=ok launch={:?} names={}",
            state,
            self.all_names.len()
        );
        Ok(state)
    }

    /// Restores the name list and the active year from the backing store.
    ///
    /// An empty name list restores to "no active year". On error the
    /// in-memory catalog is left as it was.
    ///
    /// # Errors
    /// - `CorruptCatalogState` when `allNames` or `activeIndex` is absent or
    ///   malformed, the index is out of range, or the indexed year record is
    ///   missing or malformed.
    pub fn load(&mut self) -> CatalogResult<()> {
        let result = self.load_inner();
        if let Err(err) = &result {
            error!(
                "event=catalog_load module=catalog status=error error_code={} error={}",
                err.code(),
                err
            );
        }
        result
    }

    fn load_inner(&mut self) -> CatalogResult<()> {
        let names = self.read_all_names()?;
        let index = self.read_active_index()?;
        // An empty list means every year was deleted; the index points nowhere.
        let active = match names.get(index) {
            Some(name) => Some(self.load_year(name).map_err(|err| match err {
                CatalogError::YearNotFound(missing) => CatalogError::corrupt(
                    gen_key(&missing),
                    "listed in allNames but no record is stored",
                ),
                other => other,
            })?),
            None if names.is_empty() => None,
            None => {
                return Err(CatalogError::corrupt(
                    ACTIVE_INDEX_KEY,
                    format!(
                        "index {index} out of range for {} year name(s)",
                        names.len()
                    ),
                ))
            }
        };

        // Writes the freshly read list straight back; one redundant write per load.
        self.replace_all_names(names)?;
        self.active_year = active;

        info!(
            "event=catalog_load module=catalog status=ok names={} active={}",
            self.all_names.len(),
            self.active_year.is_some()
        );
        Ok(())
    }

    /// Reads one year by name.
    pub fn load_year(&self, name: &str) -> CatalogResult<Year> {
        self.load_year_by_key(&gen_key(name))
    }

    /// Reads one year by storage key.
    ///
    /// # Errors
    /// - `YearNotFound` when nothing is stored under `key`.
    /// - `CorruptCatalogState` when the value does not decode to a valid
    ///   year, or the decoded name disagrees with the key.
    pub fn load_year_by_key(&self, key: &str) -> CatalogResult<Year> {
        let expected_name = de_gen_key(key)
            .ok_or_else(|| CatalogError::corrupt(key, "not a year storage key"))?;
        let raw = self
            .repo
            .get(key)?
            .ok_or_else(|| CatalogError::YearNotFound(expected_name.to_string()))?;

        let year: Year = serde_json::from_str(&raw)
            .map_err(|err| CatalogError::corrupt(key, format!("malformed year record: {err}")))?;
        year.validate()
            .map_err(|err| CatalogError::corrupt(key, format!("invalid year record: {err}")))?;
        if year.name != expected_name {
            return Err(CatalogError::corrupt(
                key,
                "stored year name does not match its key",
            ));
        }
        Ok(year)
    }

    /// Persists the active year, the active index and the first-launch marker.
    ///
    /// `allNames` is not written here; name-list mutations persist eagerly.
    ///
    /// # Errors
    /// - `NoActiveYear` when nothing is selected.
    /// - `YearNotFound` when the active year is not listed in `all_names`.
    pub fn save(&self) -> CatalogResult<()> {
        let active = self.active_year.as_ref().ok_or(CatalogError::NoActiveYear)?;
        let index = self
            .all_names
            .iter()
            .position(|name| *name == active.name)
            .ok_or_else(|| CatalogError::YearNotFound(active.name.clone()))?;

        self.repo.transaction(|repo| -> CatalogResult<()> {
            write_year(repo, active)?;
            repo.set(ACTIVE_INDEX_KEY, &index.to_string())?;
            repo.set(FIRST_LAUNCH_KEY, NOT_FIRST_LAUNCH)?;
            Ok(())
        })?;

        info!("event=catalog_save module=catalog status=ok active_index={index}");
        Ok(())
    }

    /// Persists one year record under its derived key.
    pub fn save_year(&self, year: &Year) -> CatalogResult<()> {
        write_year(&self.repo, year)
    }

    /// Adds a new year: stores its record and appends its name together.
    ///
    /// Surrounding whitespace is trimmed from the name first.
    ///
    /// # Errors
    /// - `Validation` for structurally invalid years.
    /// - `DuplicateYearName` when the name is already listed.
    pub fn add_year(&mut self, mut year: Year) -> CatalogResult<()> {
        year.name = year.name.trim().to_string();
        year.validate()?;
        if self.all_names.contains(&year.name) {
            return Err(CatalogError::DuplicateYearName(year.name));
        }

        let mut names = self.all_names.clone();
        names.push(year.name.clone());
        self.repo.transaction(|repo| -> CatalogResult<()> {
            write_year(repo, &year)?;
            write_names(repo, &names)
        })?;
        self.all_names = names;

        debug!(
            "event=catalog_add module=catalog status=ok names={}",
            self.all_names.len()
        );
        Ok(())
    }

    /// Copies the preset at `index` into the catalog.
    ///
    /// `name` overrides the preset's display name, which is needed to add
    /// the same curriculum twice. Returns the stored name.
    pub fn add_preset(&mut self, index: usize, name: Option<&str>) -> CatalogResult<String> {
        let mut year = self
            .preset_years
            .get(index)
            .cloned()
            .ok_or(CatalogError::PresetNotFound(index))?;
        if let Some(name) = name {
            year.name = name.trim().to_string();
        }
        let stored_name = year.name.clone();
        self.add_year(year)?;
        Ok(stored_name)
    }

    /// Loads a listed year and makes it active.
    pub fn select_year(&mut self, name: &str) -> CatalogResult<()> {
        if !self.all_names.iter().any(|listed| listed == name) {
            return Err(CatalogError::YearNotFound(name.to_string()));
        }
        let year = self.load_year(name)?;
        self.active_year = Some(year);
        Ok(())
    }

    /// Removes a year from the name list and clears its record.
    ///
    /// Deleting the active year leaves no active year; callers select
    /// another one before the next `save`.
    ///
    /// # Errors
    /// - `YearNotFound` when `year_name` is not listed.
    pub fn delete(&mut self, year_name: &str) -> CatalogResult<()> {
        let position = self
            .all_names
            .iter()
            .position(|name| name == year_name)
            .ok_or_else(|| CatalogError::YearNotFound(year_name.to_string()))?;

        let mut names = self.all_names.clone();
        names.remove(position);
        let record_present = self.repo.transaction(|repo| -> CatalogResult<bool> {
            write_names(repo, &names)?;
            Ok(repo.remove(&gen_key(year_name))?)
        })?;
        self.all_names = names;
        if !record_present {
            warn!("event=catalog_delete module=catalog status=warn reason=record_already_absent");
        }

        if self
            .active_year
            .as_ref()
            .is_some_and(|active| active.name == year_name)
        {
            self.active_year = None;
        }

        info!(
            "event=catalog_delete module=catalog status=ok names={}",
            self.all_names.len()
        );
        Ok(())
    }

    /// Renames the active year, moving its record and its list slot.
    pub fn rename_active_year(&mut self, new_name: &str) -> CatalogResult<()> {
        let new_name = new_name.trim().to_string();
        let mut renamed = self
            .active_year
            .clone()
            .ok_or(CatalogError::NoActiveYear)?;
        let old_name = std::mem::replace(&mut renamed.name, new_name.clone());
        if old_name == new_name {
            return Ok(());
        }
        renamed.validate()?;
        if self.all_names.contains(&new_name) {
            return Err(CatalogError::DuplicateYearName(new_name));
        }
        let position = self
            .all_names
            .iter()
            .position(|name| *name == old_name)
            .ok_or_else(|| CatalogError::YearNotFound(old_name.clone()))?;

        let mut names = self.all_names.clone();
        names[position] = new_name;
        self.repo.transaction(|repo| -> CatalogResult<()> {
            write_year(repo, &renamed)?;
            write_names(repo, &names)?;
            repo.remove(&gen_key(&old_name))?;
            Ok(())
        })?;
        self.all_names = names;
        self.active_year = Some(renamed);
        Ok(())
    }

    /// Returns true until the first successful `save`.
    pub fn is_first_launch(&self) -> CatalogResult<bool> {
        Ok(self.repo.get(FIRST_LAUNCH_KEY)?.is_none())
    }

    /// Establishes the empty-catalog baseline: index 0, no names.
    ///
    /// Year records left behind by an earlier catalog are cleared so that
    /// stored keys keep agreeing with the (now empty) name list.
    pub fn load_default_values(&mut self) -> CatalogResult<()> {
        let cleared = self.repo.transaction(|repo| -> CatalogResult<usize> {
            repo.set(ACTIVE_INDEX_KEY, "0")?;
            write_names(repo, &[])?;
            let stale = repo.keys_with_prefix(YEAR_KEY_PREFIX)?;
            for key in &stale {
                repo.remove(key)?;
            }
            Ok(stale.len())
        })?;
        self.all_names.clear();
        self.active_year = None;
        if cleared > 0 {
            warn!("event=catalog_defaults module=catalog status=warn cleared_records={cleared}");
        }
        Ok(())
    }

    /// Replaces `preset_years` with the built-in template table.
    pub fn load_preset_years(&mut self) {
        self.preset_years = preset::preset_years();
    }

    /// Clears the first-launch marker so the next bootstrap seeds again.
    pub fn reset(&self) -> CatalogResult<()> {
        self.repo.remove(FIRST_LAUNCH_KEY)?;
        info!("event=catalog_reset module=catalog status=ok");
        Ok(())
    }

    /// Checks that persisted names match memory and every listed year has
    /// exactly one stored record.
    pub fn verify_consistency(&self) -> CatalogResult<()> {
        let persisted = self.read_all_names()?;
        if persisted != self.all_names {
            return Err(CatalogError::corrupt(
                ALL_NAMES_KEY,
                "persisted name list differs from memory",
            ));
        }

        let listed: BTreeSet<&str> = self.all_names.iter().map(String::as_str).collect();
        let keys = self.repo.keys_with_prefix(YEAR_KEY_PREFIX)?;
        let stored: BTreeSet<&str> = keys.iter().filter_map(|key| de_gen_key(key)).collect();
        if let Some(orphan) = stored.difference(&listed).next() {
            return Err(CatalogError::corrupt(
                gen_key(orphan),
                "stored record is not listed in allNames",
            ));
        }
        if let Some(missing) = listed.difference(&stored).next() {
            return Err(CatalogError::corrupt(
                gen_key(missing),
                "listed in allNames but no record is stored",
            ));
        }
        Ok(())
    }

    /// Write-through setter for the name list.
    ///
    /// Persists `names` first; memory only changes once the write succeeded.
    fn replace_all_names(&mut self, names: Vec<String>) -> CatalogResult<()> {
        write_names(&self.repo, &names)?;
        self.all_names = names;
        Ok(())
    }

    fn read_all_names(&self) -> CatalogResult<Vec<String>> {
        let raw = self
            .repo
            .get(ALL_NAMES_KEY)?
            .ok_or_else(|| CatalogError::corrupt(ALL_NAMES_KEY, "value is absent"))?;
        let names: Vec<String> = serde_json::from_str(&raw)
            .map_err(|err| CatalogError::corrupt(ALL_NAMES_KEY, format!("malformed list: {err}")))?;

        if let Some(duplicate) = first_duplicate(&names) {
            return Err(CatalogError::corrupt(
                ALL_NAMES_KEY,
                format!("duplicate year name `{duplicate}`"),
            ));
        }
        Ok(names)
    }

    fn read_active_index(&self) -> CatalogResult<usize> {
        let raw = self
            .repo
            .get(ACTIVE_INDEX_KEY)?
            .ok_or_else(|| CatalogError::corrupt(ACTIVE_INDEX_KEY, "value is absent"))?;
        raw.trim().parse::<usize>().map_err(|err| {
            CatalogError::corrupt(ACTIVE_INDEX_KEY, format!("not a valid index `{raw}`: {err}"))
        })
    }
}

fn first_duplicate(names: &[String]) -> Option<&str> {
    let mut seen = BTreeSet::new();
    names
        .iter()
        .map(String::as_str)
        .find(|name| !seen.insert(*name))
}

fn write_names<R: KeyValueRepository>(repo: &R, names: &[String]) -> CatalogResult<()> {
    let encoded = serde_json::to_string(names)
        .map_err(|err| CatalogError::corrupt(ALL_NAMES_KEY, err.to_string()))?;
    repo.set(ALL_NAMES_KEY, &encoded)?;
    Ok(())
}

fn write_year<R: KeyValueRepository>(repo: &R, year: &Year) -> CatalogResult<()> {
    year.validate()?;
    let encoded = serde_json::to_string(year)
        .map_err(|err| CatalogError::corrupt(gen_key(&year.name), err.to_string()))?;
    repo.set(&gen_key(&year.name), &encoded)?;
    Ok(())
}
