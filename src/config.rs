use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, RotaError};
use crate::parser::load_roster;
use crate::schedule::{DayRules, Parent};

pub const DEFAULT_CONFIG_FILE: &str = "config.json";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw contents of `config.json`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RotaConfig {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(default)]
    pub closed_days: Vec<String>,
    #[serde(default)]
    pub parents: Vec<Parent>,
    /// CSV roster; wins over `parents` when set
    #[serde(default, alias = "excel_file")]
    pub roster_file: Option<PathBuf>,
    /// Replaces the default weekday table when set and non-empty
    #[serde(default)]
    pub rules: Option<DayRules>,
}

/// Everything the engine needs for one run
#[derive(Debug, Clone)]
pub struct RunInputs {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub closed_days: HashSet<NaiveDate>,
    pub parents: Vec<Parent>,
    pub rules: Option<DayRules>,
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|e| RotaError::Config(format!("{field} {value:?} is not a YYYY-MM-DD date ({e})")))
}

fn required_date(field: &str, value: Option<&str>) -> Result<NaiveDate> {
    let value = value.ok_or_else(|| RotaError::Config(format!("missing {field}")))?;
    parse_date(field, value)
}

impl RotaConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a config file. A missing file is reported as `ConfigNotFound`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(RotaError::ConfigNotFound(path.to_path_buf()));
        }
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn start(&self) -> Result<NaiveDate> {
        required_date("start_date", self.start_date.as_deref())
    }

    pub fn end(&self) -> Result<NaiveDate> {
        required_date("end_date", self.end_date.as_deref())
    }

    pub fn closed_days(&self) -> Result<HashSet<NaiveDate>> {
        self.closed_days
            .iter()
            .map(|d| parse_date("closed_days entry", d))
            .collect()
    }

    /// Parents from the roster file if one is configured, otherwise the inline list.
    /// Relative roster paths resolve against `base_dir`.
    pub fn load_parents(&self, base_dir: Option<&Path>) -> Result<Vec<Parent>> {
        match &self.roster_file {
            Some(file) => {
                let path = match base_dir {
                    Some(dir) if file.is_relative() => dir.join(file),
                    _ => file.clone(),
                };
                load_roster(path)
            }
            None => Ok(self
                .parents
                .iter()
                .cloned()
                .map(|mut p| {
                    p.assigned.clear();
                    p
                })
                .collect()),
        }
    }

    /// Validates dates and gathers parents. Fails before any scheduling happens.
    pub fn resolve(&self, base_dir: Option<&Path>) -> Result<RunInputs> {
        Ok(RunInputs {
            start: self.start()?,
            end: self.end()?,
            closed_days: self.closed_days()?,
            parents: self.load_parents(base_dir)?,
            rules: self.rules.clone().filter(|rules| !rules.is_empty()),
        })
    }
}

/// Loads `path` and resolves it, with roster paths relative to the config's directory
pub fn load_run_inputs<P: AsRef<Path>>(path: P) -> Result<RunInputs> {
    let path = path.as_ref();
    let config = RotaConfig::load(path)?;
    config.resolve(path.parent())
}
