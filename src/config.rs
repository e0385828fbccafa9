use crate::error::{DashboardError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use std::path::Path;

/// Default base of the spreadsheet CSV export endpoint.
pub const DEFAULT_EXPORT_BASE: &str = "https://docs.google.com/spreadsheets/d";

/// A selectable month and the sheet tab (gid) holding its addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Month {
    pub name: String,
    pub gid: u64,
}

/// Ordered, closed set of months the dashboard can show.
///
/// Order is the order the month selector lists them in; the first entry is
/// the default selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthTable(Vec<Month>);

impl MonthTable {
    pub fn new(months: Vec<Month>) -> Self {
        MonthTable(months)
    }

    /// Parse a `Name=gid` list separated by commas, e.g.
    /// `"September=0,October=1547489573"`.
    ///
    /// # Errors
    /// * `DashboardError::Config` if an entry has no `=` or a non-numeric gid
    pub fn parse(list: &str) -> Result<Self> {
        let mut months = Vec::new();
        for entry in list.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (name, gid) = entry
                .split_once('=')
                .ok_or_else(|| DashboardError::Config(format!("month entry without '=': {entry}")))?;
            let gid = gid
                .trim()
                .parse::<u64>()
                .map_err(|_| DashboardError::Config(format!("invalid gid for {}: {}", name.trim(), gid.trim())))?;
            months.push(Month {
                name: name.trim().to_string(),
                gid,
            });
        }
        Ok(MonthTable(months))
    }

    pub fn get(&self, name: &str) -> Option<&Month> {
        self.0.iter().find(|m| m.name == name)
    }

    pub fn first(&self) -> Option<&Month> {
        self.0.first()
    }

    pub fn names(&self) -> Vec<String> {
        self.0.iter().map(|m| m.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn validate(&self) -> Result<()> {
        if self.0.is_empty() {
            return Err(DashboardError::Config("no months configured".into()));
        }
        let mut seen = HashSet::new();
        for month in &self.0 {
            if month.name.is_empty() {
                return Err(DashboardError::Config("month with empty name".into()));
            }
            if !seen.insert(month.name.as_str()) {
                return Err(DashboardError::Config(format!("duplicate month: {}", month.name)));
            }
        }
        Ok(())
    }
}

impl Default for MonthTable {
    fn default() -> Self {
        MonthTable(vec![
            Month { name: "September".into(), gid: 0 },
            Month { name: "October".into(), gid: 1547489573 },
            Month { name: "November".into(), gid: 1968577955 },
        ])
    }
}

/// Initial view parameters handed to the map widget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapOptions {
    pub zoom: u8,
    pub width: u32,
    pub height: u32,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            zoom: 11,
            width: 700,
            height: 500,
        }
    }
}

/// Process-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the HTTP server listens on
    pub bind: String,

    /// Shared secret for the access gate, compared in plaintext
    pub app_password: String,

    /// Identifier of the spreadsheet holding one tab per month
    pub spreadsheet_id: String,

    /// Base URL of the CSV export endpoint
    pub export_base: String,

    pub months: MonthTable,

    pub map: MapOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".into(),
            app_password: String::new(),
            spreadsheet_id: String::new(),
            export_base: DEFAULT_EXPORT_BASE.into(),
            months: MonthTable::default(),
            map: MapOptions::default(),
        }
    }
}

impl Config {
    /// Load configuration the way the server binary does.
    ///
    /// Starts from the JSON file named by `ADDRESS_MAP_CONFIG` (if set), then
    /// applies `APP_PASSWORD`, `SPREADSHEET_ID`, `BIND`, `SHEET_EXPORT_BASE`
    /// and `MONTHS` from the environment. The result is validated.
    pub fn from_env() -> Result<Self> {
        let mut config = match env::var("ADDRESS_MAP_CONFIG") {
            Ok(path) => Self::load(&path)?,
            Err(_) => Self::default(),
        };

        if let Ok(v) = env::var("APP_PASSWORD") {
            config.app_password = v;
        }
        if let Ok(v) = env::var("SPREADSHEET_ID") {
            config.spreadsheet_id = v;
        }
        if let Ok(v) = env::var("BIND") {
            config.bind = v;
        }
        if let Ok(v) = env::var("SHEET_EXPORT_BASE") {
            config.export_base = v;
        }
        if let Ok(v) = env::var("MONTHS") {
            config.months = MonthTable::parse(&v)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file. Missing keys fall back to defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.app_password.is_empty() {
            return Err(DashboardError::Config("APP_PASSWORD is not set".into()));
        }
        if self.spreadsheet_id.trim().is_empty() {
            return Err(DashboardError::Config("SPREADSHEET_ID is not set".into()));
        }
        self.months.validate()
    }
}
