//! # DruDock Project Configuration (Config Gateway)
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! Every managed application carries a `.config.yml` describing it: the app name,
//! app type, host name, distribution tier and source path, plus the DruDock version
//! that wrote the file. This module is the only place that reads or writes that file.
//!
//! ## Architecture
//!
//! - `ProjectConfig` keeps the whole YAML mapping (`serde_yaml::Mapping`), not a fixed
//!   struct, so keys DruDock does not know about survive a load/save round trip.
//!   Typed accessors cover the keys commands rely on.
//! - `ConfigGateway` resolves, loads, validates and saves that mapping:
//!   1. `<root>/.config.yml` (the current directory for the CLI)
//!   2. `<root>/<app>/.config.yml` when an app name hint is given
//!   3. otherwise `DrudockError::ConfigNotFound`
//! - Validation reports every missing required key through the reporter and fails
//!   with `DrudockError::ConfigIncomplete`. It can be skipped explicitly, which only
//!   `drudock app config update` does.
//! - The schema check compares the first character of the tool version with the
//!   first character of `drudock.version` in the file. A mismatch is only a warning.
//! - Saving always serialises the full mapping and overwrites the file; there is no
//!   merging.
//!
//! ## Examples
//!
//! ```rust
//! let gateway = ConfigGateway::current_dir()?;
//! let mut cfg = gateway.load(None, &reporter, Validation::Enforce)?;
//! cfg.set("host", "demo.localhost");
//! gateway.save(&cfg)?;
//! ```
//!
use crate::common::ui::Reporter;
use crate::core::error::{DrudockError, Result};
use anyhow::{anyhow, Context};
use serde_yaml::{Mapping, Value};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// File name of the per-app configuration.
pub const CONFIG_FILENAME: &str = ".config.yml";

/// Top-level keys every app config must define.
pub const REQUIRED_KEYS: [&str; 5] = ["appname", "apptype", "host", "dist", "src"];

/// Dotted name used when reporting the nested schema version as missing.
pub const SCHEMA_VERSION_KEY: &str = "drudock.version";

const TOOL_SECTION: &str = "drudock";
const VERSION_FIELD: &str = "version";

/// Deployment class of an app. Selects the compose file and nginx variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DistributionTier {
    Local,
    Dev,
    Stage,
    Prod,
    Other(String),
}

impl DistributionTier {
    /// Case-insensitive parse; unknown names are kept verbatim.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "local" | "basic" => DistributionTier::Local,
            "dev" | "development" | "full" => DistributionTier::Dev,
            "stage" | "staging" => DistributionTier::Stage,
            "prod" | "production" => DistributionTier::Prod,
            _ => DistributionTier::Other(value.trim().to_string()),
        }
    }

    /// Stage and Prod sit behind the shared nginx proxy.
    pub fn is_hosted(&self) -> bool {
        matches!(self, DistributionTier::Stage | DistributionTier::Prod)
    }

    pub fn as_str(&self) -> &str {
        match self {
            DistributionTier::Local => "Local",
            DistributionTier::Dev => "Dev",
            DistributionTier::Stage => "Stage",
            DistributionTier::Prod => "Prod",
            DistributionTier::Other(s) => s,
        }
    }
}

impl fmt::Display for DistributionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether `load` enforces the required keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    Enforce,
    Skip,
}

/// The parsed `.config.yml` of one app.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProjectConfig {
    values: Mapping,
    path: Option<PathBuf>,
}

impl ProjectConfig {
    pub fn from_mapping(values: Mapping) -> Self {
        Self { values, path: None }
    }

    pub fn values(&self) -> &Mapping {
        &self.values
    }

    /// File the config was loaded from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Scalar value of a top-level key rendered as a string.
    pub fn get_str(&self, key: &str) -> Option<String> {
        self.values.get(key).and_then(scalar_to_string)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn appname(&self) -> Option<String> {
        self.get_str("appname")
    }

    pub fn apptype(&self) -> Option<String> {
        self.get_str("apptype")
    }

    pub fn host(&self) -> Option<String> {
        self.get_str("host").filter(|h| !h.trim().is_empty())
    }

    pub fn dist(&self) -> Option<DistributionTier> {
        self.get_str("dist").map(|d| DistributionTier::parse(&d))
    }

    /// Source path with `~` expanded.
    pub fn src(&self) -> Option<PathBuf> {
        self.get_str("src")
            .map(|s| PathBuf::from(shellexpand::tilde(&s).into_owned()))
    }

    /// `drudock.version`: the DruDock version that last wrote this file.
    pub fn schema_version(&self) -> Option<String> {
        self.values
            .get(TOOL_SECTION)
            .and_then(Value::as_mapping)
            .and_then(|m| m.get(VERSION_FIELD))
            .and_then(scalar_to_string)
    }

    /// App name as used in directory and compose project names: lower-cased, no whitespace.
    pub fn system_appname(&self) -> Option<String> {
        self.appname().map(|name| {
            name.chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
                .to_lowercase()
        })
    }

    /// Required keys absent from the mapping, in declaration order.
    pub fn missing_keys(&self) -> Vec<String> {
        let mut missing: Vec<String> = REQUIRED_KEYS
            .iter()
            .filter(|k| !self.values.contains_key(**k))
            .map(|k| k.to_string())
            .collect();
        if self.schema_version().is_none() {
            missing.push(SCHEMA_VERSION_KEY.to_string());
        }
        missing
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.values.insert(Value::from(key), value.into());
    }

    pub fn set_schema_version(&mut self, version: &str) {
        let section = self
            .values
            .entry(Value::from(TOOL_SECTION))
            .or_insert_with(|| Value::Mapping(Mapping::new()));
        if !section.is_mapping() {
            *section = Value::Mapping(Mapping::new());
        }
        if let Value::Mapping(m) = section {
            m.insert(Value::from(VERSION_FIELD), Value::from(version));
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// `true` when the tool and the config belong to the same schema generation.
pub fn version_matches(tool_version: &str, schema_version: &str) -> bool {
    tool_version.trim().chars().next() == schema_version.trim().chars().next()
}

/// Locates, loads, validates and saves app configs relative to a root directory.
#[derive(Debug, Clone)]
pub struct ConfigGateway {
    root: PathBuf,
    tool_version: String,
}

impl ConfigGateway {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Gateway rooted at the process working directory.
    pub fn current_dir() -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;
        Ok(Self::new(cwd))
    }

    pub fn with_tool_version(mut self, version: impl Into<String>) -> Self {
        self.tool_version = version.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn tool_version(&self) -> &str {
        &self.tool_version
    }

    /// Finds the config file for the current directory or the hinted app directory.
    pub fn locate(&self, app_hint: Option<&str>) -> Result<PathBuf> {
        let mut searched = vec![self.root.join(CONFIG_FILENAME)];
        if let Some(app) = app_hint.filter(|a| !a.trim().is_empty()) {
            searched.push(self.root.join(app).join(CONFIG_FILENAME));
        }
        for candidate in &searched {
            if candidate.is_file() {
                debug!("Found app config at {}", candidate.display());
                return Ok(candidate.clone());
            }
        }
        Err(anyhow!(DrudockError::ConfigNotFound { searched }))
    }

    /// Loads the active app config.
    ///
    /// With `Validation::Enforce`, every missing required key is reported as its own
    /// warning before `DrudockError::ConfigIncomplete` is returned.
    pub fn load(
        &self,
        app_hint: Option<&str>,
        reporter: &dyn Reporter,
        validation: Validation,
    ) -> Result<ProjectConfig> {
        let path = self.locate(app_hint)?;
        let config = read_config(&path)?;

        if validation == Validation::Enforce {
            let missing = config.missing_keys();
            if !missing.is_empty() {
                reporter.info(
                    "Your app is missing the following config, please run [drudock app config update]:",
                );
                for key in &missing {
                    reporter.warning(key);
                }
                return Err(anyhow!(DrudockError::ConfigIncomplete { missing }));
            }
        }

        if let Some(schema) = config.schema_version() {
            if !version_matches(&self.tool_version, &schema) {
                warn!(
                    "Tool version {} does not match config version {}",
                    self.tool_version, schema
                );
                reporter.warning(&format!(
                    "Your installed DruDock version ({}) is different to the app config version ({}) and may not work",
                    self.tool_version, schema
                ));
            }
        }

        info!("Loaded app config from {}", path.display());
        Ok(config)
    }

    /// Builds a fresh config that will be saved to `<root>/.config.yml`.
    pub fn create(&self, values: Mapping) -> ProjectConfig {
        let mut config = ProjectConfig {
            values,
            path: Some(self.root.join(CONFIG_FILENAME)),
        };
        config.set_schema_version(&self.tool_version);
        config
    }

    /// Serialises the whole mapping over the config's file.
    pub fn save(&self, config: &ProjectConfig) -> Result<PathBuf> {
        let path = config
            .path
            .clone()
            .unwrap_or_else(|| self.root.join(CONFIG_FILENAME));
        let yaml = serde_yaml::to_string(&config.values)
            .context("Failed to serialise app config to YAML")?;
        fs::write(&path, yaml).map_err(|source| {
            anyhow!(DrudockError::ConfigWrite {
                path: path.clone(),
                source,
            })
        })?;
        info!("Saved app config to {}", path.display());
        Ok(path)
    }
}

fn read_config(path: &Path) -> Result<ProjectConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read app config: {}", path.display()))?;
    let parsed: Value = serde_yaml::from_str(&content).map_err(|source| {
        anyhow!(DrudockError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    })?;
    let values = match parsed {
        Value::Mapping(m) => m,
        // An empty file parses as null; treat it as an empty mapping.
        Value::Null => Mapping::new(),
        other => {
            let source = <serde_yaml::Error as serde::de::Error>::custom(format!(
                "expected a mapping at the top level, found {}",
                value_kind(&other)
            ));
            return Err(anyhow!(DrudockError::ConfigParse {
                path: path.to_path_buf(),
                source,
            }));
        }
    };
    Ok(ProjectConfig {
        values,
        path: Some(path.to_path_buf()),
    })
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ui::{RecordingReporter, Report};
    use tempfile::tempdir;

    const DEMO: &str = "appname: demo
apptype: drupal
host: demo.localhost
dist: Local
src: ./src
drudock:
  version: '1.4'
";

    fn write(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join(CONFIG_FILENAME);
        fs::write(&path, content).unwrap();
        path
    }

    fn config_error(err: &anyhow::Error) -> &DrudockError {
        err.downcast_ref::<DrudockError>()
            .expect("expected a DrudockError")
    }

    #[test]
    fn test_load_matching_version_has_no_warning() {
        let dir = tempdir().unwrap();
        write(dir.path(), DEMO);
        let gateway = ConfigGateway::new(dir.path()).with_tool_version("1.4");
        let reporter = RecordingReporter::new();

        let cfg = gateway.load(None, &reporter, Validation::Enforce).unwrap();

        assert_eq!(cfg.appname().as_deref(), Some("demo"));
        assert_eq!(cfg.apptype().as_deref(), Some("drupal"));
        assert_eq!(cfg.host().as_deref(), Some("demo.localhost"));
        assert_eq!(cfg.dist(), Some(DistributionTier::Local));
        assert_eq!(cfg.src(), Some(PathBuf::from("./src")));
        assert_eq!(cfg.schema_version().as_deref(), Some("1.4"));
        assert!(reporter.events().is_empty());
    }

    #[test]
    fn test_load_version_mismatch_warns_but_succeeds() {
        let dir = tempdir().unwrap();
        write(dir.path(), &DEMO.replace("'1.4'", "'0.9'"));
        let gateway = ConfigGateway::new(dir.path()).with_tool_version("1.4");
        let reporter = RecordingReporter::new();

        let cfg = gateway.load(None, &reporter, Validation::Enforce).unwrap();

        assert_eq!(cfg.schema_version().as_deref(), Some("0.9"));
        let warnings = reporter.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("different to the app config version (0.9)"));
    }

    #[test]
    fn test_numeric_schema_version_is_read() {
        let dir = tempdir().unwrap();
        write(dir.path(), &DEMO.replace("'1.4'", "1.4"));
        let gateway = ConfigGateway::new(dir.path()).with_tool_version("1.4.0");
        let reporter = RecordingReporter::new();
        let cfg = gateway.load(None, &reporter, Validation::Enforce).unwrap();
        assert_eq!(cfg.schema_version().as_deref(), Some("1.4"));
        assert!(reporter.warnings().is_empty());
    }

    #[test]
    fn test_missing_keys_reported_exactly() {
        let cases: [(&str, Vec<&str>); 3] = [
            ("host", vec!["host"]),
            ("dist", vec!["dist"]),
            ("src", vec!["src"]),
        ];
        for (drop_key, expected) in cases {
            let dir = tempdir().unwrap();
            let content: String = DEMO
                .lines()
                .filter(|l| !l.starts_with(&format!("{}:", drop_key)))
                .map(|l| format!("{}\n", l))
                .collect();
            write(dir.path(), &content);
            let reporter = RecordingReporter::new();
            let err = ConfigGateway::new(dir.path())
                .with_tool_version("1.4")
                .load(None, &reporter, Validation::Enforce)
                .unwrap_err();

            match config_error(&err) {
                DrudockError::ConfigIncomplete { missing } => assert_eq!(missing, &expected),
                other => panic!("unexpected error: {:?}", other),
            }
            assert_eq!(reporter.warnings(), expected);
        }
    }

    #[test]
    fn test_all_missing_keys_listed_in_order() {
        let dir = tempdir().unwrap();
        write(dir.path(), "apptype: drupal\nextra: kept\n");
        let reporter = RecordingReporter::new();
        let err = ConfigGateway::new(dir.path())
            .load(None, &reporter, Validation::Enforce)
            .unwrap_err();

        let expected = vec!["appname", "host", "dist", "src", "drudock.version"];
        match config_error(&err) {
            DrudockError::ConfigIncomplete { missing } => assert_eq!(missing, &expected),
            other => panic!("unexpected error: {:?}", other),
        }
        let events = reporter.events();
        assert!(matches!(&events[0], Report::Info(t) if t.contains("app config update")));
        assert_eq!(reporter.warnings(), expected);
    }

    #[test]
    fn test_skip_validation_loads_incomplete_config() {
        let dir = tempdir().unwrap();
        write(dir.path(), "appname: demo\n");
        let reporter = RecordingReporter::new();
        let cfg = ConfigGateway::new(dir.path())
            .load(None, &reporter, Validation::Skip)
            .unwrap();
        assert_eq!(cfg.appname().as_deref(), Some("demo"));
        assert!(reporter.events().is_empty());
    }

    #[test]
    fn test_config_not_found() {
        let dir = tempdir().unwrap();
        let reporter = RecordingReporter::new();
        let err = ConfigGateway::new(dir.path())
            .load(Some("demo"), &reporter, Validation::Enforce)
            .unwrap_err();
        match config_error(&err) {
            DrudockError::ConfigNotFound { searched } => {
                assert_eq!(searched.len(), 2);
                assert_eq!(searched[1], dir.path().join("demo").join(CONFIG_FILENAME));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_locate_prefers_cwd_then_app_dir() {
        let dir = tempdir().unwrap();
        let app_dir = dir.path().join("demo");
        fs::create_dir(&app_dir).unwrap();
        let in_app = write(&app_dir, DEMO);
        let gateway = ConfigGateway::new(dir.path());

        assert_eq!(gateway.locate(Some("demo")).unwrap(), in_app);
        assert!(gateway.locate(None).is_err());

        let in_cwd = write(dir.path(), DEMO);
        assert_eq!(gateway.locate(Some("demo")).unwrap(), in_cwd);
    }

    #[test]
    fn test_save_load_round_trip_keeps_unknown_keys() {
        let dir = tempdir().unwrap();
        let content = format!("{}database:\n  name: dev_db\n  port: 3306\n", DEMO);
        write(dir.path(), &content);
        let gateway = ConfigGateway::new(dir.path()).with_tool_version("1.4");
        let reporter = RecordingReporter::new();

        let first = gateway.load(None, &reporter, Validation::Enforce).unwrap();
        gateway.save(&first).unwrap();
        let second = gateway.load(None, &reporter, Validation::Enforce).unwrap();

        assert_eq!(first.values(), second.values());
        let persisted: Value = serde_yaml::from_str(&content).unwrap();
        assert_eq!(&Value::Mapping(second.values().clone()), &persisted);
    }

    #[test]
    fn test_save_overwrites_whole_mapping() {
        let dir = tempdir().unwrap();
        write(dir.path(), DEMO);
        let gateway = ConfigGateway::new(dir.path()).with_tool_version("1.4");
        let reporter = RecordingReporter::new();

        let mut cfg = gateway.load(None, &reporter, Validation::Enforce).unwrap();
        cfg.set("host", "changed.localhost");
        let path = gateway.save(&cfg).unwrap();

        let raw = fs::read_to_string(path).unwrap();
        assert!(raw.contains("host: changed.localhost"));
        assert!(!raw.contains("demo.localhost"));
    }

    #[test]
    fn test_create_stamps_tool_version() {
        let dir = tempdir().unwrap();
        let gateway = ConfigGateway::new(dir.path()).with_tool_version("1.4.0");
        let mut values = Mapping::new();
        values.insert("appname".into(), "New App".into());
        let cfg = gateway.create(values);
        assert_eq!(cfg.schema_version().as_deref(), Some("1.4.0"));
        assert_eq!(cfg.system_appname().as_deref(), Some("newapp"));

        let path = gateway.save(&cfg).unwrap();
        assert_eq!(path, dir.path().join(CONFIG_FILENAME));
        assert!(path.is_file());
    }

    #[test]
    fn test_save_failure_is_config_write_error() {
        let dir = tempdir().unwrap();
        // A directory where the file should be makes the write fail.
        fs::create_dir(dir.path().join(CONFIG_FILENAME)).unwrap();
        let gateway = ConfigGateway::new(dir.path());
        let cfg = gateway.create(Mapping::new());
        let err = gateway.save(&cfg).unwrap_err();
        assert!(matches!(config_error(&err), DrudockError::ConfigWrite { .. }));
    }

    #[test]
    fn test_non_mapping_document_is_parse_error() {
        let dir = tempdir().unwrap();
        write(dir.path(), "- just\n- a list\n");
        let reporter = RecordingReporter::new();
        let err = ConfigGateway::new(dir.path())
            .load(None, &reporter, Validation::Skip)
            .unwrap_err();
        assert!(matches!(config_error(&err), DrudockError::ConfigParse { .. }));
    }

    #[test]
    fn test_version_matches_first_character() {
        assert!(version_matches("1.4-alpha1.0.8", "1.2"));
        assert!(!version_matches("1.4", "0.9"));
        assert!(!version_matches("1.4", ""));
    }

    #[test]
    fn test_distribution_tier_parse() {
        assert_eq!(DistributionTier::parse("prod"), DistributionTier::Prod);
        assert_eq!(DistributionTier::parse("Stage"), DistributionTier::Stage);
        assert_eq!(DistributionTier::parse(" local "), DistributionTier::Local);
        assert_eq!(
            DistributionTier::parse("Custom"),
            DistributionTier::Other("Custom".into())
        );
        assert!(DistributionTier::Prod.is_hosted());
        assert!(!DistributionTier::Dev.is_hosted());
    }

    #[test]
    fn test_set_schema_version_replaces_scalar_section() {
        let mut cfg = ProjectConfig::default();
        cfg.set("drudock", "oops");
        cfg.set_schema_version("1.4");
        assert_eq!(cfg.schema_version().as_deref(), Some("1.4"));
        assert!(cfg.missing_keys().iter().all(|k| k != SCHEMA_VERSION_KEY));
    }
}
