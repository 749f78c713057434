use crate::error::{PlanoError, Result};
use crate::paths;
use crate::program::DEFAULT_PROGRAMS_PER_UNIT;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// StorageConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// redb file of JSON documents.
    #[default]
    Document,
    /// SQLite tables.
    Sql,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Backend::Document => "document",
            Backend::Sql => "sql",
        })
    }
}

impl std::str::FromStr for Backend {
    type Err = PlanoError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "document" => Ok(Backend::Document),
            "sql" => Ok(Backend::Sql),
            _ => Err(PlanoError::Validation(format!(
                "unknown storage backend '{s}' (expected document or sql)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: Backend,
}

// ---------------------------------------------------------------------------
// LimitsConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_programs_per_unit")]
    pub programs_per_unit: usize,
}

fn default_programs_per_unit() -> usize {
    DEFAULT_PROGRAMS_PER_UNIT
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            programs_per_unit: default_programs_per_unit(),
        }
    }
}

// ---------------------------------------------------------------------------
// AutomationConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomationConfig {
    /// Flip `delayed` back to `in_progress` when the end date is no longer
    /// in the past. This also overrides a `delayed` set by hand.
    #[serde(default = "default_revert_delayed")]
    pub revert_delayed: bool,
}

fn default_revert_delayed() -> bool {
    true
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            revert_delayed: default_revert_delayed(),
        }
    }
}

// ---------------------------------------------------------------------------
// AlertsConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatcherKind {
    /// Name containment, ignoring case and accents. Deprecated.
    #[default]
    Fuzzy,
    /// `responsible_id == user.id`.
    Id,
}

impl std::str::FromStr for MatcherKind {
    type Err = PlanoError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "fuzzy" => Ok(MatcherKind::Fuzzy),
            "id" => Ok(MatcherKind::Id),
            _ => Err(PlanoError::Validation(format!(
                "unknown matcher '{s}' (expected fuzzy or id)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertsConfig {
    #[serde(default)]
    pub matcher: MatcherKind,
}

// ---------------------------------------------------------------------------
// ProjectConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    pub project: ProjectConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub automation: AutomationConfig,
    #[serde(default)]
    pub alerts: AlertsConfig,
}

fn default_version() -> u32 {
    1
}

impl Config {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            version: 1,
            project: ProjectConfig {
                name: project_name.into(),
                description: None,
            },
            storage: StorageConfig::default(),
            limits: LimitsConfig::default(),
            automation: AutomationConfig::default(),
            alerts: AlertsConfig::default(),
        }
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(PlanoError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.project.name.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "project.name is empty".to_string(),
            });
        }

        if self.limits.programs_per_unit == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "limits.programs_per_unit is 0: no program can be created".to_string(),
            });
        } else if self.limits.programs_per_unit > 20 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "limits.programs_per_unit={} (>20 is unusual)",
                    self.limits.programs_per_unit
                ),
            });
        }

        if self.alerts.matcher == MatcherKind::Fuzzy {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "alerts.matcher 'fuzzy' matches responsible names loosely; \
                          prefer 'id' once actions carry responsible_id"
                    .to_string(),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
