use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Process configuration, loaded once from `punchsync.conf` (YAML).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default)]
    pub sync: SyncSettings,
}

/// Settings that drive a sync cycle. Passed explicitly into every entry point.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncSettings {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_logs_directory")]
    pub logs_directory: String,
    /// Punches dated before this day are never imported.
    #[serde(default)]
    pub import_start_date: Option<NaiveDate>,
    #[serde(default)]
    pub ignore_employee_not_found: bool,
    #[serde(default)]
    pub ignore_inactive_employee: bool,
    #[serde(default)]
    pub ignore_duplicate_checkin: bool,
}

fn default_enabled() -> bool {
    true
}
fn default_logs_directory() -> String {
    Config::config_dir()
        .join("logs")
        .to_string_lossy()
        .to_string()
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            logs_directory: default_logs_directory(),
            import_start_date: None,
            ignore_employee_not_found: false,
            ignore_inactive_employee: false,
            ignore_duplicate_checkin: false,
        }
    }
}

impl SyncSettings {
    /// Resolved logs directory (`~/` expanded).
    pub fn logs_path(&self) -> PathBuf {
        expand_tilde(&self.logs_directory)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            sync: SyncSettings::default(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("punchsync")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".punchsync")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("punchsync.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("punchsync.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Write configuration to `path` as YAML.
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let mut file = fs::File::create(path)?;
        file.write_all(yaml.as_bytes())?;
        Ok(())
    }

    /// Initialize configuration and database files.
    /// Returns the database path that was configured.
    pub fn init_all(custom_db: Option<&str>, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB name: user provided or default
        let db_path = match custom_db {
            Some(name) => {
                let p = Path::new(name);
                if p.is_absolute() {
                    p.to_path_buf()
                } else {
                    dir.join(p)
                }
            }
            None => Self::database_file(),
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            sync: SyncSettings::default(),
        };

        // Test mode never touches the user's config file
        if !is_test {
            config.save_to(&Self::config_file())?;
        }

        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        Ok(db_path)
    }
}
