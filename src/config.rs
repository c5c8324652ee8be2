use crate::error::{DailyPlantError, Result};
use dialoguer::{Input, Password};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const DB_FILE_NAME: &str = "plantdb.sqlite3";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub recognition: RecognitionConfig,
    #[serde(default)]
    pub camera: CameraConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Explicit path to the plant database; searched for when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Clone, Deserialize, Serialize)]
pub struct RecognitionConfig {
    pub api_key: String,
    pub secret_key: String,
    #[serde(default = "default_token_url")]
    pub token_url: String,
    #[serde(default = "default_classify_url")]
    pub classify_url: String,
    /// Number of encyclopedia entries requested per candidate.
    #[serde(default = "default_baike_num")]
    pub baike_num: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_token_url() -> String {
    "https://aip.baidubce.com/oauth/2.0/token".into()
}

fn default_classify_url() -> String {
    "https://aip.baidubce.com/rest/2.0/image-classify/v1/plant".into()
}

fn default_baike_num() -> u32 {
    1
}

fn default_timeout_secs() -> u64 {
    30
}

impl RecognitionConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.secret_key.is_empty()
    }
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            secret_key: String::new(),
            token_url: default_token_url(),
            classify_url: default_classify_url(),
            baike_num: default_baike_num(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for RecognitionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecognitionConfig")
            .field("api_key", &"[REDACTED]")
            .field("secret_key", &"[REDACTED]")
            .field("token_url", &self.token_url)
            .field("classify_url", &self.classify_url)
            .field("baike_num", &self.baike_num)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CameraConfig {
    /// Program that opens the camera, e.g. `cheese` or `microsoft.windows.camera:`.
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
    /// Directory the camera app saves pictures into.
    #[serde(default)]
    pub watch_dir: Option<PathBuf>,
    #[serde(default = "default_capture_timeout_secs")]
    pub capture_timeout_secs: u64,
}

fn default_capture_timeout_secs() -> u64 {
    5
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            command: None,
            args: Vec::new(),
            watch_dir: None,
            capture_timeout_secs: default_capture_timeout_secs(),
        }
    }
}

impl Config {
    pub fn load(config_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => p,
            None => Self::find_config_path()?,
        };

        if !config_path.exists() {
            return Err(DailyPlantError::Config(format!(
                "Config file not found at {:?}. Run `dailyplant init` to set up.",
                config_path
            )));
        }

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| DailyPlantError::Config(format!("Failed to read config: {}", e)))?;

        let config_str = Self::substitute_env_vars(&config_str);

        Self::from_yaml(&config_str)
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default(config_override: Option<PathBuf>) -> Result<Self> {
        if Self::exists(config_override.as_ref()) {
            Self::load(config_override)
        } else {
            tracing::info!("No config file found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| DailyPlantError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Search for config.yaml in standard locations.
    /// Returns the path of the first found config, or the XDG default path if none found.
    fn find_config_path() -> Result<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let default_path = Self::default_config_path()?;
        Ok(default_path)
    }

    pub fn exists(config_override: Option<&PathBuf>) -> bool {
        match config_override {
            Some(p) => p.exists(),
            None => Self::find_config_path()
                .map(|p| p.exists())
                .unwrap_or(false),
        }
    }

    /// Default path for writing new config files (~/.config/dailyplant/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| DailyPlantError::Config("Cannot determine config directory".into()))?
            .join("dailyplant");
        Ok(config_dir.join("config.yaml"))
    }

    /// Run interactive setup prompts and write config to disk.
    pub fn setup_interactive() -> Result<(Self, PathBuf)> {
        println!();
        println!("Let's set up DailyPlant!");
        println!();

        println!("Plant database (leave blank to search the usual places)");
        let db_path: String = Input::new()
            .with_prompt("  Path to plantdb.sqlite3")
            .default(String::new())
            .allow_empty(true)
            .interact_text()
            .map_err(|e| DailyPlantError::Config(format!("Input error: {}", e)))?;

        println!();

        println!("Plant recognition API (leave API key blank to skip)");
        let api_key: String = Input::new()
            .with_prompt("  API key")
            .default(String::new())
            .allow_empty(true)
            .interact_text()
            .map_err(|e| DailyPlantError::Config(format!("Input error: {}", e)))?;

        let secret_key = if api_key.is_empty() {
            String::new()
        } else {
            Password::new()
                .with_prompt("  Secret key")
                .allow_empty_password(true)
                .interact()
                .map_err(|e| DailyPlantError::Config(format!("Input error: {}", e)))?
        };

        println!();

        println!("Camera (leave command blank to disable photo capture)");
        let camera_command: String = Input::new()
            .with_prompt("  Camera command")
            .default(String::new())
            .allow_empty(true)
            .interact_text()
            .map_err(|e| DailyPlantError::Config(format!("Input error: {}", e)))?;

        println!();

        let config = Config {
            database: DatabaseConfig {
                path: (!db_path.is_empty()).then(|| PathBuf::from(db_path)),
            },
            recognition: RecognitionConfig {
                api_key,
                secret_key,
                ..Default::default()
            },
            camera: CameraConfig {
                command: (!camera_command.is_empty()).then_some(camera_command),
                ..Default::default()
            },
        };

        let config_path = Self::default_config_path()?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(&config)
            .map_err(|e| DailyPlantError::Config(format!("Failed to serialize config: {}", e)))?;

        let content = format!(
            "# DailyPlant Configuration\n# Generated by `dailyplant init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(&config_path, content)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    fn substitute_env_vars(content: &str) -> String {
        let mut result = content.to_string();

        let Ok(re) = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}") else {
            return result;
        };

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        result
    }

    pub fn data_dir(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        if let Some(dir) = data_dir_override {
            std::fs::create_dir_all(dir)?;
            return Ok(dir.clone());
        }

        if let Ok(dir) = std::env::var("DAILYPLANT_DATA_DIR") {
            let p = PathBuf::from(dir);
            std::fs::create_dir_all(&p)?;
            return Ok(p);
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| DailyPlantError::Config("Cannot determine data directory".into()))?
            .join("dailyplant");

        std::fs::create_dir_all(&data_dir)?;
        Ok(data_dir)
    }

    /// Resolve the plant database path.
    ///
    /// Priority: CLI override, config file, `DAILYPLANT_DB`, an existing
    /// `./plantdb.sqlite3`, then the data directory (created on demand).
    pub fn db_path(
        &self,
        db_override: Option<&PathBuf>,
        data_dir_override: Option<&PathBuf>,
    ) -> Result<PathBuf> {
        if let Some(p) = db_override {
            return Ok(p.clone());
        }

        if let Some(ref p) = self.database.path {
            return Ok(p.clone());
        }

        if let Ok(p) = std::env::var("DAILYPLANT_DB") {
            return Ok(PathBuf::from(p));
        }

        let local = PathBuf::from(DB_FILE_NAME);
        if local.exists() {
            tracing::debug!(path = %local.display(), "Using database in working directory");
            return Ok(local);
        }

        Ok(Self::data_dir(data_dir_override)?.join(DB_FILE_NAME))
    }

    pub fn log_path(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        Ok(Self::data_dir(data_dir_override)?.join("dailyplant.log"))
    }
}
