use crate::utils::error::{Result, SchoolError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_REGISTRY_NAME: &str = "schools";
pub const LOG_FORMATS: [&str; 2] = ["compact", "json"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default)]
    pub registry: RegistrySettings,
    #[serde(default)]
    pub query: QueryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrySettings {
    #[serde(default = "default_registry_name")]
    pub name: String,
    /// 同一 (name, address) 的新增請求是否序列化處理
    #[serde(default = "default_true")]
    pub serialize_creates: bool,
    pub seed_file: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryConfig {
    pub default_radius_km: Option<f64>,
    pub default_limit: Option<usize>,
    pub max_limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_registry_name() -> String {
    DEFAULT_REGISTRY_NAME.to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "school_locator=info".to_string()
}

fn default_log_format() -> String {
    "compact".to_string()
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            name: default_registry_name(),
            serialize_creates: true,
            seed_file: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl RegistryConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SchoolError::Config {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SEED_FILE})，未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SchoolError::Config {
            field: "toml_parsing".to_string(),
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("registry.name", &self.registry.name)?;

        if let Some(seed_file) = &self.registry.seed_file {
            validation::validate_path("registry.seed_file", seed_file)?;
        }

        if let Some(radius) = self.query.default_radius_km {
            validation::validate_positive_distance("query.default_radius_km", radius)?;
        }

        if let Some(limit) = self.query.default_limit {
            validation::validate_positive_number("query.default_limit", limit, 1)?;
        }

        if let Some(max_limit) = self.query.max_limit {
            validation::validate_positive_number("query.max_limit", max_limit, 1)?;
            if let Some(limit) = self.query.default_limit {
                if limit > max_limit {
                    return Err(SchoolError::Config {
                        field: "query.default_limit".to_string(),
                        message: format!(
                            "default_limit {} exceeds max_limit {}",
                            limit, max_limit
                        ),
                    });
                }
            }
        }

        validation::validate_non_empty_string("logging.level", &self.logging.level)?;
        validation::validate_one_of("logging.format", &self.logging.format, &LOG_FORMATS)?;

        Ok(())
    }

    pub fn serialize_creates(&self) -> bool {
        self.registry.serialize_creates
    }

    pub fn seed_file(&self) -> Option<&str> {
        self.registry.seed_file.as_deref()
    }
}

impl Validate for RegistryConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
