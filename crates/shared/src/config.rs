//! 配置管理模块
//!
//! 支持多格式配置文件加载，环境变量覆盖，以及类型安全的配置访问。

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// 可观测性配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub log_level: String,
    /// 日志输出格式：json（结构化）或 pretty（人类可读）
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

impl ObservabilityConfig {
    /// 是否输出 JSON 格式日志
    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }
}

/// 奖励引擎配置
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RewardsConfig {
    /// 等级与徽章目录文件路径，None 表示使用内置目录
    pub catalog_path: Option<String>,
}

impl RewardsConfig {
    pub fn catalog_path(&self) -> Option<PathBuf> {
        self.catalog_path
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub service_name: String,
    pub environment: String,
    pub observability: ObservabilityConfig,
    pub rewards: RewardsConfig,
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    ///
    /// 加载顺序（后加载的会覆盖先加载的同名配置项）：
    /// 1. config/default.toml（默认配置）
    /// 2. config/{environment}.toml（环境特定配置）
    /// 3. config/{service_name}.toml（服务特定配置）
    /// 4. 环境变量（SEFTEC_ 前缀，如 SEFTEC_REWARDS__CATALOG_PATH -> rewards.catalog_path）
    pub fn load(service_name: &str) -> Result<Self, ConfigError> {
        // .env 文件仅用于本地开发，不存在时忽略
        let _ = dotenvy::dotenv();

        let env = std::env::var("SEFTEC_ENV").unwrap_or_else(|_| "development".to_string());
        let config_dir = std::env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

        Self::load_from(Path::new(&config_dir), service_name, &env)
    }

    /// 从指定目录加载配置，不读取 SEFTEC_ENV / CONFIG_DIR
    pub fn load_from(config_dir: &Path, service_name: &str, env: &str) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .set_default("service_name", service_name)?
            .set_default("environment", env)?
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            .add_source(File::from(config_dir.join(format!("{}.toml", env))).required(false))
            .add_source(
                File::from(config_dir.join(format!("{}.toml", service_name))).required(false),
            )
            // 双下划线分隔嵌套层级，避免与 catalog_path 这类字段名冲突
            .add_source(
                Environment::with_prefix("SEFTEC")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.observability.log_level, "info");
        assert!(!config.observability.json_logs());
        assert!(config.rewards.catalog_path().is_none());
    }

    #[test]
    fn test_load_without_files_uses_defaults() {
        let dir = std::env::temp_dir().join("seftec-config-missing-dir");
        let config = AppConfig::load_from(&dir, "rewards-cli", "test").unwrap();

        assert_eq!(config.service_name, "rewards-cli");
        assert_eq!(config.environment, "test");
        assert_eq!(config.observability.log_format, "pretty");
        assert!(!config.is_production());
    }

    #[test]
    fn test_load_layers_service_file_over_default() {
        let dir = std::env::temp_dir().join(format!("seftec-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("default.toml"),
            "[observability]\nlog_level = \"warn\"\n\n[rewards]\ncatalog_path = \"config/catalog.toml\"\n",
        )
        .unwrap();
        std::fs::write(
            dir.join("rewards-cli.toml"),
            "[observability]\nlog_level = \"debug\"\nlog_format = \"json\"\n",
        )
        .unwrap();

        let config = AppConfig::load_from(&dir, "rewards-cli", "test").unwrap();
        assert_eq!(config.observability.log_level, "debug");
        assert!(config.observability.json_logs());
        assert_eq!(
            config.rewards.catalog_path(),
            Some(PathBuf::from("config/catalog.toml"))
        );

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_blank_catalog_path_is_ignored() {
        let rewards = RewardsConfig {
            catalog_path: Some("   ".to_string()),
        };
        assert!(rewards.catalog_path().is_none());
    }
}
