//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;
use crate::domain::SegmentationOptions;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `SEGFILL_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `SEGFILL_DEFAULTS__MAX_LENGTH=800`
/// - `SEGFILL_DELIVERY__AUTO_CONFIRM=false`
/// - `SEGFILL_LOG__LEVEL=debug`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 首先设置默认值（最低优先级）
    builder = builder
        .set_default("defaults.max_length", 2000)?
        .set_default("defaults.split_pattern", "[。！？\\n]")?
        .set_default("delivery.auto_confirm", true)?
        .set_default("delivery.settle_delay_ms", 300)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 添加配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 添加环境变量（最高优先级）
    // 前缀: SEGFILL_
    // 层级分隔符: __ (双下划线)
    builder = builder.add_source(
        Environment::with_prefix("SEGFILL")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // 4. 构建配置
    let config = builder.build()?;

    // 5. 反序列化为 AppConfig
    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::ParseError(format!("Failed to deserialize config: {}", e)))?;

    // 6. 验证配置
    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
///
/// 分割规则在这里预编译一次，非法的正则在启动时报错，
/// 而不是等到第一次分割。
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.defaults.max_length == 0 {
        return Err(ConfigError::ValidationError(
            "defaults.max_length cannot be 0".to_string(),
        ));
    }

    SegmentationOptions::new(config.defaults.max_length, &config.defaults.split_pattern)
        .map_err(|e| {
            ConfigError::ValidationError(format!("defaults.split_pattern: {}", e))
        })?;

    for (host, site) in &config.sites {
        if let Some(pattern) = &site.split_pattern {
            SegmentationOptions::new(site.max_length.unwrap_or(1), pattern).map_err(|e| {
                ConfigError::ValidationError(format!("sites.{}.split_pattern: {}", host, e))
            })?;
        }
        if site.auto_send_interval_ms == Some(0) {
            return Err(ConfigError::ValidationError(format!(
                "sites.{}.auto_send_interval_ms cannot be 0",
                host
            )));
        }
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Default Max Length: {}", config.defaults.max_length);
    tracing::info!("Default Split Pattern: {}", config.defaults.split_pattern);
    tracing::info!("Auto Confirm: {}", config.delivery.auto_confirm);
    tracing::info!("Settle Delay: {}ms", config.delivery.settle_delay_ms);
    tracing::info!("Configured Sites: {}", config.sites.len());
    for host in config.sites.keys() {
        tracing::info!("  - {}", host);
    }
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.defaults.max_length, 2000);
        assert!(config.delivery.auto_confirm);
    }

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_max_length() {
        let mut config = AppConfig::default();
        config.defaults.max_length = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_invalid_pattern() {
        let mut config = AppConfig::default();
        config.defaults.split_pattern = "[未闭合".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_invalid_site_pattern() {
        let mut config = AppConfig::default();
        config.sites.insert(
            "bad.example.com".to_string(),
            crate::application::ports::SiteSettings {
                split_pattern: Some("(".to_string()),
                ..Default::default()
            },
        );
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_site_interval() {
        let mut config = AppConfig::default();
        config.sites.insert(
            "slow.example.com".to_string(),
            crate::application::ports::SiteSettings {
                auto_send_interval_ms: Some(0),
                ..Default::default()
            },
        );
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            r#"
[defaults]
max_length = 500
split_pattern = "[\\n]"

[delivery]
auto_confirm = false

[sites."gemini.google.com"]
input_selector = ".ql-editor, [contenteditable]"
prompt_template = "请继续分析以下文本:\n\n"
auto_send_interval_ms = 5000
"#
        )
        .unwrap();

        let config = load_config_from_path(Some(file.path())).unwrap();
        assert_eq!(config.defaults.max_length, 500);
        assert_eq!(config.defaults.split_pattern, "[\\n]");
        assert!(!config.delivery.auto_confirm);
        // 未设置的字段保持默认
        assert_eq!(config.delivery.settle_delay_ms, 300);

        let site = &config.sites["gemini.google.com"];
        assert_eq!(
            site.input_selector.as_deref(),
            Some(".ql-editor, [contenteditable]")
        );
        assert_eq!(site.auto_send_interval_ms, Some(5000));
        assert!(site.max_length.is_none());
    }

    #[test]
    fn test_invalid_file_pattern_rejected_at_load() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            r#"
[defaults]
split_pattern = "[未闭合"
"#
        )
        .unwrap();

        let err = load_config_from_path(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }
}
