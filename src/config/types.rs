//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::collections::HashMap;

use crate::application::delivery::DEFAULT_SETTLE_DELAY_MS;
use crate::application::ports::{GlobalSettings, SiteSettings, SplitPatternSetting};
use crate::domain::{DEFAULT_MAX_LENGTH, DEFAULT_SPLIT_PATTERN};

/// 预置的分割规则选项；不在其中的规则视为用户自定义
pub const PRESET_SPLIT_PATTERNS: &[&str] = &["[。！？\\n]", "[。\\n]", "[\\n]"];

/// 应用主配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// 分割默认值
    #[serde(default)]
    pub defaults: SegmentDefaults,

    /// 投递配置
    #[serde(default)]
    pub delivery: DeliveryConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,

    /// 站点级覆盖，键为站点标识
    #[serde(default)]
    pub sites: HashMap<String, SiteSettings>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            defaults: SegmentDefaults::default(),
            delivery: DeliveryConfig::default(),
            log: LogConfig::default(),
            sites: HashMap::new(),
        }
    }
}

/// 分割默认值
#[derive(Debug, Clone, Deserialize)]
pub struct SegmentDefaults {
    /// 默认最大段落长度（字符数）
    #[serde(default = "default_max_length")]
    pub max_length: usize,

    /// 默认分割规则（正则）
    #[serde(default = "default_split_pattern")]
    pub split_pattern: String,
}

fn default_max_length() -> usize {
    DEFAULT_MAX_LENGTH
}

fn default_split_pattern() -> String {
    DEFAULT_SPLIT_PATTERN.to_string()
}

impl Default for SegmentDefaults {
    fn default() -> Self {
        Self {
            max_length: default_max_length(),
            split_pattern: default_split_pattern(),
        }
    }
}

impl SegmentDefaults {
    /// 转换为配置存储的全局记录
    pub fn to_global_settings(&self) -> GlobalSettings {
        GlobalSettings {
            default_max_length: self.max_length,
            default_split_pattern: SplitPatternSetting {
                value: self.split_pattern.clone(),
                custom: !PRESET_SPLIT_PATTERNS.contains(&self.split_pattern.as_str()),
            },
        }
    }
}

/// 投递配置
#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryConfig {
    /// 写入成功后是否自动触发确认控件
    #[serde(default = "default_auto_confirm")]
    pub auto_confirm: bool,

    /// settle delay（毫秒）：写入与触发确认之间的固定等待
    #[serde(default = "default_settle_delay")]
    pub settle_delay_ms: u64,
}

fn default_auto_confirm() -> bool {
    true
}

fn default_settle_delay() -> u64 {
    DEFAULT_SETTLE_DELAY_MS
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            auto_confirm: default_auto_confirm(),
            settle_delay_ms: default_settle_delay(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
