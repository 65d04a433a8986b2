//! Settings Store Port - 配置存储抽象
//!
//! 键值式配置存储的读取端口。核心只读取配置；
//! 写入属于设置界面，不经过这个端口。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 默认定时发送间隔（毫秒）
pub const DEFAULT_AUTO_SEND_INTERVAL_MS: u64 = 3000;

/// 分割规则设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitPatternSetting {
    /// 规则文本（正则）
    pub value: String,
    /// 是否为用户自定义规则（而非预置选项）
    #[serde(default)]
    pub custom: bool,
}

impl Default for SplitPatternSetting {
    fn default() -> Self {
        Self {
            value: crate::domain::DEFAULT_SPLIT_PATTERN.to_string(),
            custom: false,
        }
    }
}

/// 全局默认设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalSettings {
    #[serde(default = "default_max_length")]
    pub default_max_length: usize,

    #[serde(default)]
    pub default_split_pattern: SplitPatternSetting,
}

fn default_max_length() -> usize {
    crate::domain::DEFAULT_MAX_LENGTH
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            default_max_length: default_max_length(),
            default_split_pattern: SplitPatternSetting::default(),
        }
    }
}

/// 站点级设置
///
/// 每个字段都是可选覆盖，未设置的字段回退到全局默认。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSettings {
    /// 目标输入框选择器（逗号分隔的候选列表）
    #[serde(default)]
    pub input_selector: Option<String>,

    /// 分割规则
    #[serde(default)]
    pub split_pattern: Option<String>,

    /// 最大段落长度
    #[serde(default)]
    pub max_length: Option<usize>,

    /// 提示词模板
    #[serde(default)]
    pub prompt_template: Option<String>,

    /// 定时发送间隔（毫秒）
    #[serde(default)]
    pub auto_send_interval_ms: Option<u64>,
}

/// 配置存储错误
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("存储读取失败: {0}")]
    ReadError(String),

    #[error("记录格式无效: {0}")]
    Malformed(String),
}

/// Settings Store Port
#[async_trait]
pub trait SettingsStorePort: Send + Sync {
    /// 读取全局默认设置，记录不存在时返回默认值
    async fn fetch_global(&self) -> Result<GlobalSettings, StoreError>;

    /// 读取站点级设置，未配置的站点返回 `None`
    async fn fetch_site(&self, host: &str) -> Result<Option<SiteSettings>, StoreError>;
}
