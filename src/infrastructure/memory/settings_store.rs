//! In-Memory Settings Store - 键值配置存储的内存实现
//!
//! 记录以 JSON 值存放，键形如 `settings` / `site:{host}`，
//! 与原生键值存储的无模式语义保持一致。
//! 端口是只读的；写入（seed_*）留给设置界面和测试使用。

use async_trait::async_trait;
use dashmap::DashMap;

use crate::application::ports::{
    GlobalSettings, SettingsStorePort, SiteSettings, StoreError,
};

const GLOBAL_KEY: &str = "settings";

fn site_key(host: &str) -> String {
    format!("site:{}", host)
}

/// 内存配置存储
#[derive(Default)]
pub struct InMemorySettingsStore {
    records: DashMap<String, serde_json::Value>,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入全局默认设置
    pub fn seed_global(&self, settings: &GlobalSettings) -> Result<(), StoreError> {
        let value = serde_json::to_value(settings)
            .map_err(|e| StoreError::Malformed(e.to_string()))?;
        self.records.insert(GLOBAL_KEY.to_string(), value);
        Ok(())
    }

    /// 写入站点级设置
    pub fn seed_site(&self, host: &str, settings: &SiteSettings) -> Result<(), StoreError> {
        let value = serde_json::to_value(settings)
            .map_err(|e| StoreError::Malformed(e.to_string()))?;
        self.records.insert(site_key(host), value);
        Ok(())
    }

    /// 写入任意原始记录（测试坏数据用）
    #[cfg(test)]
    pub fn seed_raw(&self, key: &str, value: serde_json::Value) {
        self.records.insert(key.to_string(), value);
    }
}

#[async_trait]
impl SettingsStorePort for InMemorySettingsStore {
    async fn fetch_global(&self) -> Result<GlobalSettings, StoreError> {
        match self.records.get(GLOBAL_KEY) {
            Some(value) => serde_json::from_value(value.clone())
                .map_err(|e| StoreError::Malformed(e.to_string())),
            None => Ok(GlobalSettings::default()),
        }
    }

    async fn fetch_site(&self, host: &str) -> Result<Option<SiteSettings>, StoreError> {
        match self.records.get(&site_key(host)) {
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| StoreError::Malformed(e.to_string())),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::SplitPatternSetting;
    use crate::domain::DEFAULT_MAX_LENGTH;

    #[tokio::test]
    async fn test_fetch_global_defaults_when_absent() {
        let store = InMemorySettingsStore::new();
        let global = store.fetch_global().await.unwrap();

        assert_eq!(global.default_max_length, DEFAULT_MAX_LENGTH);
        assert!(!global.default_split_pattern.custom);
    }

    #[tokio::test]
    async fn test_seed_and_fetch_global() {
        let store = InMemorySettingsStore::new();
        store
            .seed_global(&GlobalSettings {
                default_max_length: 800,
                default_split_pattern: SplitPatternSetting {
                    value: "[\\n]".to_string(),
                    custom: false,
                },
            })
            .unwrap();

        let global = store.fetch_global().await.unwrap();
        assert_eq!(global.default_max_length, 800);
        assert_eq!(global.default_split_pattern.value, "[\\n]");
    }

    #[tokio::test]
    async fn test_fetch_unknown_site_is_none() {
        let store = InMemorySettingsStore::new();
        assert!(store.fetch_site("unknown.example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_seed_and_fetch_site() {
        let store = InMemorySettingsStore::new();
        store
            .seed_site(
                "gemini.google.com",
                &SiteSettings {
                    input_selector: Some(".ql-editor, [contenteditable]".to_string()),
                    max_length: Some(1500),
                    ..Default::default()
                },
            )
            .unwrap();

        let site = store.fetch_site("gemini.google.com").await.unwrap().unwrap();
        assert_eq!(
            site.input_selector.as_deref(),
            Some(".ql-editor, [contenteditable]")
        );
        assert_eq!(site.max_length, Some(1500));
        assert!(site.prompt_template.is_none());
    }

    #[tokio::test]
    async fn test_malformed_record_surfaces_store_error() {
        let store = InMemorySettingsStore::new();
        store.seed_raw("settings", serde_json::json!({ "default_max_length": "不是数字" }));

        let err = store.fetch_global().await.unwrap_err();
        assert!(matches!(err, StoreError::Malformed(_)));
    }
}
