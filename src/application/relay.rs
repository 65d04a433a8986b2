//! Relay Service - 投递编排
//!
//! 把分割器、游标、目标解析、投递引擎和调度器串起来：
//! 读取配置存储得到生效设置，分割文本，然后按手动触发或
//! 定时调度逐段投递。游标是唯一的共享可变状态，由互斥锁保护；
//! 手动触发与定时调度共用游标，同时激活两者属于调用方责任。

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::application::delivery::{DeliveryEngine, DeliveryEngineConfig};
use crate::application::error::{DeliveryError, RelayError};
use crate::application::ports::{
    ClipboardPort, HostSurfacePort, SettingsStorePort, DEFAULT_AUTO_SEND_INTERVAL_MS,
};
use crate::application::resolver::{TargetResolver, TargetSpec};
use crate::application::scheduler::{AutoSendScheduler, DeliverNext};
use crate::domain::{segment, Segment, SegmentCursor, SegmentationOptions};

/// 全局默认与站点覆盖合并后的生效设置
#[derive(Debug, Clone)]
pub struct EffectiveSettings {
    pub max_length: usize,
    pub split_pattern: String,
    pub target_spec: TargetSpec,
    pub prompt_template: Option<String>,
    pub auto_send_interval: Duration,
}

/// 投递编排服务
pub struct RelayService {
    surface: Arc<dyn HostSurfacePort>,
    settings: Arc<dyn SettingsStorePort>,
    clipboard: Arc<dyn ClipboardPort>,
    resolver: TargetResolver,
    engine: DeliveryEngine,
    scheduler: AutoSendScheduler,
    cursor: tokio::sync::Mutex<SegmentCursor>,
    target_spec: Mutex<TargetSpec>,
    auto_send_interval: Mutex<Duration>,
}

impl RelayService {
    pub fn new(
        surface: Arc<dyn HostSurfacePort>,
        settings: Arc<dyn SettingsStorePort>,
        clipboard: Arc<dyn ClipboardPort>,
        engine_config: DeliveryEngineConfig,
    ) -> Self {
        Self {
            resolver: TargetResolver::new(surface.clone()),
            engine: DeliveryEngine::new(surface.clone(), engine_config),
            scheduler: AutoSendScheduler::new(),
            cursor: tokio::sync::Mutex::new(SegmentCursor::new()),
            target_spec: Mutex::new(TargetSpec::empty()),
            auto_send_interval: Mutex::new(Duration::from_millis(
                DEFAULT_AUTO_SEND_INTERVAL_MS,
            )),
            surface,
            settings,
            clipboard,
        }
    }

    /// 读取配置存储并合并出站点的生效设置
    pub async fn load_effective_settings(
        &self,
        host: &str,
    ) -> Result<EffectiveSettings, RelayError> {
        let global = self.settings.fetch_global().await?;
        let site = self.settings.fetch_site(host).await?.unwrap_or_default();

        let max_length = site.max_length.unwrap_or(global.default_max_length);
        let split_pattern = site
            .split_pattern
            .unwrap_or(global.default_split_pattern.value);
        let target_spec = site
            .input_selector
            .as_deref()
            .map(TargetSpec::parse)
            .unwrap_or_default();
        let auto_send_interval = Duration::from_millis(
            site.auto_send_interval_ms
                .unwrap_or(DEFAULT_AUTO_SEND_INTERVAL_MS),
        );

        Ok(EffectiveSettings {
            max_length,
            split_pattern,
            target_spec,
            prompt_template: site.prompt_template,
            auto_send_interval,
        })
    }

    /// 为 `host` 分割文本并装载游标
    ///
    /// 分割规则在这里编译，非法规则即时拒绝，分割本身不会失败。
    /// 返回段落数。
    pub async fn prepare(&self, host: &str, text: &str) -> Result<usize, RelayError> {
        let effective = self.load_effective_settings(host).await?;
        let options = SegmentationOptions::new(effective.max_length, &effective.split_pattern)?;

        let segments = segment(text, &options);
        let count = segments.len();

        {
            let mut cursor = self.cursor.lock().await;
            cursor.reset(segments);
            cursor.set_prompt_prefix(effective.prompt_template.clone());
        }
        *self.lock_spec() = effective.target_spec.clone();
        *self.lock_interval() = effective.auto_send_interval;

        tracing::info!(host = %host, count, max_length = effective.max_length, "Text segmented");
        Ok(count)
    }

    /// 当前装载的段落快照
    pub async fn segments(&self) -> Vec<Segment> {
        self.cursor.lock().await.segments().to_vec()
    }

    /// 尚未投递的段落数
    pub async fn remaining(&self) -> usize {
        self.cursor.lock().await.remaining()
    }

    /// 投递下一段，返回是否还有剩余
    ///
    /// 先解析目标再前进游标：解析失败不消耗段落，提示用户后返回
    /// `true`，定时调度下同一段会在下个周期重试，直到用户手动停止。
    /// 游标耗尽时提示完成并返回 `false`（终止信号）。
    /// 写入失败消耗该段落（写入已经发生，宿主状态不可知），
    /// 提示用户后继续。
    pub async fn deliver_next(&self) -> bool {
        {
            let cursor = self.cursor.lock().await;
            if cursor.is_exhausted() {
                tracing::info!("All segments delivered");
                self.surface.notify_user("所有段落已填充完毕");
                return false;
            }
        }

        let spec = self.lock_spec().clone();
        let Some(target) = self.resolver.resolve(&spec) else {
            let err = DeliveryError::TargetNotFound;
            tracing::warn!("{}", err);
            self.surface.notify_user(&err.to_string());
            return true;
        };

        let Some(next) = self.cursor.lock().await.next_with_prefix() else {
            return false;
        };

        match self.engine.deliver(&target, &next.content).await {
            Ok(()) => {
                tracing::info!(
                    segment_id = next.id,
                    chars = next.content.chars().count(),
                    "Segment delivered"
                );
                true
            }
            Err(err) => {
                tracing::warn!(segment_id = next.id, error = %err, "Delivery failed");
                self.surface.notify_user(&err.to_string());
                true
            }
        }
    }

    /// 复制下一段到剪贴板（投递之外的备用通路）
    ///
    /// 游标耗尽时返回 `Ok(None)`。
    pub async fn copy_next(&self) -> Result<Option<Segment>, RelayError> {
        let next = self.cursor.lock().await.next_with_prefix();
        let Some(next) = next else {
            self.surface.notify_user("所有段落已复制完毕");
            return Ok(None);
        };

        self.clipboard.copy(&next.content).await?;
        tracing::info!(segment_id = next.id, "Segment copied");
        Ok(Some(next))
    }

    /// 按生效设置的间隔启动定时投递
    pub fn start_auto_send(self: Arc<Self>) {
        let interval = *self.lock_interval();
        self.start_auto_send_with(interval);
    }

    /// 按指定间隔启动定时投递
    pub fn start_auto_send_with(self: Arc<Self>, interval: Duration) {
        let deliver: Arc<dyn DeliverNext> = self.clone();
        self.scheduler.start(deliver, interval);
    }

    pub fn stop_auto_send(&self) {
        self.scheduler.stop();
    }

    pub fn auto_send_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// 生效的定时发送间隔
    pub fn auto_send_interval(&self) -> Duration {
        *self.lock_interval()
    }

    fn lock_spec(&self) -> std::sync::MutexGuard<'_, TargetSpec> {
        self.target_spec.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_interval(&self) -> std::sync::MutexGuard<'_, Duration> {
        self.auto_send_interval
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl DeliverNext for RelayService {
    async fn deliver_next(&self) -> bool {
        RelayService::deliver_next(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{ChangeNotification, TargetKind};
    use crate::infrastructure::memory::{InMemoryClipboard, InMemorySettingsStore};
    use crate::infrastructure::surface::FakeSurface;
    use crate::application::ports::{GlobalSettings, SiteSettings, SplitPatternSetting};

    struct Fixture {
        surface: Arc<FakeSurface>,
        store: Arc<InMemorySettingsStore>,
        clipboard: Arc<InMemoryClipboard>,
        relay: Arc<RelayService>,
    }

    fn fixture(auto_confirm: bool) -> Fixture {
        let surface = Arc::new(FakeSurface::new());
        let store = Arc::new(InMemorySettingsStore::new());
        let clipboard = Arc::new(InMemoryClipboard::new());
        let relay = Arc::new(RelayService::new(
            surface.clone(),
            store.clone(),
            clipboard.clone(),
            DeliveryEngineConfig {
                auto_confirm,
                settle_delay_ms: 300,
            },
        ));
        Fixture {
            surface,
            store,
            clipboard,
            relay,
        }
    }

    fn seed_site(store: &InMemorySettingsStore, host: &str, site: SiteSettings) {
        store.seed_site(host, &site).unwrap();
    }

    #[tokio::test]
    async fn test_prepare_merges_site_overrides() {
        let f = fixture(false);
        f.store
            .seed_global(&GlobalSettings {
                default_max_length: 2000,
                default_split_pattern: SplitPatternSetting::default(),
            })
            .unwrap();
        seed_site(
            &f.store,
            "chat.example.com",
            SiteSettings {
                input_selector: Some(".ql-editor, [contenteditable]".to_string()),
                split_pattern: Some("[。]".to_string()),
                max_length: Some(1),
                prompt_template: Some("请继续:".to_string()),
                auto_send_interval_ms: Some(500),
            },
        );

        let count = f.relay.prepare("chat.example.com", "甲。乙。").await.unwrap();
        assert_eq!(count, 2);
        assert_eq!(f.relay.auto_send_interval(), Duration::from_millis(500));

        let segments = f.relay.segments().await;
        assert_eq!(segments[0].content, "甲。");
    }

    #[tokio::test]
    async fn test_prepare_rejects_invalid_site_pattern() {
        let f = fixture(false);
        seed_site(
            &f.store,
            "bad.example.com",
            SiteSettings {
                split_pattern: Some("[未闭合".to_string()),
                ..Default::default()
            },
        );

        let err = f.relay.prepare("bad.example.com", "文本。").await.unwrap_err();
        assert!(matches!(err, RelayError::Segment(_)));
    }

    #[tokio::test]
    async fn test_deliver_next_writes_prefixed_content() {
        let f = fixture(false);
        let id = f.surface.add_element(&["textarea"], TargetKind::TextField, false);
        seed_site(
            &f.store,
            "demo",
            SiteSettings {
                input_selector: Some("textarea".to_string()),
                split_pattern: Some("[。]".to_string()),
                max_length: Some(1),
                prompt_template: Some("前缀:".to_string()),
                ..Default::default()
            },
        );
        f.relay.prepare("demo", "甲。乙。").await.unwrap();

        assert!(f.relay.deliver_next().await);
        assert_eq!(f.surface.content_of(id).unwrap(), "前缀:甲。");
        assert_eq!(
            f.surface.events(),
            vec![
                (id, ChangeNotification::ValueChanged),
                (id, ChangeNotification::ContentCommitted),
            ]
        );
    }

    #[tokio::test]
    async fn test_exhaustion_returns_false_and_notifies() {
        let f = fixture(false);
        f.surface.add_element(&["textarea"], TargetKind::TextField, false);
        seed_site(
            &f.store,
            "demo",
            SiteSettings {
                input_selector: Some("textarea".to_string()),
                split_pattern: Some("[。]".to_string()),
                max_length: Some(1),
                ..Default::default()
            },
        );
        f.relay.prepare("demo", "唯一一段。").await.unwrap();

        assert!(f.relay.deliver_next().await);
        assert!(!f.relay.deliver_next().await);
        assert!(f
            .surface
            .notices()
            .iter()
            .any(|n| n.contains("所有段落已填充完毕")));
    }

    #[tokio::test]
    async fn test_resolution_failure_does_not_consume_segment() {
        // 没有任何可编辑元素：解析失败，段落保留，下个周期重试
        let f = fixture(false);
        seed_site(
            &f.store,
            "demo",
            SiteSettings {
                split_pattern: Some("[。]".to_string()),
                max_length: Some(1),
                ..Default::default()
            },
        );
        f.relay.prepare("demo", "甲。乙。").await.unwrap();

        assert!(f.relay.deliver_next().await);
        assert!(f.relay.deliver_next().await);
        assert_eq!(f.relay.remaining().await, 2);
        assert!(f.surface.notices().iter().any(|n| n.contains("未找到")));

        // 输入框出现后从第一段继续
        let id = f.surface.add_element(&["textarea"], TargetKind::TextField, false);
        assert!(f.relay.deliver_next().await);
        assert_eq!(f.surface.content_of(id).unwrap(), "甲。");
    }

    #[tokio::test]
    async fn test_write_failure_consumes_segment_and_continues() {
        let f = fixture(false);
        let id = f.surface.add_element(&["textarea"], TargetKind::TextField, false);
        seed_site(
            &f.store,
            "demo",
            SiteSettings {
                input_selector: Some("textarea".to_string()),
                split_pattern: Some("[。]".to_string()),
                max_length: Some(1),
                ..Default::default()
            },
        );
        f.relay.prepare("demo", "甲。乙。").await.unwrap();

        f.surface.fail_next_write("节点只读");
        assert!(f.relay.deliver_next().await);
        assert_eq!(f.relay.remaining().await, 1);
        assert!(f.surface.notices().iter().any(|n| n.contains("填充失败")));

        assert!(f.relay.deliver_next().await);
        assert_eq!(f.surface.content_of(id).unwrap(), "乙。");
    }

    #[tokio::test]
    async fn test_copy_next_passes_through_clipboard() {
        let f = fixture(false);
        seed_site(
            &f.store,
            "demo",
            SiteSettings {
                split_pattern: Some("[。]".to_string()),
                max_length: Some(1),
                ..Default::default()
            },
        );
        f.relay.prepare("demo", "甲。乙。").await.unwrap();

        let copied = f.relay.copy_next().await.unwrap().unwrap();
        assert_eq!(copied.content, "甲。");
        assert_eq!(f.clipboard.copied(), vec!["甲。".to_string()]);

        f.relay.copy_next().await.unwrap();
        assert!(f.relay.copy_next().await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_send_delivers_all_then_stops() {
        let f = fixture(false);
        let id = f.surface.add_element(&["textarea"], TargetKind::TextField, false);
        seed_site(
            &f.store,
            "demo",
            SiteSettings {
                input_selector: Some("textarea".to_string()),
                split_pattern: Some("[。]".to_string()),
                max_length: Some(1),
                auto_send_interval_ms: Some(100),
                ..Default::default()
            },
        );
        f.relay.prepare("demo", "甲。乙。丙。").await.unwrap();

        f.relay.clone().start_auto_send();
        assert!(f.relay.auto_send_running());

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert!(!f.relay.auto_send_running());
        assert_eq!(f.relay.remaining().await, 0);
        // 最后一次写入的是第三段
        assert_eq!(f.surface.content_of(id).unwrap(), "丙。");
    }

    #[tokio::test]
    async fn test_unknown_site_uses_global_defaults() {
        let f = fixture(false);
        f.surface.add_element(&[], TargetKind::RichText, false);

        // 未配置的站点：全局默认规则 + 空选择器列表
        let count = f.relay.prepare("unknown.example.com", "第一句。第二句。").await.unwrap();
        assert_eq!(count, 1); // 默认 max_length 2000，两句累积为一段

        assert!(f.relay.deliver_next().await);
        assert_eq!(
            f.relay.auto_send_interval(),
            Duration::from_millis(DEFAULT_AUTO_SEND_INTERVAL_MS)
        );
    }
}
