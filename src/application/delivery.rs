//! Delivery Engine - 段落投递
//!
//! 把段落内容写入已解析的目标，补发合成变更通知，
//! 可选地在固定等待后触发确认控件（发送按钮）。

use std::sync::Arc;
use std::time::Duration;

use crate::application::error::DeliveryError;
use crate::application::ports::{
    ChangeNotification, ControlHandle, HostSurfacePort, TargetHandle, TargetKind,
};

/// 确认控件的标签关键词（大小写不敏感的子串匹配）
pub const CONFIRM_KEYWORDS: &[&str] = &["发送", "send", "submit", "enter", "go"];

/// 默认 settle delay（毫秒）：写入与触发确认之间的固定等待，
/// 给宿主的响应式更新留出处理时间
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 300;

/// 投递引擎配置
#[derive(Debug, Clone)]
pub struct DeliveryEngineConfig {
    /// 写入成功后是否自动触发确认控件
    pub auto_confirm: bool,
    /// settle delay（毫秒）
    pub settle_delay_ms: u64,
}

impl Default for DeliveryEngineConfig {
    fn default() -> Self {
        Self {
            auto_confirm: true,
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
        }
    }
}

/// 投递引擎
pub struct DeliveryEngine {
    surface: Arc<dyn HostSurfacePort>,
    config: DeliveryEngineConfig,
}

impl DeliveryEngine {
    pub fn new(surface: Arc<dyn HostSurfacePort>, config: DeliveryEngineConfig) -> Self {
        Self { surface, config }
    }

    /// 将内容写入目标
    ///
    /// 普通文本输入：覆写值并补发「值已变化」「内容已提交」两个通知，
    /// 只做属性赋值对响应式框架不可见，补发通知是必需的副作用。
    /// 富文本区域：覆写内容并只补发「值已变化」。
    /// 其他类型拒绝写入。
    ///
    /// 写入成功后平滑滚动到目标；若开启自动确认，
    /// 在 settle delay 之后触发匹配到的确认控件，结果不回传。
    pub async fn deliver(
        &self,
        target: &TargetHandle,
        content: &str,
    ) -> Result<(), DeliveryError> {
        match target.kind {
            TargetKind::TextField => {
                self.surface.write_content(target, content)?;
                self.surface.emit(target, ChangeNotification::ValueChanged);
                self.surface.emit(target, ChangeNotification::ContentCommitted);
            }
            TargetKind::RichText => {
                self.surface.write_content(target, content)?;
                self.surface.emit(target, ChangeNotification::ValueChanged);
            }
            TargetKind::Other => {
                return Err(DeliveryError::UnsupportedTargetKind(target.kind));
            }
        }

        self.surface.scroll_into_view(target);
        tracing::debug!(
            target_id = target.id,
            kind = ?target.kind,
            chars = content.chars().count(),
            "Content delivered"
        );

        if self.config.auto_confirm {
            self.schedule_confirm();
        }

        Ok(())
    }

    /// 在可见控件中查找标签命中关键词的确认控件
    pub fn find_confirm_control(&self) -> Option<ControlHandle> {
        self.surface
            .interactive_controls()
            .into_iter()
            .filter(|c| c.visible)
            .find(|c| {
                let label = c.label.to_lowercase();
                CONFIRM_KEYWORDS.iter().any(|kw| label.contains(kw))
            })
    }

    /// settle delay 后触发确认控件，不等待也不观察结果
    fn schedule_confirm(&self) {
        let Some(control) = self.find_confirm_control() else {
            tracing::debug!("No confirm control found");
            return;
        };

        let surface = self.surface.clone();
        let delay = Duration::from_millis(self.config.settle_delay_ms);
        tracing::debug!(control_id = control.id, label = %control.label, "Confirm scheduled");
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            surface.invoke_control(&control);
        });
    }
}
