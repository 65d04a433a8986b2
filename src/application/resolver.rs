//! Target Resolver - 目标输入框解析
//!
//! 按优先级回退链查找最合适的可编辑元素。宿主界面可能在两次投递
//! 之间重建（单页应用重渲染），所以解析结果从不缓存，每次投递
//! 都重新执行。

use std::sync::Arc;

use crate::application::ports::{HostSurfacePort, TargetHandle};

/// 目标选择器列表
///
/// 从逗号分隔的字符串解析而来，按顺序尝试。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSpec {
    selectors: Vec<String>,
}

impl TargetSpec {
    /// 解析逗号分隔的选择器列表，空白项被丢弃
    pub fn parse(raw: &str) -> Self {
        Self {
            selectors: raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn selectors(&self) -> &[String] {
        &self.selectors
    }

    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }
}

/// 目标解析器
pub struct TargetResolver {
    surface: Arc<dyn HostSurfacePort>,
}

impl TargetResolver {
    pub fn new(surface: Arc<dyn HostSurfacePort>) -> Self {
        Self { surface }
    }

    /// 解析当前最佳目标
    ///
    /// 回退链（命中即返回）：
    /// 1. 按顺序尝试每个选择器，取第一个结构匹配
    /// 2. 当前焦点元素，若可编辑
    /// 3. 视图顺序中最后一个可编辑元素
    ///    （最近插入的可编辑区域通常就是激活的聊天输入框）
    /// 4. 都没有则返回 `None`
    pub fn resolve(&self, spec: &TargetSpec) -> Option<TargetHandle> {
        for selector in spec.selectors() {
            if let Some(target) = self.surface.query(selector) {
                tracing::debug!(selector = %selector, target_id = target.id, "Selector matched");
                return Some(target);
            }
        }

        if let Some(target) = self.surface.focused_target() {
            if target.kind.is_editable() {
                tracing::debug!(target_id = target.id, "Focused editable element used");
                return Some(target);
            }
        }

        let fallback = self.surface.editable_targets().into_iter().last();
        if let Some(target) = &fallback {
            tracing::debug!(target_id = target.id, "Last editable element used");
        }
        fallback
    }
}
