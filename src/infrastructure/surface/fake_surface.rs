//! Fake Surface - 用于测试与演示的宿主界面
//!
//! 内存中的可编排界面模型：元素、控件、各类操作日志，
//! 以及可注入的写入失败。不依赖任何真实宿主技术。

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::application::ports::{
    ChangeNotification, ControlHandle, HostSurfaceError, HostSurfacePort, TargetHandle,
    TargetKind,
};

#[derive(Debug)]
struct FakeElement {
    id: u64,
    selectors: Vec<String>,
    kind: TargetKind,
    content: String,
    focused: bool,
}

#[derive(Debug)]
struct FakeControl {
    id: u64,
    label: String,
    visible: bool,
    invocations: usize,
}

#[derive(Debug, Default)]
struct SurfaceState {
    elements: Vec<FakeElement>,
    controls: Vec<FakeControl>,
    events: Vec<(u64, ChangeNotification)>,
    scrolled: Vec<u64>,
    notices: Vec<String>,
    fail_next_write: Option<String>,
}

/// 可编排的假宿主界面
#[derive(Default)]
pub struct FakeSurface {
    state: Mutex<SurfaceState>,
    next_id: AtomicU64,
}

impl FakeSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加一个元素，按插入顺序即视图顺序
    pub fn add_element(&self, selectors: &[&str], kind: TargetKind, focused: bool) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut state = self.lock();
        if focused {
            for el in &mut state.elements {
                el.focused = false;
            }
        }
        state.elements.push(FakeElement {
            id,
            selectors: selectors.iter().map(|s| s.to_string()).collect(),
            kind,
            content: String::new(),
            focused,
        });
        id
    }

    /// 添加一个可交互控件
    pub fn add_control(&self, label: &str, visible: bool) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.lock().controls.push(FakeControl {
            id,
            label: label.to_string(),
            visible,
            invocations: 0,
        });
        id
    }

    /// 移除元素（模拟单页应用重渲染）
    pub fn remove_element(&self, id: u64) {
        self.lock().elements.retain(|el| el.id != id);
    }

    /// 下一次写入返回给定错误
    pub fn fail_next_write(&self, message: &str) {
        self.lock().fail_next_write = Some(message.to_string());
    }

    pub fn content_of(&self, id: u64) -> Option<String> {
        self.lock()
            .elements
            .iter()
            .find(|el| el.id == id)
            .map(|el| el.content.clone())
    }

    /// 已发出的变更通知，按发出顺序
    pub fn events(&self) -> Vec<(u64, ChangeNotification)> {
        self.lock().events.clone()
    }

    pub fn scrolled(&self) -> Vec<u64> {
        self.lock().scrolled.clone()
    }

    pub fn invocations(&self, control_id: u64) -> usize {
        self.lock()
            .controls
            .iter()
            .find(|c| c.id == control_id)
            .map(|c| c.invocations)
            .unwrap_or(0)
    }

    pub fn notices(&self) -> Vec<String> {
        self.lock().notices.clone()
    }

    fn lock(&self) -> MutexGuard<'_, SurfaceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl HostSurfacePort for FakeSurface {
    fn query(&self, selector: &str) -> Option<TargetHandle> {
        self.lock()
            .elements
            .iter()
            .find(|el| el.selectors.iter().any(|s| s == selector))
            .map(|el| TargetHandle {
                id: el.id,
                kind: el.kind,
            })
    }

    fn focused_target(&self) -> Option<TargetHandle> {
        self.lock()
            .elements
            .iter()
            .find(|el| el.focused)
            .map(|el| TargetHandle {
                id: el.id,
                kind: el.kind,
            })
    }

    fn editable_targets(&self) -> Vec<TargetHandle> {
        self.lock()
            .elements
            .iter()
            .filter(|el| el.kind.is_editable())
            .map(|el| TargetHandle {
                id: el.id,
                kind: el.kind,
            })
            .collect()
    }

    fn read_content(&self, target: &TargetHandle) -> Option<String> {
        self.content_of(target.id)
    }

    fn write_content(
        &self,
        target: &TargetHandle,
        content: &str,
    ) -> Result<(), HostSurfaceError> {
        let mut state = self.lock();
        if let Some(message) = state.fail_next_write.take() {
            return Err(HostSurfaceError::WriteRejected(message));
        }
        let element = state
            .elements
            .iter_mut()
            .find(|el| el.id == target.id)
            .ok_or(HostSurfaceError::StaleTarget(target.id))?;
        element.content = content.to_string();
        Ok(())
    }

    fn emit(&self, target: &TargetHandle, notification: ChangeNotification) {
        self.lock().events.push((target.id, notification));
    }

    fn scroll_into_view(&self, target: &TargetHandle) {
        self.lock().scrolled.push(target.id);
    }

    fn interactive_controls(&self) -> Vec<ControlHandle> {
        self.lock()
            .controls
            .iter()
            .map(|c| ControlHandle {
                id: c.id,
                label: c.label.clone(),
                visible: c.visible,
            })
            .collect()
    }

    fn invoke_control(&self, control: &ControlHandle) {
        let mut state = self.lock();
        if let Some(c) = state.controls.iter_mut().find(|c| c.id == control.id) {
            c.invocations += 1;
            tracing::debug!(control_id = c.id, label = %c.label, "Control invoked");
        }
    }

    fn notify_user(&self, message: &str) {
        tracing::info!(message = %message, "User notice");
        self.lock().notices.push(message.to_string());
    }
}
