//! In-Memory Clipboard - 剪贴板的内存实现
//!
//! 记录每次复制的文本，供测试断言与演示输出。

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::application::ports::{ClipboardError, ClipboardPort};

/// 内存剪贴板
#[derive(Default)]
pub struct InMemoryClipboard {
    copied: Mutex<Vec<String>>,
}

impl InMemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// 历次复制的文本，按时间顺序
    pub fn copied(&self) -> Vec<String> {
        self.copied
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// 最近一次复制的文本
    pub fn last(&self) -> Option<String> {
        self.copied
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

#[async_trait]
impl ClipboardPort for InMemoryClipboard {
    async fn copy(&self, text: &str) -> Result<(), ClipboardError> {
        self.copied
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(text.to_string());
        tracing::debug!(chars = text.chars().count(), "Text copied to clipboard");
        Ok(())
    }
}
