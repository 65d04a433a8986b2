//! Clipboard Port - 剪贴板抽象
//!
//! 复制是投递之外的备用通路，简单透传。

use async_trait::async_trait;
use thiserror::Error;

/// 剪贴板错误
#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("剪贴板写入失败: {0}")]
    WriteFailed(String),
}

/// Clipboard Port
#[async_trait]
pub trait ClipboardPort: Send + Sync {
    /// 将文本写入系统剪贴板
    async fn copy(&self, text: &str) -> Result<(), ClipboardError>;
}
