//! 应用层错误定义
//!
//! 投递相关的失败都集中在这里；分割与游标是全函数，运行期不失败。
//! 游标返回 `None` 是正常的终止信号，不属于错误。

use thiserror::Error;

use crate::application::ports::{ClipboardError, HostSurfaceError, StoreError, TargetKind};
use crate::domain::SegmentError;

/// 投递错误
///
/// 任何一种都不会被自动重试，由调用方（手动触发或调度器）决定后续。
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// 解析不到可用的输入目标
    #[error("未找到可用的输入框")]
    TargetNotFound,

    /// 目标元素类型不支持写入
    #[error("不支持的目标类型: {0:?}")]
    UnsupportedTargetKind(TargetKind),

    /// 写入过程中的异常，携带底层消息
    #[error("填充失败: {0}")]
    DeliveryFailed(String),
}

impl From<HostSurfaceError> for DeliveryError {
    fn from(err: HostSurfaceError) -> Self {
        Self::DeliveryFailed(err.to_string())
    }
}

/// 编排层错误
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("配置读取失败: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Segment(#[from] SegmentError),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
}
