//! Host Surface Port - 宿主界面抽象
//!
//! 核心只依赖这些原语：结构选择器查询、内容读写、变更通知、
//! 滚动到可见、控件触发、焦点查询、可编辑元素枚举、用户提示。
//! 具体宿主技术（浏览器 DOM 或其他界面）在 infrastructure 层实现。

use thiserror::Error;

/// 目标元素类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// 普通文本输入（textarea / 文本框）
    TextField,
    /// 富文本可编辑区域（contenteditable）
    RichText,
    /// 其他元素，不可写入
    Other,
}

impl TargetKind {
    /// 是否可作为文本写入目标
    pub fn is_editable(self) -> bool {
        !matches!(self, TargetKind::Other)
    }
}

/// 已解析的目标元素句柄
///
/// 句柄只在单次投递内有效，宿主界面可能在两次投递之间重建元素，
/// 所以每次投递前都要重新解析。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetHandle {
    pub id: u64,
    pub kind: TargetKind,
}

/// 可交互控件句柄（按钮等）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlHandle {
    pub id: u64,
    /// 控件的可见文本或无障碍标签
    pub label: String,
    pub visible: bool,
}

/// 合成变更通知
///
/// 响应式框架只监听通知而不监听属性赋值，
/// 写入后必须补发对应通知，否则框架感知不到更新。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeNotification {
    /// 值已变化（input 事件的抽象）
    ValueChanged,
    /// 内容已提交（change 事件的抽象）
    ContentCommitted,
}

/// 宿主界面操作错误
#[derive(Debug, Error)]
pub enum HostSurfaceError {
    #[error("目标元素已失效: {0}")]
    StaleTarget(u64),

    #[error("写入被拒绝: {0}")]
    WriteRejected(String),
}

/// Host Surface Port
///
/// 同步原语集合；宿主内操作本身没有异步语义，
/// 延时（settle delay 等）由调用方控制。
pub trait HostSurfacePort: Send + Sync {
    /// 按结构选择器查找第一个匹配元素
    fn query(&self, selector: &str) -> Option<TargetHandle>;

    /// 当前持有焦点的元素
    fn focused_target(&self) -> Option<TargetHandle>;

    /// 按视图顺序枚举所有可编辑元素
    fn editable_targets(&self) -> Vec<TargetHandle>;

    /// 读取元素内容
    fn read_content(&self, target: &TargetHandle) -> Option<String>;

    /// 覆写元素内容
    fn write_content(&self, target: &TargetHandle, content: &str)
        -> Result<(), HostSurfaceError>;

    /// 发出合成变更通知
    fn emit(&self, target: &TargetHandle, notification: ChangeNotification);

    /// 平滑滚动使元素可见
    fn scroll_into_view(&self, target: &TargetHandle);

    /// 枚举当前视图的可交互控件
    fn interactive_controls(&self) -> Vec<ControlHandle>;

    /// 触发控件（点击的抽象），结果不回传
    fn invoke_control(&self, control: &ControlHandle);

    /// 向用户展示一条提示
    fn notify_user(&self, message: &str);
}
