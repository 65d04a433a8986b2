//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod clipboard;
mod host_surface;
mod settings_store;

pub use clipboard::{ClipboardError, ClipboardPort};
pub use host_surface::{
    ChangeNotification, ControlHandle, HostSurfaceError, HostSurfacePort, TargetHandle,
    TargetKind,
};
pub use settings_store::{
    GlobalSettings, SettingsStorePort, SiteSettings, SplitPatternSetting, StoreError,
    DEFAULT_AUTO_SEND_INTERVAL_MS,
};
