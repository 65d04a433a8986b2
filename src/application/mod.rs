//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（HostSurface、SettingsStore、Clipboard）
//! - resolver: 目标输入框解析
//! - delivery: 段落投递引擎
//! - scheduler: 定时投递调度
//! - relay: 编排服务
//! - error: 应用层错误定义

pub mod delivery;
pub mod error;
pub mod ports;
pub mod relay;
pub mod resolver;
pub mod scheduler;

pub use delivery::{DeliveryEngine, DeliveryEngineConfig, CONFIRM_KEYWORDS};
pub use error::{DeliveryError, RelayError};
pub use relay::{EffectiveSettings, RelayService};
pub use resolver::{TargetResolver, TargetSpec};
pub use scheduler::{AutoSendScheduler, DeliverNext};
