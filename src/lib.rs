//! Segfill - 长文本分段填充核心
//!
//! 把一段长文本在自然断点处切成长度受限的段落，
//! 再逐段投递到动态定位的目标输入框，可选定时节奏。
//!
//! 架构设计: Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Segmenter: 边界感知的贪心分割（纯函数）
//! - Cursor: 投递位置游标（纯状态）
//!
//! 应用层 (application/):
//! - Ports: 端口定义（HostSurface, SettingsStore, Clipboard）
//! - Resolver: 目标输入框的回退链解析
//! - Delivery: 段落写入 + 合成变更通知 + 自动确认
//! - Scheduler: Idle/Running 定时投递状态机
//! - Relay: 编排服务
//!
//! 基础设施层 (infrastructure/):
//! - Memory: SettingsStore, Clipboard 内存实现
//! - Surface: 可编排的假宿主界面（测试与演示）

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
