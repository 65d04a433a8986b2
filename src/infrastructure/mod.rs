//! Infrastructure Layer - 基础设施层
//!
//! 提供所有端口的具体实现

pub mod memory;
pub mod surface;

pub use memory::{InMemoryClipboard, InMemorySettingsStore};
pub use surface::FakeSurface;
