//! 内存实现：配置存储与剪贴板

mod clipboard;
mod settings_store;

pub use clipboard::InMemoryClipboard;
pub use settings_store::InMemorySettingsStore;
