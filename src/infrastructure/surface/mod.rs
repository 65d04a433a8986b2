//! Host Surface 实现

mod fake_surface;

pub use fake_surface::FakeSurface;
