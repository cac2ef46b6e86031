//! # Error Types
//!
//! Errors raised while loading configuration, assets or creating the graphics context.
//! Voxel storage itself never fails; out-of-range writes are ignored.

use thiserror::Error;

/// Main error type for the demos
#[derive(Debug, Error)]
pub enum DemoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Image decode error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Asset fetch error: {0}")]
    Fetch(String),

    #[error("Surface creation error: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("Surface is not supported by the adapter")]
    SurfaceUnsupported,

    #[error("Canvas element '{0}' not found")]
    MissingCanvas(String),

    #[error("Adapter request error: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("Device request error: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("Window error: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("Unknown demo: {0}")]
    UnknownDemo(String),
}
