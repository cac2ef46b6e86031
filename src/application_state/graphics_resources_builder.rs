//! # Graphics Resources Builder
//!
//! Creates the window, surface, device and queue, and loads the optional
//! background image. Creation is asynchronous; the result is sent back to the
//! event loop through an [`EventLoopProxy`].
//!
//! The main components are:
//! - `Graphics`: Holds all graphics-related resources
//! - `GraphicsBuilder`: Helper for asynchronous graphics initialization
//! - `MaybeGraphics`: Represents the various states of graphics initialization

use std::future::Future;
use std::sync::Arc;

use image::RgbaImage;
use log::{info, warn};
use wgpu::{Device, Instance, Queue, Surface, SurfaceConfiguration};
use winit::{
    event_loop::{ActiveEventLoop, EventLoopProxy},
    window::Window,
};

use crate::{engine_state::rendering::texture::decode_image, error::DemoError};

#[cfg(target_family = "wasm")]
use crate::CANVAS_ID;

/// Everything needed to start rendering.
pub struct Graphics {
    pub window: Arc<Window>,
    pub surface: Surface<'static>,
    pub surface_config: SurfaceConfiguration,
    pub device: Device,
    pub queue: Queue,
    /// Decoded background, `None` when none was configured or loading failed
    pub background_image: Option<RgbaImage>,
    /// The web canvas only gets a real size after the first resize
    pub is_surface_configured: bool,
}

/// What the builder sends back to the event loop.
pub type GraphicsResult = Result<Graphics, DemoError>;

/// Synchronous part of graphics creation; must run on the event loop thread.
fn create_window_and_surface(
    event_loop: &ActiveEventLoop,
    window_title: &str,
) -> Result<(Arc<Window>, Instance, Surface<'static>), DemoError> {
    #[allow(unused_mut)]
    let mut window_attrs = Window::default_attributes().with_title(window_title);

    #[cfg(target_family = "wasm")]
    {
        use web_sys::wasm_bindgen::JsCast;
        use winit::platform::web::WindowAttributesExtWebSys;

        let canvas = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.get_element_by_id(CANVAS_ID))
            .ok_or_else(|| DemoError::MissingCanvas(CANVAS_ID.to_string()))?;
        window_attrs = window_attrs.with_canvas(Some(canvas.unchecked_into()));
    }

    let window = Arc::new(event_loop.create_window(window_attrs)?);

    // Backends::PRIMARY => Vulkan + Metal + DX12 + Browser WebGPU
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        #[cfg(not(target_family = "wasm"))]
        backends: wgpu::Backends::PRIMARY,
        #[cfg(target_family = "wasm")]
        backends: wgpu::Backends::GL | wgpu::Backends::BROWSER_WEBGPU,
        ..Default::default()
    });

    let surface = instance.create_surface(window.clone())?;
    Ok((window, instance, surface))
}

/// Asynchronously creates and initializes all required graphics resources.
fn create_graphics(
    event_loop: &ActiveEventLoop,
    window_title: &str,
    background_source: Option<String>,
) -> impl Future<Output = GraphicsResult> + 'static {
    let setup = create_window_and_surface(event_loop, window_title);

    async move {
        let (window, instance, surface) = setup?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        info!("Using adapter {:?}", adapter.get_info().name);

        let required_limits = if cfg!(target_family = "wasm") {
            wgpu::Limits::downlevel_webgl2_defaults().using_resolution(adapter.limits())
        } else {
            wgpu::Limits::default()
        };

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits,
                label: None,
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                trace: wgpu::Trace::Off,
            })
            .await?;

        let size = window.inner_size();
        let mut surface_config = surface
            .get_default_config(&adapter, size.width.max(1), size.height.max(1))
            .ok_or(DemoError::SurfaceUnsupported)?;

        // Colours are written in linear space and rely on an sRGB target
        let surface_caps = surface.get_capabilities(&adapter);
        match surface_caps.formats.iter().find(|f| f.is_srgb()) {
            Some(format) => surface_config.format = *format,
            None => warn!(
                "No sRGB surface format available, colours will look darker ({:?})",
                surface_config.format
            ),
        }

        let background_image = match background_source {
            Some(source) => {
                let max_dimension = device.limits().max_texture_dimension_2d;
                match load_background(&source, max_dimension).await {
                    Ok(image) => {
                        info!(
                            "Loaded background {} ({}x{})",
                            source,
                            image.width(),
                            image.height()
                        );
                        Some(image)
                    }
                    Err(err) => {
                        warn!("Falling back to a plain background colour: {}", err);
                        None
                    }
                }
            }
            None => None,
        };

        let is_surface_configured = cfg!(not(target_family = "wasm"));
        if is_surface_configured {
            surface.configure(&device, &surface_config);
        }

        Ok(Graphics {
            window,
            surface,
            surface_config,
            device,
            queue,
            background_image,
            is_surface_configured,
        })
    }
}

/// Reads and decodes the background picture.
#[cfg(not(target_family = "wasm"))]
async fn load_background(source: &str, max_dimension: u32) -> Result<RgbaImage, DemoError> {
    if source.starts_with("http://") || source.starts_with("https://") {
        return Err(DemoError::Fetch(format!(
            "{} is a URL; native builds only read background files",
            source
        )));
    }
    let bytes = std::fs::read(source)?;
    decode_image(&bytes, max_dimension)
}

/// Fetches and decodes the background picture.
#[cfg(target_family = "wasm")]
async fn load_background(source: &str, max_dimension: u32) -> Result<RgbaImage, DemoError> {
    let fetch_error = |err: reqwest::Error| DemoError::Fetch(format!("{}: {}", source, err));

    let response = reqwest::Client::new()
        .get(source)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(fetch_error)?;
    let bytes = response.bytes().await.map_err(fetch_error)?;
    decode_image(&bytes, max_dimension)
}

/// Helper struct for managing the asynchronous initialization of graphics resources.
pub struct GraphicsBuilder {
    event_loop_proxy: Option<EventLoopProxy<GraphicsResult>>,
    window_title: String,
    background_source: Option<String>,
}

/// Represents the possible states of the graphics initialization process.
pub enum MaybeGraphics {
    /// State during asynchronous graphics initialization
    Builder(GraphicsBuilder),

    /// State when graphics resources are fully initialized and ready for use
    Graphics(Graphics),

    /// State after graphics resources have been moved to another owner
    Moved,
}

impl GraphicsBuilder {
    pub fn new(
        event_loop_proxy: EventLoopProxy<GraphicsResult>,
        window_title: String,
        background_source: Option<String>,
    ) -> Self {
        Self {
            event_loop_proxy: Some(event_loop_proxy),
            window_title,
            background_source,
        }
    }

    /// Starts graphics creation and sends the result back through the event loop proxy.
    ///
    /// Does nothing once the proxy has been spent.
    pub fn build_and_send(&mut self, event_loop: &ActiveEventLoop) {
        let Some(event_loop_proxy) = self.event_loop_proxy.take() else {
            return;
        };

        let gfx_fut = create_graphics(
            event_loop,
            &self.window_title,
            self.background_source.take(),
        );

        #[cfg(target_family = "wasm")]
        {
            wasm_bindgen_futures::spawn_local(async move {
                let gfx = gfx_fut.await;
                if event_loop_proxy.send_event(gfx).is_err() {
                    log::error!("Event loop closed before graphics were ready");
                }
            });
        }

        #[cfg(not(target_family = "wasm"))]
        {
            let gfx = pollster::block_on(gfx_fut);
            if event_loop_proxy.send_event(gfx).is_err() {
                log::error!("Event loop closed before graphics were ready");
            }
        }
    }
}
