//! # Voxel Demos
//!
//! Two small WGPU demos that run natively and in the browser:
//!
//! * **cube** - a lit box spinning about its X and Y axes
//! * **voxels** - a single voxel cell filled from Perlin noise, meshed with
//!   face culling and viewed with an orbit camera
//!
//! ## Key Modules
//!
//! * `application_state` - Window creation, the winit event loop and input
//! * `engine_state` - Noise, voxels, meshing, camera and rendering
//! * `config` - Serde configuration for both demos
//! * `error` - The crate error type
//!
//! ## Usage
//!
//! ```ignore
//! // Native: optionally pass a demo name or a JSON config path as the first argument
//! fn main() {
//!     if let Err(err) = voxel_demos::run() {
//!         log::error!("{}", err);
//!     }
//! }
//! ```
//!
//! On the web, call `run_web("cube")` or `run_web("voxels")` from JavaScript with a
//! `<canvas id="c">` on the page.

use application_state::ApplicationState;
#[cfg(target_family = "wasm")]
use wasm_bindgen::prelude::wasm_bindgen;

use winit::event_loop::EventLoop;

use config::DemoConfig;
use error::DemoError;

pub mod application_state;
pub mod config;
pub mod engine_state;
pub mod error;

#[cfg(target_family = "wasm")]
const CANVAS_ID: &str = "c";

/// Reads the configuration named by the first command line argument.
///
/// The argument may be a demo name (`cube`, `voxels`) or a path to a JSON file.
#[cfg(not(target_family = "wasm"))]
fn config_from_args() -> Result<DemoConfig, DemoError> {
    match std::env::args().nth(1) {
        None => Ok(DemoConfig::default()),
        Some(arg) => match arg.parse() {
            Ok(demo) => Ok(DemoConfig::for_demo(demo)),
            Err(_) => {
                log::info!("Loading configuration from {}", arg);
                config::load_config(&arg)
            }
        },
    }
}

/// Runs the demo selected on the command line.
#[cfg(not(target_family = "wasm"))]
pub fn run() -> Result<(), DemoError> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    log::info!("Logger initialized");
    run_with_config(config_from_args()?)
}

/// Runs a demo with an explicit configuration. Blocks until the window closes.
#[cfg(not(target_family = "wasm"))]
pub fn run_with_config(config: DemoConfig) -> Result<(), DemoError> {
    config.validate()?;
    let event_loop = EventLoop::with_user_event().build()?;
    let mut state = ApplicationState::new(config, event_loop.create_proxy());
    event_loop.run_app(&mut state)?;
    Ok(())
}

/// Starts the named demo in the canvas with id `c`.
#[cfg(target_family = "wasm")]
#[wasm_bindgen]
pub fn run_web(demo: &str) {
    use winit::platform::web::EventLoopExtWebSys;

    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger was already initialized".into());
    }

    let config = match demo.parse() {
        Ok(kind) => DemoConfig::for_demo(kind),
        Err(err) => {
            log::error!("{}", err);
            return;
        }
    };

    let event_loop = match EventLoop::with_user_event().build() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            log::error!("{}", DemoError::from(err));
            return;
        }
    };

    let state = ApplicationState::new(config, event_loop.create_proxy());
    event_loop.spawn_app(state);
}
