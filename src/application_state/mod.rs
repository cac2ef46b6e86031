//! # Application State Management
//!
//! This module handles the application's state management, including:
//! - Window and graphics initialization
//! - Input handling
//! - Application lifecycle events
//! - Deciding when to redraw

pub mod graphics_resources_builder;
pub mod input_manager;
pub mod input_state;

use std::sync::Arc;

use graphics_resources_builder::{Graphics, GraphicsBuilder, GraphicsResult, MaybeGraphics};
use input_manager::InputManager;
use log::{error, info};

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoopProxy},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::{
    config::{DemoConfig, DemoKind},
    engine_state::EngineState,
};

const TASK_POLL_INTERVAL: web_time::Duration = web_time::Duration::from_millis(16);

/// The main application state container that manages the application's lifecycle.
pub struct ApplicationState {
    /// The current graphics state, which may be initializing, ready or handed over
    pub graphics: MaybeGraphics,

    /// The initialized application state, if the application has started
    pub state: Option<InitializedApplicationState>,

    /// Cached window size for web platforms during initialization
    pub web_window_size: Option<PhysicalSize<u32>>,

    config: DemoConfig,
}

/// Represents the fully initialized and running state of the application.
pub struct InitializedApplicationState {
    pub engine_state: EngineState,
    pub window: Arc<Window>,
    pub input_manager: InputManager,
}

fn is_exit_event(event: &WindowEvent) -> bool {
    matches!(
        event,
        WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event: KeyEvent {
                    state: ElementState::Pressed,
                    physical_key: PhysicalKey::Code(KeyCode::Escape),
                    ..
                },
                ..
            }
    )
}

impl ApplicationState {
    /// Prepares to build graphics for the demo `config` selects.
    pub fn new(config: DemoConfig, event_loop_proxy: EventLoopProxy<GraphicsResult>) -> Self {
        let background_source = match config.demo {
            DemoKind::Cube => None,
            DemoKind::Voxels => config.voxels.background.image_source().map(str::to_string),
        };
        let builder = GraphicsBuilder::new(
            event_loop_proxy,
            config.window_title.clone(),
            background_source,
        );

        Self {
            graphics: MaybeGraphics::Builder(builder),
            state: None,
            web_window_size: None,
            config,
        }
    }

    /// Configures the surface for its first real size and starts the demo.
    fn resized(&mut self, size: PhysicalSize<u32>) {
        let MaybeGraphics::Graphics(gfx) = &mut self.graphics else {
            return;
        };
        if size.width == 0 || size.height == 0 {
            return;
        }

        gfx.surface_config.width = size.width;
        gfx.surface_config.height = size.height;
        gfx.surface.configure(&gfx.device, &gfx.surface_config);
        gfx.is_surface_configured = true;
        self.initialize_application_state();
    }

    /// Hands the graphics resources to a new [`EngineState`].
    fn initialize_application_state(&mut self) {
        let gfx = match std::mem::replace(&mut self.graphics, MaybeGraphics::Moved) {
            MaybeGraphics::Graphics(gfx) => gfx,
            other => {
                self.graphics = other;
                return;
            }
        };
        let Graphics {
            window,
            surface,
            surface_config,
            device,
            queue,
            background_image,
            ..
        } = gfx;

        info!(
            "Starting the {:?} demo at {}x{}",
            self.config.demo, surface_config.width, surface_config.height
        );
        let engine_state = EngineState::new(
            surface,
            surface_config,
            device,
            queue,
            &self.config,
            background_image,
        );

        window.request_redraw();
        self.state = Some(InitializedApplicationState {
            engine_state,
            window,
            input_manager: InputManager::new(),
        });
    }
}

impl ApplicationHandler<GraphicsResult> for ApplicationState {
    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if is_exit_event(&event) {
            event_loop.exit();
            return;
        }

        if self.state.is_none() {
            if let WindowEvent::Resized(size) = event {
                self.web_window_size = Some(size);
                self.resized(size);
            }
            return;
        }
        let Some(state) = &mut self.state else {
            return;
        };

        state.input_manager.intake_input(&event);

        match event {
            WindowEvent::Resized(size) => {
                state.engine_state.resize_surface(size);
            }
            WindowEvent::Focused(false) => {
                state.input_manager.release_all();
            }
            WindowEvent::RedrawRequested => {
                state.engine_state.render();
            }
            _ => (),
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let MaybeGraphics::Builder(builder) = &mut self.graphics {
            builder.build_and_send(event_loop);
        }
    }

    /// Receives the graphics resources, or the error that prevented creating them.
    fn user_event(&mut self, event_loop: &ActiveEventLoop, graphics: GraphicsResult) {
        let graphics = match graphics {
            Ok(graphics) => graphics,
            Err(err) => {
                error!("Failed to initialize graphics: {}", err);
                event_loop.exit();
                return;
            }
        };
        let is_surface_configured = graphics.is_surface_configured;

        self.graphics = MaybeGraphics::Graphics(graphics);

        if is_surface_configured {
            self.initialize_application_state();
        } else if let Some(size) = self.web_window_size {
            self.resized(size);
        }
    }

    /// Applies input, collects finished tasks and asks for a redraw when one is owed.
    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(state) = &mut self.state else {
            return;
        };

        if let Some(processed_input) = state.input_manager.get_and_reset_processed_input() {
            state.engine_state.set_input_commands(processed_input);
            state.engine_state.process_input();
        }

        state.engine_state.process_tasks();

        if state.engine_state.render_scheduler.should_render() {
            state.window.request_redraw();
        }

        // Nothing wakes the loop when a worker finishes, so poll until the workers are idle
        if state.engine_state.has_pending_tasks() {
            event_loop.set_control_flow(ControlFlow::WaitUntil(
                web_time::Instant::now() + TASK_POLL_INTERVAL,
            ));
        } else {
            event_loop.set_control_flow(ControlFlow::Wait);
        }
    }
}
