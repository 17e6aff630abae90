//! Sabor Salvadoreño - native demo of the page-sync engine
//!
//! Renders the landing page in a window and drives the engine from real
//! input: wheel and keyboard scrolling, clicks and typing.

mod app;
mod renderer;
mod scroll_input;
mod theme;

use std::ffi::CString;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use app::App;
use glutin::config::ConfigTemplateBuilder;
use glutin::context::{ContextApi, ContextAttributesBuilder, PossiblyCurrentContext};
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{Surface, SurfaceAttributesBuilder, WindowSurface};
use glutin_winit::DisplayBuilder;
use page_sync::EngineConfig;
use page_sync::config::{self, layout};
use page_sync::page::PageLayout;
use raw_window_handle::HasWindowHandle;
use scroll_input::ScrollInput;
use tracing::{error, info, warn};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, ModifiersState, NamedKey};
use winit::window::{Window, WindowAttributes, WindowId};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = EngineConfig::load_or_default(config_path().as_deref());
    let page = page_layout();

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut handler = AppHandler::new(config, page);
    event_loop.run_app(&mut handler).context("event loop failed")?;
    Ok(())
}

/// First CLI argument, then `PAGE_SYNC_CONFIG`, then the user config directory
fn config_path() -> Option<PathBuf> {
    std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("PAGE_SYNC_CONFIG").map(PathBuf::from))
        .or_else(config::default_config_path)
}

/// Page description from `PAGE_SYNC_LAYOUT`, or the built-in page
fn page_layout() -> PageLayout {
    let Some(path) = std::env::var_os("PAGE_SYNC_LAYOUT") else {
        return PageLayout::default();
    };
    match PageLayout::load(Path::new(&path)) {
        Ok(page) => page,
        Err(err) => {
            warn!("Using the built-in page: {}", err);
            PageLayout::default()
        }
    }
}

struct AppHandler {
    state: Option<AppState>,
    config: EngineConfig,
    page: PageLayout,
    modifiers: ModifiersState,
    mouse_position: (f64, f64),
}

struct AppState {
    window: Window,
    gl_context: PossiblyCurrentContext,
    gl_surface: Surface<WindowSurface>,
    app: App,
}

impl AppHandler {
    fn new(config: EngineConfig, page: PageLayout) -> Self {
        Self {
            state: None,
            config,
            page,
            modifiers: ModifiersState::default(),
            mouse_position: (0.0, 0.0),
        }
    }

    fn create_state(&self, event_loop: &ActiveEventLoop) -> anyhow::Result<AppState> {
        let window_attrs = WindowAttributes::default()
            .with_title(self.page.brand.as_str())
            .with_inner_size(LogicalSize::new(layout::VIEWPORT_WIDTH, layout::VIEWPORT_HEIGHT));

        // OpenGL config with 4x MSAA for smooth text and edges
        let config_template = ConfigTemplateBuilder::new()
            .with_alpha_size(8)
            .with_multisampling(4);

        let display_builder = DisplayBuilder::new().with_window_attributes(Some(window_attrs));

        let (window, gl_config) = display_builder
            .build(event_loop, config_template, |configs| {
                configs
                    .reduce(|accum, config| {
                        if config.num_samples() > accum.num_samples() {
                            config
                        } else {
                            accum
                        }
                    })
                    .expect("display builder offers at least one config")
            })
            .map_err(|err| anyhow!("failed to create window: {err}"))?;

        let window = window.context("window not created")?;
        let gl_display = gl_config.display();
        let raw_handle = window.window_handle()?.as_raw();

        let context_attrs = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(None))
            .build(Some(raw_handle));

        let gl_context = unsafe { gl_display.create_context(&gl_config, &context_attrs)? };

        let size = window.inner_size();
        let surface_attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            raw_handle,
            NonZeroU32::new(size.width.max(1)).context("zero width")?,
            NonZeroU32::new(size.height.max(1)).context("zero height")?,
        );

        let gl_surface = unsafe { gl_display.create_window_surface(&gl_config, &surface_attrs)? };
        let gl_context = gl_context.make_current(&gl_surface)?;

        let renderer = unsafe {
            femtovg::renderer::OpenGl::new_from_function_cstr(|name| {
                CString::new(name.to_bytes())
                    .map(|cstr| gl_display.get_proc_address(&cstr) as *const _)
                    .unwrap_or(std::ptr::null())
            })
            .map_err(|err| anyhow!("failed to create renderer: {err:?}"))?
        };

        let scale = window.scale_factor() as f32;
        let app = App::new(
            renderer,
            size.width as f32,
            size.height as f32,
            scale,
            self.config.clone(),
            &self.page,
        )?;
        info!("Window ready at {}x{} (scale {})", size.width, size.height, scale);

        Ok(AppState {
            window,
            gl_context,
            gl_surface,
            app,
        })
    }
}

impl ApplicationHandler for AppHandler {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        match self.create_state(event_loop) {
            Ok(state) => self.state = Some(state),
            Err(err) => {
                error!("Startup failed: {:#}", err);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(s) => s,
            None => return,
        };

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let (Some(width), Some(height)) =
                    (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
                {
                    state.gl_surface.resize(&state.gl_context, width, height);
                    let scale = state.window.scale_factor() as f32;
                    state
                        .app
                        .resize(size.width as f32, size.height as f32, scale);
                    state.window.request_redraw();
                }
            }

            WindowEvent::ModifiersChanged(mods) => {
                self.modifiers = mods.state();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed {
                    let ctrl = self.modifiers.control_key();
                    let typing = state.app.is_typing();

                    let result = match &event.logical_key {
                        Key::Named(NamedKey::Escape) => {
                            event_loop.exit();
                            return;
                        }
                        Key::Named(NamedKey::PageDown) => state.app.page_down(),
                        Key::Named(NamedKey::PageUp) => state.app.page_up(),
                        Key::Named(NamedKey::Home) => state.app.scroll_to_start(),
                        Key::Named(NamedKey::End) => state.app.scroll_to_end(),
                        Key::Named(NamedKey::ArrowDown) => state.app.line_down(),
                        Key::Named(NamedKey::ArrowUp) => state.app.line_up(),
                        Key::Named(NamedKey::Space) if !typing => state.app.page_down(),
                        Key::Named(NamedKey::Space) => state.app.handle_char(' '),
                        Key::Named(NamedKey::Backspace) => state.app.handle_backspace(),
                        Key::Named(NamedKey::Enter) => state.app.handle_char('\n'),
                        Key::Character(c) if !ctrl => c
                            .chars()
                            .map(|ch| state.app.handle_char(ch))
                            .fold(app::AppResult::Ok, |acc, r| {
                                if r.needs_redraw() { r } else { acc }
                            }),
                        _ => app::AppResult::Ok,
                    };

                    if result.needs_redraw() {
                        state.window.request_redraw();
                    }
                }
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let input = match delta {
                    MouseScrollDelta::LineDelta(_, y) => ScrollInput::LineDelta(y),
                    MouseScrollDelta::PixelDelta(pos) => {
                        ScrollInput::PixelDelta((pos.y / state.window.scale_factor()) as f32)
                    }
                };
                if state.app.handle_wheel(input).needs_redraw() {
                    state.window.request_redraw();
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.mouse_position = (position.x, position.y);
            }

            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                let (x, y) = self.mouse_position;
                if state.app.click_at(x as f32, y as f32).needs_redraw() {
                    state.window.request_redraw();
                }
            }

            WindowEvent::RedrawRequested => {
                state.app.render();
                if let Err(err) = state.gl_surface.swap_buffers(&state.gl_context) {
                    error!("Failed to swap buffers: {}", err);
                }
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(state) = &mut self.state else {
            return;
        };
        if state.app.tick().needs_redraw() {
            state.window.request_redraw();
        }
        match state.app.next_deadline() {
            Some(deadline) => event_loop.set_control_flow(ControlFlow::WaitUntil(deadline)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }
}
