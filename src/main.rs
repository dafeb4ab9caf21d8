use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{CursorGrabMode, Window, WindowId},
};

use room_walker::camera::{CameraController, CameraState};
use room_walker::cli::Cli;
use room_walker::core::timer::FpsCounter;
use room_walker::core::{Button, Clock, Controller, MouseMode, OutputSize, WinitController};
use room_walker::graphics::GraphicsContext;
use room_walker::renderer::RenderConfig;
use room_walker::settings::GameSettings;

const FPS_LOG_INTERVAL: f32 = 1.0;
const WINDOW_TITLE: &str = "Room Walker";

struct App {
    cli: Cli,
    settings: GameSettings,
    graphics: Option<GraphicsContext>,
    input: WinitController,
    controller: CameraController,
    camera: CameraState,
    clock: Clock,
    fps: FpsCounter,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(cli: Cli, settings: GameSettings) -> Self {
        let controller = CameraController::new(settings.camera);
        let clock = match cli.fixed_hz {
            Some(hz) => Clock::fixed(hz),
            None => Clock::new(),
        };

        Self {
            camera: controller.initial_state(),
            controller,
            clock,
            cli,
            settings,
            graphics: None,
            input: WinitController::new(),
            fps: FpsCounter::new(FPS_LOG_INTERVAL),
            error: None,
        }
    }

    fn create_graphics(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let size = self.cli.window_size();
        let window = event_loop
            .create_window(
                Window::default_attributes()
                    .with_title(WINDOW_TITLE)
                    .with_inner_size(winit::dpi::PhysicalSize::new(size.width, size.height)),
            )
            .context("Failed to create window")?;

        let config = RenderConfig::new(&self.settings, self.cli.texture_source());
        self.graphics = Some(GraphicsContext::create(Arc::new(window), config)?);
        self.clock.reset_elapsed();
        Ok(())
    }

    /// One pass of the game loop: update at the clock's pace, then draw
    fn tick(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let Self {
            input,
            controller,
            camera,
            clock,
            fps,
            ..
        } = self;

        let mut quit = false;
        let mut sample = input.sample();
        let delta = clock.tick(|_| {
            if input.is_down(Button::Quit) {
                quit = true;
            }
            if input.is_down(Button::Reset) {
                controller.reset(camera);
            }

            controller.advance(camera, &sample);
            // Mouse motion is consumed by the first fixed step only
            sample.mouse_delta = Vec2::ZERO;
        });

        if let Some(rate) = fps.frame(delta) {
            log::debug!("FPS: {:.1}", rate);
        }

        if quit {
            event_loop.exit();
            return Ok(());
        }

        if let Some(mode) = self.input.end_frame() {
            self.apply_mouse_mode(mode);
        }

        // Nothing to show before the first update
        if self.clock.frame_count() == 0 {
            return Ok(());
        }

        match &mut self.graphics {
            Some(graphics) => graphics.draw(self.camera.view_matrix()),
            None => Ok(()),
        }
    }

    fn apply_mouse_mode(&self, mode: MouseMode) {
        let Some(graphics) = &self.graphics else {
            return;
        };
        let window = graphics.window();

        match mode {
            MouseMode::Relative => {
                window.set_cursor_visible(false);
                if let Err(e) = window
                    .set_cursor_grab(CursorGrabMode::Locked)
                    .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined))
                {
                    log::warn!("Cursor grab unavailable: {}", e);
                }
            }
            MouseMode::Absolute => {
                window.set_cursor_visible(true);
                if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
                    log::warn!("Cursor release failed: {}", e);
                }
            }
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{:#}", error);
        self.error = Some(error);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.graphics.is_none() {
            if let Err(e) = self.create_graphics(event_loop) {
                self.fail(event_loop, e);
            }
        } else {
            log::info!("Resuming");
            self.clock.reset_elapsed();
        }
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        log::info!("Suspending");
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        self.input.process_event(&event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Focused(focused) => {
                log::info!("{}", if focused { "Activated" } else { "Deactivated" });
            }
            WindowEvent::Resized(size) => {
                if let Some(graphics) = &mut self.graphics {
                    graphics.resize(OutputSize::from(size));
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.tick(event_loop) {
                    self.fail(event_loop, e);
                }
            }
            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        self.input.process_device_event(&event);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(graphics) = &self.graphics {
            graphics.window().request_redraw();
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let settings = cli.settings()?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);
    let mut app = App::new(cli, settings);

    log::info!("Controls: WASD/arrows move, Space/X up/down, hold left mouse to look, Home resets, Escape quits");
    event_loop.run_app(&mut app)?;

    match app.error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
