use anyhow::{bail, Context, Result};
use glam::Mat4;
use std::sync::Arc;
use winit::window::Window;

use crate::core::device_state::{DeviceState, PresentOutcome};
use crate::core::display_context::OutputSize;
use crate::renderer::{RenderConfig, RoomRenderer};

/// Owns the window's graphics resources and their lifecycle.
///
/// Any presentation failure that means the device went away tears the
/// renderer down and builds it again; every other failure is returned as
/// an error and ends the session.
pub struct GraphicsContext {
    window: Arc<Window>,
    config: RenderConfig,
    size: OutputSize,
    state: DeviceState,
    renderer: Option<RoomRenderer>,
}

impl GraphicsContext {
    /// Create the device and every dependent resource
    pub fn create(window: Arc<Window>, config: RenderConfig) -> Result<Self> {
        let size = OutputSize::from(window.inner_size());
        let renderer = RoomRenderer::new(window.clone(), size, &config)
            .context("Failed to create graphics device")?;

        Ok(Self {
            window,
            config,
            size,
            state: DeviceState::Active,
            renderer: Some(renderer),
        })
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    /// Rebuild size-dependent targets
    pub fn resize(&mut self, size: OutputSize) {
        if size == self.size {
            return;
        }

        log::debug!("Resize to {}x{}", size.width, size.height);
        self.size = size;
        if let Some(renderer) = &mut self.renderer {
            renderer.resize(size);
        }
    }

    /// Render one frame with the given view transform and present it
    pub fn draw(&mut self, view: Mat4) -> Result<()> {
        let Some(renderer) = &mut self.renderer else {
            bail!("draw called without a graphics device");
        };

        let outcome = if renderer.is_device_lost() {
            PresentOutcome::DeviceLost
        } else {
            PresentOutcome::from(renderer.render(view))
        };

        match outcome {
            PresentOutcome::Presented => Ok(()),
            PresentOutcome::Reconfigure => {
                renderer.reconfigure();
                Ok(())
            }
            PresentOutcome::SkipFrame => {
                log::warn!("Surface timed out, frame skipped");
                Ok(())
            }
            PresentOutcome::DeviceLost => self.on_device_lost(),
            PresentOutcome::Fatal(message) => bail!("Present failed: {}", message),
        }
    }

    /// Drop every device-dependent resource
    pub fn destroy(&mut self) {
        if self.renderer.take().is_some() {
            log::debug!("Graphics resources released");
        }
    }

    /// Tear down and build the device and all resources again
    pub fn recreate(&mut self) -> Result<()> {
        if self.state.is_active() {
            self.state = self.state.mark_lost()?;
        }
        self.state = self.state.begin_recreate()?;
        self.destroy();

        let renderer = RoomRenderer::new(self.window.clone(), self.size, &self.config)
            .context("Failed to recreate graphics device")?;
        self.renderer = Some(renderer);

        self.state = self.state.finish_recreate()?;
        log::info!("Graphics device recreated");
        Ok(())
    }

    fn on_device_lost(&mut self) -> Result<()> {
        log::warn!("Graphics device lost, recreating");
        self.recreate()
    }
}
