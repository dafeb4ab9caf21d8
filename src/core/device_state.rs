use anyhow::{bail, Result};

/// Lifecycle of the graphics device.
///
/// ```text
/// Active --device lost--> Lost --begin--> Recreating --finish--> Active
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceState {
    #[default]
    Active,
    Lost,
    Recreating,
}

impl DeviceState {
    pub fn mark_lost(self) -> Result<Self> {
        match self {
            DeviceState::Active => Ok(DeviceState::Lost),
            other => bail!("device reported lost while {:?}", other),
        }
    }

    pub fn begin_recreate(self) -> Result<Self> {
        match self {
            DeviceState::Lost => Ok(DeviceState::Recreating),
            other => bail!("cannot recreate device while {:?}", other),
        }
    }

    pub fn finish_recreate(self) -> Result<Self> {
        match self {
            DeviceState::Recreating => Ok(DeviceState::Active),
            other => bail!("no recreation in progress (state {:?})", other),
        }
    }

    pub fn is_active(self) -> bool {
        self == DeviceState::Active
    }
}

/// What to do after a frame failed to reach the screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentOutcome {
    Presented,
    /// Device removed or reset: tear everything down and rebuild
    DeviceLost,
    /// Surface no longer matches the window: reconfigure, same device
    Reconfigure,
    /// Swap chain timed out; drop this frame
    SkipFrame,
    Fatal(String),
}

impl PresentOutcome {
    pub fn from_surface_error(error: &wgpu::SurfaceError) -> Self {
        match error {
            wgpu::SurfaceError::Lost => PresentOutcome::DeviceLost,
            wgpu::SurfaceError::Outdated => PresentOutcome::Reconfigure,
            wgpu::SurfaceError::Timeout => PresentOutcome::SkipFrame,
            other => PresentOutcome::Fatal(other.to_string()),
        }
    }
}

impl From<Result<(), wgpu::SurfaceError>> for PresentOutcome {
    fn from(result: Result<(), wgpu::SurfaceError>) -> Self {
        match result {
            Ok(()) => PresentOutcome::Presented,
            Err(e) => PresentOutcome::from_surface_error(&e),
        }
    }
}
