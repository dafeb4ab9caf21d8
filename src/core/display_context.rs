use anyhow::{ensure, Result};
use glam::Mat4;
use serde::{Deserialize, Serialize};

pub const DEFAULT_WIDTH: u32 = 1024;
pub const DEFAULT_HEIGHT: u32 = 768;

/// Output surface size in physical pixels, never smaller than 1x1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputSize {
    pub width: u32,
    pub height: u32,
}

impl OutputSize {
    /// Zero-sized windows (minimised) are clamped to 1 on each axis
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

impl Default for OutputSize {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl From<winit::dpi::PhysicalSize<u32>> for OutputSize {
    fn from(size: winit::dpi::PhysicalSize<u32>) -> Self {
        Self::new(size.width, size.height)
    }
}

/// Perspective parameters; the matrix is rebuilt whenever the output resizes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Projection {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_y_degrees: 70.0,
            near: 0.01,
            far: 100.0,
        }
    }
}

impl Projection {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.fov_y_degrees > 0.0 && self.fov_y_degrees < 180.0,
            "fov_y_degrees must be in (0, 180), got {}",
            self.fov_y_degrees
        );
        ensure!(
            self.near > 0.0 && self.near < self.far && self.far.is_finite(),
            "projection needs 0 < near < far, got near {} far {}",
            self.near,
            self.far
        );
        Ok(())
    }

    /// Right-handed, depth mapped to [0, 1]
    pub fn matrix(&self, size: OutputSize) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_degrees.to_radians(),
            size.aspect(),
            self.near,
            self.far,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec3, Vec4};

    #[test]
    fn test_new_creates_context_with_dimensions() {
        let size = OutputSize::new(1920, 1080);
        assert_eq!(size.width, 1920);
        assert_eq!(size.height, 1080);
    }

    #[test]
    fn test_zero_dimensions_clamped() {
        assert_eq!(OutputSize::new(0, 0), OutputSize::new(1, 1));
        assert_eq!(OutputSize::new(640, 0).height, 1);
    }

    #[test]
    fn test_default_size() {
        let size = OutputSize::default();
        assert_eq!((size.width, size.height), (1024, 768));
    }

    #[test]
    fn test_aspect_ratio() {
        assert!((OutputSize::new(1024, 768).aspect() - 4.0 / 3.0).abs() < 1e-6);
        assert!((OutputSize::new(1920, 1080).aspect() - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_projection_depth_range() {
        let proj = Projection::default().matrix(OutputSize::default());

        let near = proj * Vec4::new(0.0, 0.0, -0.01, 1.0);
        let far = proj * Vec4::new(0.0, 0.0, -100.0, 1.0);

        assert!((near.z / near.w).abs() < 1e-4);
        assert!((far.z / far.w - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_projection_tracks_aspect() {
        let wide = Projection::default().matrix(OutputSize::new(2000, 1000));
        let square = Projection::default().matrix(OutputSize::new(1000, 1000));

        let point = Vec3::new(1.0, 0.0, -5.0);
        let wide_x = wide.project_point3(point).x;
        let square_x = square.project_point3(point).x;
        assert!((square_x / wide_x - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_projection_validation() {
        assert!(Projection::default().validate().is_ok());

        let reversed = Projection {
            near: 10.0,
            far: 1.0,
            ..Default::default()
        };
        assert!(reversed.validate().is_err());

        let zero_near = Projection {
            near: 0.0,
            ..Default::default()
        };
        assert!(zero_near.validate().is_err());

        let flat = Projection {
            fov_y_degrees: 0.0,
            ..Default::default()
        };
        assert!(flat.validate().is_err());
    }
}
