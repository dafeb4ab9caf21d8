use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::camera::CameraSettings;
use crate::core::display_context::Projection;

/// Cornflower blue
pub const CLEAR_COLOR: [f64; 4] = [0.392, 0.584, 0.929, 1.0];

/// Everything tunable from a JSON settings file; absent fields keep defaults
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub camera: CameraSettings,
    pub projection: Projection,
    pub clear_color: [f64; 4],
    /// Block on vertical sync when presenting
    pub vsync: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            camera: CameraSettings::default(),
            projection: Projection::default(),
            clear_color: CLEAR_COLOR,
            vsync: true,
        }
    }
}

impl GameSettings {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Invalid settings in {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        self.camera.validate().context("Invalid camera settings")?;
        self.projection
            .validate()
            .context("Invalid projection settings")?;
        Ok(())
    }

    pub fn clear_color(&self) -> wgpu::Color {
        let [r, g, b, a] = self.clear_color;
        wgpu::Color { r, g, b, a }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        assert_eq!(GameSettings::from_json("{}").unwrap(), GameSettings::default());
    }

    #[test]
    fn partial_camera_override() {
        let settings =
            GameSettings::from_json(r#"{ "camera": { "movement_gain": 0.2 }, "vsync": false }"#)
                .unwrap();

        assert_eq!(settings.camera.movement_gain, 0.2);
        assert_eq!(settings.camera.rotation_gain, 0.004);
        assert!(!settings.vsync);
        assert_eq!(settings.projection, Projection::default());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(GameSettings::from_json("{ camera: ").is_err());
    }

    #[test]
    fn missing_file_names_path() {
        let err = GameSettings::load(Path::new("no/such/settings.json")).unwrap_err();
        assert!(err.to_string().contains("no/such/settings.json"));
    }

    #[test]
    fn out_of_range_pitch_epsilon_rejected() {
        assert!(GameSettings::from_json(r#"{ "camera": { "pitch_epsilon": 2.0 } }"#).is_err());
        assert!(GameSettings::from_json(r#"{ "camera": { "pitch_epsilon": -1.0 } }"#).is_err());
    }

    #[test]
    fn impossible_room_rejected() {
        assert!(
            GameSettings::from_json(r#"{ "camera": { "room_extent": [-8.0, 6.0, 12.0] } }"#)
                .is_err()
        );
        assert!(GameSettings::from_json(r#"{ "camera": { "wall_margin": 5.0 } }"#).is_err());
    }

    #[test]
    fn reversed_clip_planes_rejected() {
        let err = GameSettings::from_json(r#"{ "projection": { "near": 5.0, "far": 1.0 } }"#)
            .unwrap_err();
        assert!(format!("{:#}", err).contains("projection"));
    }
}
