// cli.rs - Command-line interface configuration
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::core::display_context::{OutputSize, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::settings::GameSettings;
use crate::texture::TextureSource;

#[derive(Parser, Debug, Clone)]
#[command(name = "room-walker")]
#[command(about = "Free-fly camera in a textured room", long_about = None)]
pub struct Cli {
    /// Initial window width in pixels
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: u32,

    /// Initial window height in pixels
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    pub height: u32,

    /// Room texture image; a checker pattern is generated when omitted
    #[arg(long)]
    pub texture: Option<PathBuf>,

    /// JSON settings file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Run updates at a fixed rate instead of once per frame
    #[arg(long = "fixed-hz", value_parser = parse_rate)]
    pub fixed_hz: Option<f32>,
}

/// Update rate in hertz: finite and above zero
fn parse_rate(text: &str) -> Result<f32, String> {
    let hz: f32 = text.parse().map_err(|e| format!("{}", e))?;
    if hz.is_finite() && hz > 0.0 {
        Ok(hz)
    } else {
        Err(format!("rate must be a positive number of hertz, got {}", text))
    }
}

impl Cli {
    pub fn window_size(&self) -> OutputSize {
        OutputSize::new(self.width, self.height)
    }

    pub fn texture_source(&self) -> TextureSource {
        match &self.texture {
            Some(path) => TextureSource::File(path.clone()),
            None => TextureSource::default(),
        }
    }

    pub fn settings(&self) -> Result<GameSettings> {
        match &self.config {
            Some(path) => GameSettings::load(path),
            None => Ok(GameSettings::default()),
        }
    }
}
