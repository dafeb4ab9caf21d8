pub mod camera;
pub mod cli;
pub mod core;
pub mod graphics;
pub mod mesh;
pub mod renderer;
pub mod settings;
pub mod texture;
pub mod types;

pub use camera::{CameraController, CameraSettings, CameraState, InputSample, RoomBounds};
