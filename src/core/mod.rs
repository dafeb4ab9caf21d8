pub mod clock;
pub mod controller;
pub mod device_state;
pub mod display_context;
pub mod gpu_context;
pub mod input_adapter;
pub mod timer;

pub use clock::{Clock, StepTime};
pub use controller::{Button, Controller};
pub use device_state::{DeviceState, PresentOutcome};
pub use display_context::{OutputSize, Projection};
pub use gpu_context::GpuContext;
pub use input_adapter::{MouseMode, WinitController};
