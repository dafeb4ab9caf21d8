use anyhow::{Context, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use wgpu::{
    Adapter, Device, DeviceDescriptor, DeviceLostReason, Features, Instance, Limits, Queue,
    Surface,
};

/// Adapter, device and queue for one window surface
///
/// Cheap to clone (Arc). `is_lost` flips once the driver reports the device
/// removed or reset; the owner is expected to rebuild everything.
#[derive(Clone)]
pub struct GpuContext {
    adapter: Arc<Adapter>,
    device: Arc<Device>,
    queue: Arc<Queue>,
    lost: Arc<AtomicBool>,
}

impl GpuContext {
    /// Create a GPU context compatible with a surface (for window rendering)
    pub async fn new_with_surface(instance: &Instance, surface: &Surface<'_>) -> Result<Self> {
        let adapter = Self::request_adapter(instance, surface).await?;
        let info = adapter.get_info();
        log::info!("Using adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = Self::request_device(&adapter).await?;

        let lost = Arc::new(AtomicBool::new(false));
        let flag = lost.clone();
        device.set_device_lost_callback(move |reason, message| {
            if is_unexpected_loss(reason) {
                log::warn!("Device lost ({:?}): {}", reason, message);
                flag.store(true, Ordering::SeqCst);
            }
        });

        Ok(Self {
            adapter: Arc::new(adapter),
            device: Arc::new(device),
            queue: Arc::new(queue),
            lost,
        })
    }

    pub fn create_instance() -> Instance {
        Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        })
    }

    pub fn adapter(&self) -> &Adapter {
        &self.adapter
    }

    /// Get reference to the device
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Get reference to the queue
    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    /// True once the device-lost callback has fired
    pub fn is_lost(&self) -> bool {
        self.lost.load(Ordering::SeqCst)
    }

    async fn request_adapter(instance: &Instance, surface: &Surface<'_>) -> Result<Adapter> {
        instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(surface),
                force_fallback_adapter: false,
            })
            .await
            .context("Failed to find appropriate adapter")
    }

    async fn request_device(adapter: &Adapter) -> Result<(Device, Queue)> {
        adapter
            .request_device(&DeviceDescriptor {
                label: Some("Room Device"),
                required_features: Features::empty(),
                required_limits: Limits::downlevel_defaults().using_resolution(adapter.limits()),
                memory_hints: Default::default(),
                experimental_features: Default::default(),
                trace: Default::default(),
            })
            .await
            .context("Failed to create device")
    }
}

/// `Destroyed` is reported for our own teardown: shutdown and `recreate`
fn is_unexpected_loss(reason: DeviceLostReason) -> bool {
    !matches!(reason, DeviceLostReason::Destroyed)
}
