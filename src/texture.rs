use anyhow::{ensure, Context, Result};
use image::{Rgba, RgbaImage};
use std::path::PathBuf;

const CHECKER_LIGHT: Rgba<u8> = Rgba([200, 196, 186, 255]);
const CHECKER_DARK: Rgba<u8> = Rgba([96, 92, 88, 255]);

/// Where the room texture comes from
#[derive(Debug, Clone, PartialEq)]
pub enum TextureSource {
    /// Any format the `image` crate is built with
    File(PathBuf),
    /// Generated tiles, used when no file is configured
    Checker { size: u32, cells: u32 },
}

impl Default for TextureSource {
    fn default() -> Self {
        TextureSource::Checker {
            size: 256,
            cells: 8,
        }
    }
}

impl TextureSource {
    pub fn load(&self) -> Result<RgbaImage> {
        match self {
            TextureSource::File(path) => {
                let image = image::open(path)
                    .with_context(|| format!("Failed to load texture {}", path.display()))?;
                Ok(image.to_rgba8())
            }
            TextureSource::Checker { size, cells } => checker(*size, *cells),
        }
    }
}

fn checker(size: u32, cells: u32) -> Result<RgbaImage> {
    ensure!(size > 0 && cells > 0, "checker texture needs a non-zero size");
    let cell = (size / cells).max(1);

    Ok(RgbaImage::from_fn(size, size, |x, y| {
        if ((x / cell) + (y / cell)) % 2 == 0 {
            CHECKER_LIGHT
        } else {
            CHECKER_DARK
        }
    }))
}

/// Upload an RGBA image as a sampled sRGB texture
pub fn upload(device: &wgpu::Device, queue: &wgpu::Queue, image: &RgbaImage) -> wgpu::TextureView {
    let (width, height) = image.dimensions();
    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Room Texture"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        texture.as_image_copy(),
        image.as_raw(),
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        size,
    );

    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

pub fn create_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("Room Sampler"),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        address_mode_w: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    })
}
