use anyhow::{Context, Result};
use glam::{Mat4, Vec3};
use std::sync::Arc;
use wgpu::util::DeviceExt;
use wgpu::{
    BindGroup, Buffer, RenderPipeline, Surface, SurfaceConfiguration, TextureFormat, TextureView,
};
use winit::window::Window;

use crate::core::display_context::{OutputSize, Projection};
use crate::core::gpu_context::GpuContext;
use crate::mesh::Mesh;
use crate::settings::GameSettings;
use crate::texture::{self, TextureSource};
use crate::types::{SceneUniform, Vertex};

pub const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth24PlusStencil8;
const TINT_WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// What the renderer needs to rebuild itself from scratch
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub room_extent: Vec3,
    pub texture: TextureSource,
    pub projection: Projection,
    pub clear_color: wgpu::Color,
    pub vsync: bool,
}

impl RenderConfig {
    pub fn new(settings: &GameSettings, texture: TextureSource) -> Self {
        Self {
            room_extent: settings.camera.room().extent,
            texture,
            projection: settings.projection,
            clear_color: settings.clear_color(),
            vsync: settings.vsync,
        }
    }
}

/// Draws the room into a window surface.
///
/// Device-dependent state (device, pipeline, mesh, texture) is built once in
/// `new`; size-dependent state (surface configuration, depth target,
/// projection) is rebuilt by `resize`.
pub struct RoomRenderer {
    gpu: GpuContext,
    surface: Surface<'static>,
    surface_config: SurfaceConfiguration,
    depth_view: TextureView,
    pipeline: RenderPipeline,
    bind_group: BindGroup,
    uniform_buffer: Buffer,
    vertex_buffer: Buffer,
    index_buffer: Buffer,
    index_count: u32,
    size: OutputSize,
    projection: Projection,
    proj_matrix: Mat4,
    clear_color: wgpu::Color,
}

impl RoomRenderer {
    pub fn new(window: Arc<Window>, size: OutputSize, config: &RenderConfig) -> Result<Self> {
        pollster::block_on(Self::new_async(window, size, config))
    }

    async fn new_async(window: Arc<Window>, size: OutputSize, config: &RenderConfig) -> Result<Self> {
        let instance = GpuContext::create_instance();
        let surface = instance
            .create_surface(window)
            .context("Failed to create window surface")?;
        let gpu = GpuContext::new_with_surface(&instance, &surface).await?;
        let device = gpu.device();

        let surface_config = Self::create_surface_config(&surface, &gpu, size, config.vsync)?;
        surface.configure(device, &surface_config);

        let depth_view = Self::create_depth_target(device, size);

        let mesh = Mesh::cuboid(config.room_extent, true);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Room Vertices"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Room Indices"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let image = config.texture.load()?;
        let texture_view = texture::upload(device, gpu.queue(), &image);
        let sampler = texture::create_sampler(device);

        let proj_matrix = config.projection.matrix(size);
        let uniform = SceneUniform::new(Mat4::IDENTITY, Mat4::IDENTITY, proj_matrix, TINT_WHITE);
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene Uniform"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let (pipeline, bind_group) = Self::create_render_pipeline(
            device,
            &uniform_buffer,
            &texture_view,
            &sampler,
            surface_config.format,
        );

        log::info!(
            "Renderer ready: {}x{} {:?}, {} room indices",
            size.width,
            size.height,
            surface_config.format,
            mesh.index_count()
        );

        Ok(Self {
            gpu,
            surface,
            surface_config,
            depth_view,
            pipeline,
            bind_group,
            uniform_buffer,
            vertex_buffer,
            index_buffer,
            index_count: mesh.index_count(),
            size,
            projection: config.projection,
            proj_matrix,
            clear_color: config.clear_color,
        })
    }

    /// Rebuild everything that depends on the output size
    pub fn resize(&mut self, size: OutputSize) {
        self.size = size;
        self.surface_config.width = size.width;
        self.surface_config.height = size.height;
        self.reconfigure();
    }

    /// Reconfigure the surface and depth target at the current size
    pub fn reconfigure(&mut self) {
        self.surface.configure(self.gpu.device(), &self.surface_config);
        self.depth_view = Self::create_depth_target(self.gpu.device(), self.size);
        self.proj_matrix = self.projection.matrix(self.size);
    }

    pub fn render(&mut self, view: Mat4) -> std::result::Result<(), wgpu::SurfaceError> {
        let uniform = SceneUniform::new(Mat4::IDENTITY, view, self.proj_matrix, TINT_WHITE);
        self.gpu
            .queue()
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniform]));

        let output = self.surface.get_current_texture()?;
        let target = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Room Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Room Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(0),
                        store: wgpu::StoreOp::Store,
                    }),
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            render_pass.draw_indexed(0..self.index_count, 0, 0..1);
        }

        self.gpu.queue().submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    /// Driver reported the device removed or reset
    pub fn is_device_lost(&self) -> bool {
        self.gpu.is_lost()
    }

    fn create_surface_config(
        surface: &Surface,
        gpu: &GpuContext,
        size: OutputSize,
        vsync: bool,
    ) -> Result<SurfaceConfiguration> {
        let surface_caps = surface.get_capabilities(gpu.adapter());
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("Surface is not supported by the adapter")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        Ok(SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: if vsync {
                wgpu::PresentMode::AutoVsync
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        })
    }

    fn create_depth_target(device: &wgpu::Device, size: OutputSize) -> TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Stencil"),
            size: wgpu::Extent3d {
                width: size.width,
                height: size.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    fn create_render_pipeline(
        device: &wgpu::Device,
        uniform_buffer: &Buffer,
        texture_view: &TextureView,
        sampler: &wgpu::Sampler,
        surface_format: TextureFormat,
    ) -> (RenderPipeline, BindGroup) {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Room Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("room.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Room Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Room Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(texture_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Room Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Room Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        (pipeline, bind_group)
    }
}
