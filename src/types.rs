use glam::Mat4;

/// Mesh vertex as laid out in the vertex buffer
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Per-frame transforms for the room shader
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniform {
    pub world: [[f32; 4]; 4],
    pub view_proj: [[f32; 4]; 4],
    /// Multiplied with the sampled texel; alpha unused
    pub tint: [f32; 4],
}

impl SceneUniform {
    pub fn new(world: Mat4, view: Mat4, proj: Mat4, tint: [f32; 4]) -> Self {
        Self {
            world: world.to_cols_array_2d(),
            view_proj: (proj * view).to_cols_array_2d(),
            tint,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_stride_matches_attributes() {
        let layout = Vertex::layout();
        assert_eq!(layout.array_stride, 32);
        assert_eq!(layout.attributes.len(), 3);
        assert_eq!(layout.attributes[2].offset, 24);
    }

    #[test]
    fn scene_uniform_is_uniform_aligned() {
        assert_eq!(std::mem::size_of::<SceneUniform>() % 16, 0);
    }

    #[test]
    fn scene_uniform_combines_view_and_projection() {
        let view = Mat4::from_translation(glam::Vec3::new(1.0, 2.0, 3.0));
        let proj = Mat4::from_scale(glam::Vec3::splat(2.0));
        let uniform = SceneUniform::new(Mat4::IDENTITY, view, proj, [1.0; 4]);

        assert_eq!(uniform.view_proj, (proj * view).to_cols_array_2d());
        assert_eq!(uniform.world, Mat4::IDENTITY.to_cols_array_2d());
    }
}
