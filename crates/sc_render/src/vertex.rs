#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ScreenVertex {
    pub position: [f32; 2],
    pub tex_coords: [f32; 2],
}

impl ScreenVertex {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ScreenVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // position
                wgpu::VertexAttribute {
                    offset: std::mem::offset_of!(ScreenVertex, position) as wgpu::BufferAddress,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                // tex_coords
                wgpu::VertexAttribute {
                    offset: std::mem::offset_of!(ScreenVertex, tex_coords) as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Two triangles covering clip space. Texture v grows downward so canvas row 0
/// lands at the top of the window.
pub const FULLSCREEN_QUAD: [ScreenVertex; 4] = [
    ScreenVertex {
        position: [-1.0, -1.0],
        tex_coords: [0.0, 1.0],
    },
    ScreenVertex {
        position: [1.0, -1.0],
        tex_coords: [1.0, 1.0],
    },
    ScreenVertex {
        position: [1.0, 1.0],
        tex_coords: [1.0, 0.0],
    },
    ScreenVertex {
        position: [-1.0, 1.0],
        tex_coords: [0.0, 0.0],
    },
];

pub const FULLSCREEN_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];
