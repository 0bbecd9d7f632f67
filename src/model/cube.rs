use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub tex_coord: [f32; 2],
}

impl Vertex {
    pub const STRIDE: i32 = std::mem::size_of::<Vertex>() as i32;
    pub const POS_OFFSET: i32 = 0;
    pub const TEX_COORD_OFFSET: i32 = std::mem::size_of::<[f32; 3]>() as i32;

    pub const POS_LOCATION: u32 = 0;
    pub const TEX_COORD_LOCATION: u32 = 1;
}

const fn v(pos: [f32; 3], tex_coord: [f32; 2]) -> Vertex {
    Vertex { pos, tex_coord }
}

pub const VERTEX_COUNT: usize = 36;

/// Unit cube centred on the origin, two triangles per face, no index buffer.
pub const CUBE_VERTICES: [Vertex; VERTEX_COUNT] = [
    // back
    v([-0.5, -0.5, -0.5], [0.0, 0.0]),
    v([0.5, -0.5, -0.5], [1.0, 0.0]),
    v([0.5, 0.5, -0.5], [1.0, 1.0]),
    v([0.5, 0.5, -0.5], [1.0, 1.0]),
    v([-0.5, 0.5, -0.5], [0.0, 1.0]),
    v([-0.5, -0.5, -0.5], [0.0, 0.0]),
    // front
    v([-0.5, -0.5, 0.5], [0.0, 0.0]),
    v([0.5, -0.5, 0.5], [1.0, 0.0]),
    v([0.5, 0.5, 0.5], [1.0, 1.0]),
    v([0.5, 0.5, 0.5], [1.0, 1.0]),
    v([-0.5, 0.5, 0.5], [0.0, 1.0]),
    v([-0.5, -0.5, 0.5], [0.0, 0.0]),
    // left
    v([-0.5, 0.5, 0.5], [1.0, 0.0]),
    v([-0.5, 0.5, -0.5], [1.0, 1.0]),
    v([-0.5, -0.5, -0.5], [0.0, 1.0]),
    v([-0.5, -0.5, -0.5], [0.0, 1.0]),
    v([-0.5, -0.5, 0.5], [0.0, 0.0]),
    v([-0.5, 0.5, 0.5], [1.0, 0.0]),
    // right
    v([0.5, 0.5, 0.5], [1.0, 0.0]),
    v([0.5, 0.5, -0.5], [1.0, 1.0]),
    v([0.5, -0.5, -0.5], [0.0, 1.0]),
    v([0.5, -0.5, -0.5], [0.0, 1.0]),
    v([0.5, -0.5, 0.5], [0.0, 0.0]),
    v([0.5, 0.5, 0.5], [1.0, 0.0]),
    // bottom
    v([-0.5, -0.5, -0.5], [0.0, 1.0]),
    v([0.5, -0.5, -0.5], [1.0, 1.0]),
    v([0.5, -0.5, 0.5], [1.0, 0.0]),
    v([0.5, -0.5, 0.5], [1.0, 0.0]),
    v([-0.5, -0.5, 0.5], [0.0, 0.0]),
    v([-0.5, -0.5, -0.5], [0.0, 1.0]),
    // top
    v([-0.5, 0.5, -0.5], [0.0, 1.0]),
    v([0.5, 0.5, -0.5], [1.0, 1.0]),
    v([0.5, 0.5, 0.5], [1.0, 0.0]),
    v([0.5, 0.5, 0.5], [1.0, 0.0]),
    v([-0.5, 0.5, 0.5], [0.0, 0.0]),
    v([-0.5, 0.5, -0.5], [0.0, 1.0]),
];

pub fn cube_bytes() -> &'static [u8] {
    bytemuck::cast_slice(&CUBE_VERTICES)
}
