use glam::{Mat4, Vec3};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::model::cube::{cube_bytes, Vertex, VERTEX_COUNT};
use crate::model::{Camera, Instance};
use crate::view::gl::Gl;
use crate::view::shader::{MatrixUniform, ShaderProgram};
use crate::view::texture::{self, TextureSpec};

pub const FOV_Y_DEG: f32 = 45.0;
pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 100.0;

/// Perspective for a `width` x `height` viewport. A minimized window reports
/// zero-sized dimensions, which are treated as 1 to keep the aspect finite.
pub fn projection(width: u32, height: u32) -> Mat4 {
    let aspect = width.max(1) as f32 / height.max(1) as f32;
    Mat4::perspective_rh_gl(FOV_Y_DEG.to_radians(), aspect, Z_NEAR, Z_FAR)
}

/// Everything needed to draw the textured cubes: the program, the cube's
/// vertex array and buffer, two textures and where to put each copy.
pub struct Scene<G: Gl> {
    shader: ShaderProgram<G>,
    vao: G::VertexArray,
    vbo: G::Buffer,
    textures: [G::Texture; 2],
    instances: Vec<Instance>,
}

impl<G: Gl> Scene<G> {
    /// Takes ownership of `shader`; on failure it is destroyed along with
    /// anything already allocated.
    pub fn initialize(
        gl: &G,
        shader: ShaderProgram<G>,
        positions: &[Vec3],
        texture_specs: &[TextureSpec; 2],
    ) -> Result<Self> {
        let images = match texture::load_pair(texture_specs) {
            Ok(images) => images,
            Err(err) => {
                shader.destroy(gl);
                return Err(err);
            }
        };

        let (vao, vbo) = match upload_cube(gl) {
            Ok(objects) => objects,
            Err(err) => {
                shader.destroy(gl);
                return Err(err);
            }
        };

        let mut textures = Vec::with_capacity(images.len());
        for (unit, image) in images.iter().enumerate() {
            gl.active_texture(unit as u32);
            match image.upload(gl) {
                Ok(texture) => textures.push(texture),
                Err(err) => {
                    textures.into_iter().for_each(|t| gl.delete_texture(t));
                    gl.delete_buffer(vbo);
                    gl.delete_vertex_array(vao);
                    shader.destroy(gl);
                    return Err(err);
                }
            }
            debug!(
                unit,
                path = %texture_specs[unit].path.display(),
                width = image.width,
                height = image.height,
                "uploaded texture"
            );
        }
        let textures = [textures[0], textures[1]];

        gl.enable_depth_test();

        let instances = Instance::from_positions(positions);
        info!(instances = instances.len(), "scene initialized");
        Ok(Self { shader, vao, vbo, textures, instances })
    }

    pub fn clear(&self, gl: &G, color: [f32; 4]) {
        gl.clear_color_and_depth(color);
    }

    /// Draws every instance from `camera`. `elapsed` drives the spinning cubes.
    pub fn render_frame(&self, gl: &G, camera: &Camera, width: u32, height: u32, elapsed: f32) {
        gl.viewport(width.max(1), height.max(1));

        let proj = projection(width, height);
        let view = camera.view_matrix();

        self.shader.use_program(gl);
        for (unit, texture) in self.textures.iter().enumerate() {
            gl.active_texture(unit as u32);
            gl.bind_texture_2d(Some(*texture));
        }
        gl.bind_vertex_array(Some(self.vao));

        self.shader.set_mat4(gl, MatrixUniform::View, &view);
        self.shader.set_mat4(gl, MatrixUniform::Proj, &proj);

        for instance in &self.instances {
            self.shader.set_mat4(gl, MatrixUniform::Model, &instance.model_matrix(elapsed));
            gl.draw_triangles(0, VERTEX_COUNT as i32);
        }
    }

    /// Copies the vertex buffer back from the GPU.
    pub fn read_back_vertices(&self, gl: &G) -> Vec<u8> {
        let mut bytes = vec![0u8; cube_bytes().len()];
        gl.bind_array_buffer(Some(self.vbo));
        gl.get_array_buffer_sub_data(0, &mut bytes);
        gl.bind_array_buffer(None);
        bytes
    }

    pub fn shutdown(self, gl: &G) {
        gl.bind_vertex_array(None);
        gl.delete_vertex_array(self.vao);
        gl.delete_buffer(self.vbo);
        for texture in self.textures {
            gl.delete_texture(texture);
        }
        self.shader.destroy(gl);
        info!("scene shut down");
    }
}

fn upload_cube<G: Gl>(gl: &G) -> Result<(G::VertexArray, G::Buffer)> {
    let vao = gl
        .create_vertex_array()
        .map_err(|e| Error::GpuObject(format!("a vertex array ({e})")))?;
    let vbo = match gl.create_buffer() {
        Ok(vbo) => vbo,
        Err(e) => {
            gl.delete_vertex_array(vao);
            return Err(Error::GpuObject(format!("a vertex buffer ({e})")));
        }
    };

    gl.bind_vertex_array(Some(vao));
    gl.bind_array_buffer(Some(vbo));
    gl.array_buffer_data(cube_bytes());

    gl.vertex_attrib_pointer_f32(Vertex::POS_LOCATION, 3, Vertex::STRIDE, Vertex::POS_OFFSET);
    gl.enable_vertex_attrib_array(Vertex::POS_LOCATION);
    gl.vertex_attrib_pointer_f32(
        Vertex::TEX_COORD_LOCATION,
        2,
        Vertex::STRIDE,
        Vertex::TEX_COORD_OFFSET,
    );
    gl.enable_vertex_attrib_array(Vertex::TEX_COORD_LOCATION);

    gl.bind_array_buffer(None);
    gl.bind_vertex_array(None);
    debug!(bytes = cube_bytes().len(), "uploaded cube vertices");
    Ok((vao, vbo))
}
