//! The slice of OpenGL the sandbox actually talks to.
//!
//! [`Gl`] mirrors the handful of `glow::HasContext` calls used by the shader
//! program and the scene, so the same code runs against a real driver through
//! [`GlowContext`] and against a recording backend in tests.

use std::ffi::{c_void, CStr};
use std::fmt;

use glow::HasContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Pixel layout of texture data handed to [`Gl::tex_image_2d`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgb,
    Rgba,
}

impl PixelFormat {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgb => 3,
            PixelFormat::Rgba => 4,
        }
    }
}

/// OpenGL calls used by the renderer.
///
/// Object creation reports driver failures as `Err(String)` like glow does.
/// Everything else is fire-and-forget: GL records errors in its own state and
/// the sandbox does not poll it per frame.
pub trait Gl {
    type Shader: Copy + fmt::Debug;
    type Program: Copy + fmt::Debug;
    type Buffer: Copy + fmt::Debug;
    type VertexArray: Copy + fmt::Debug;
    type Texture: Copy + fmt::Debug;
    type UniformLocation: Clone + fmt::Debug;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String>;
    fn shader_source(&self, shader: Self::Shader, source: &str);
    fn compile_shader(&self, shader: Self::Shader);
    fn get_shader_compile_status(&self, shader: Self::Shader) -> bool;
    fn get_shader_info_log(&self, shader: Self::Shader) -> String;
    fn delete_shader(&self, shader: Self::Shader);

    fn create_program(&self) -> Result<Self::Program, String>;
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn detach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn link_program(&self, program: Self::Program);
    fn get_program_link_status(&self, program: Self::Program) -> bool;
    fn get_program_info_log(&self, program: Self::Program) -> String;
    fn use_program(&self, program: Option<Self::Program>);
    fn delete_program(&self, program: Self::Program);

    fn get_uniform_location(&self, program: Self::Program, name: &str) -> Option<Self::UniformLocation>;
    fn uniform_matrix_4_f32_slice(&self, location: Option<&Self::UniformLocation>, values: &[f32; 16]);
    fn uniform_1_i32(&self, location: Option<&Self::UniformLocation>, value: i32);

    fn create_vertex_array(&self) -> Result<Self::VertexArray, String>;
    fn bind_vertex_array(&self, vertex_array: Option<Self::VertexArray>);
    fn delete_vertex_array(&self, vertex_array: Self::VertexArray);

    fn create_buffer(&self) -> Result<Self::Buffer, String>;
    /// Binds `buffer` to `GL_ARRAY_BUFFER`.
    fn bind_array_buffer(&self, buffer: Option<Self::Buffer>);
    /// Uploads to the bound array buffer with `GL_STATIC_DRAW`.
    fn array_buffer_data(&self, data: &[u8]);
    /// Reads back from the bound array buffer.
    fn get_array_buffer_sub_data(&self, offset: usize, dst: &mut [u8]);
    fn delete_buffer(&self, buffer: Self::Buffer);
    fn vertex_attrib_pointer_f32(&self, index: u32, components: i32, stride: i32, offset: i32);
    fn enable_vertex_attrib_array(&self, index: u32);

    fn create_texture(&self) -> Result<Self::Texture, String>;
    /// Selects `GL_TEXTURE0 + unit`.
    fn active_texture(&self, unit: u32);
    fn bind_texture_2d(&self, texture: Option<Self::Texture>);
    /// Repeat wrapping, trilinear minification, linear magnification.
    fn set_texture_2d_parameters(&self);
    fn tex_image_2d(&self, width: u32, height: u32, format: PixelFormat, pixels: &[u8]);
    fn generate_mipmap_2d(&self);
    fn delete_texture(&self, texture: Self::Texture);

    fn enable_depth_test(&self);
    fn viewport(&self, width: u32, height: u32);
    fn clear_color_and_depth(&self, color: [f32; 4]);
    fn draw_triangles(&self, first: i32, count: i32);
}

/// A `glow` context that is current on the calling thread.
pub struct GlowContext {
    gl: glow::Context,
}

impl GlowContext {
    /// # Safety
    ///
    /// The OpenGL context the loader resolves against must be current on this
    /// thread for as long as the returned value is used.
    pub unsafe fn from_loader_function_cstr<F>(loader: F) -> Self
    where
        F: FnMut(&CStr) -> *const c_void,
    {
        let gl = unsafe { glow::Context::from_loader_function_cstr(loader) };
        Self { gl }
    }

    pub fn version(&self) -> String {
        let v = self.gl.version();
        format!("{}.{} {}", v.major, v.minor, v.vendor_info)
    }
}

fn gl_dim(value: u32) -> i32 {
    value.min(i32::MAX as u32) as i32
}

// SAFETY (all blocks below): `GlowContext` can only be built while its context
// is current, and every handle passed in was created by this same context.
impl Gl for GlowContext {
    type Shader = glow::NativeShader;
    type Program = glow::NativeProgram;
    type Buffer = glow::NativeBuffer;
    type VertexArray = glow::NativeVertexArray;
    type Texture = glow::NativeTexture;
    type UniformLocation = glow::NativeUniformLocation;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String> {
        let kind = match stage {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        };
        unsafe { self.gl.create_shader(kind) }
    }

    fn shader_source(&self, shader: Self::Shader, source: &str) {
        unsafe { self.gl.shader_source(shader, source) }
    }

    fn compile_shader(&self, shader: Self::Shader) {
        unsafe { self.gl.compile_shader(shader) }
    }

    fn get_shader_compile_status(&self, shader: Self::Shader) -> bool {
        unsafe { self.gl.get_shader_compile_status(shader) }
    }

    fn get_shader_info_log(&self, shader: Self::Shader) -> String {
        unsafe { self.gl.get_shader_info_log(shader) }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe { self.gl.delete_shader(shader) }
    }

    fn create_program(&self) -> Result<Self::Program, String> {
        unsafe { self.gl.create_program() }
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { self.gl.attach_shader(program, shader) }
    }

    fn detach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { self.gl.detach_shader(program, shader) }
    }

    fn link_program(&self, program: Self::Program) {
        unsafe { self.gl.link_program(program) }
    }

    fn get_program_link_status(&self, program: Self::Program) -> bool {
        unsafe { self.gl.get_program_link_status(program) }
    }

    fn get_program_info_log(&self, program: Self::Program) -> String {
        unsafe { self.gl.get_program_info_log(program) }
    }

    fn use_program(&self, program: Option<Self::Program>) {
        unsafe { self.gl.use_program(program) }
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe { self.gl.delete_program(program) }
    }

    fn get_uniform_location(&self, program: Self::Program, name: &str) -> Option<Self::UniformLocation> {
        unsafe { self.gl.get_uniform_location(program, name) }
    }

    fn uniform_matrix_4_f32_slice(&self, location: Option<&Self::UniformLocation>, values: &[f32; 16]) {
        unsafe { self.gl.uniform_matrix_4_f32_slice(location, false, values) }
    }

    fn uniform_1_i32(&self, location: Option<&Self::UniformLocation>, value: i32) {
        unsafe { self.gl.uniform_1_i32(location, value) }
    }

    fn create_vertex_array(&self) -> Result<Self::VertexArray, String> {
        unsafe { self.gl.create_vertex_array() }
    }

    fn bind_vertex_array(&self, vertex_array: Option<Self::VertexArray>) {
        unsafe { self.gl.bind_vertex_array(vertex_array) }
    }

    fn delete_vertex_array(&self, vertex_array: Self::VertexArray) {
        unsafe { self.gl.delete_vertex_array(vertex_array) }
    }

    fn create_buffer(&self) -> Result<Self::Buffer, String> {
        unsafe { self.gl.create_buffer() }
    }

    fn bind_array_buffer(&self, buffer: Option<Self::Buffer>) {
        unsafe { self.gl.bind_buffer(glow::ARRAY_BUFFER, buffer) }
    }

    fn array_buffer_data(&self, data: &[u8]) {
        unsafe { self.gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, data, glow::STATIC_DRAW) }
    }

    fn get_array_buffer_sub_data(&self, offset: usize, dst: &mut [u8]) {
        unsafe {
            self.gl
                .get_buffer_sub_data(glow::ARRAY_BUFFER, offset.min(i32::MAX as usize) as i32, dst)
        }
    }

    fn delete_buffer(&self, buffer: Self::Buffer) {
        unsafe { self.gl.delete_buffer(buffer) }
    }

    fn vertex_attrib_pointer_f32(&self, index: u32, components: i32, stride: i32, offset: i32) {
        unsafe {
            self.gl
                .vertex_attrib_pointer_f32(index, components, glow::FLOAT, false, stride, offset)
        }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(index) }
    }

    fn create_texture(&self) -> Result<Self::Texture, String> {
        unsafe { self.gl.create_texture() }
    }

    fn active_texture(&self, unit: u32) {
        unsafe { self.gl.active_texture(glow::TEXTURE0 + unit) }
    }

    fn bind_texture_2d(&self, texture: Option<Self::Texture>) {
        unsafe { self.gl.bind_texture(glow::TEXTURE_2D, texture) }
    }

    fn set_texture_2d_parameters(&self) {
        unsafe {
            self.gl
                .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::REPEAT as i32);
            self.gl
                .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::REPEAT as i32);
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::LINEAR_MIPMAP_LINEAR as i32,
            );
            self.gl
                .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
        }
    }

    fn tex_image_2d(&self, width: u32, height: u32, format: PixelFormat, pixels: &[u8]) {
        let (internal, external) = match format {
            PixelFormat::Rgb => (glow::RGB8, glow::RGB),
            PixelFormat::Rgba => (glow::RGBA8, glow::RGBA),
        };
        unsafe {
            // RGB rows are not 4-byte aligned for odd widths
            self.gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                internal as i32,
                gl_dim(width),
                gl_dim(height),
                0,
                external,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(pixels)),
            );
        }
    }

    fn generate_mipmap_2d(&self) {
        unsafe { self.gl.generate_mipmap(glow::TEXTURE_2D) }
    }

    fn delete_texture(&self, texture: Self::Texture) {
        unsafe { self.gl.delete_texture(texture) }
    }

    fn enable_depth_test(&self) {
        unsafe { self.gl.enable(glow::DEPTH_TEST) }
    }

    fn viewport(&self, width: u32, height: u32) {
        unsafe { self.gl.viewport(0, 0, gl_dim(width), gl_dim(height)) }
    }

    fn clear_color_and_depth(&self, color: [f32; 4]) {
        unsafe {
            self.gl.clear_color(color[0], color[1], color[2], color[3]);
            self.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
    }

    fn draw_triangles(&self, first: i32, count: i32) {
        unsafe { self.gl.draw_arrays(glow::TRIANGLES, first, count) }
    }
}

/// Recording backend for tests: no driver, but buffers keep their bytes and
/// shaders compile or fail on demand.
#[cfg(test)]
pub mod fake {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::{Gl, PixelFormat, ShaderStage};

    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        CompileShader(ShaderStage),
        LinkProgram(u32),
        UseProgram(Option<u32>),
        DeleteShader(u32),
        DeleteProgram(u32),
        DeleteBuffer(u32),
        DeleteVertexArray(u32),
        DeleteTexture(u32),
        UniformLookup(String),
        UniformMatrix(Option<String>, [f32; 16]),
        UniformInt(Option<String>, i32),
        ActiveTexture(u32),
        BindTexture(Option<u32>),
        TexImage { width: u32, height: u32, format: PixelFormat, len: usize },
        Draw { first: i32, count: i32 },
    }

    #[derive(Default)]
    struct State {
        next_id: u32,
        shader_stages: HashMap<u32, ShaderStage>,
        buffers: HashMap<u32, Vec<u8>>,
        bound_buffer: Option<u32>,
        calls: Vec<Call>,
    }

    #[derive(Default)]
    pub struct FakeGl {
        /// Stages that report a compile failure.
        pub failing_stages: Vec<ShaderStage>,
        pub fail_link: bool,
        /// Uniform names the "linked" program exposes; others resolve to `None`.
        pub active_uniforms: Vec<&'static str>,
        state: RefCell<State>,
    }

    impl FakeGl {
        pub fn with_cube_uniforms() -> Self {
            Self {
                active_uniforms: vec!["u_model", "u_view", "u_proj", "u_texture1", "u_texture2"],
                ..Default::default()
            }
        }

        /// Cube uniforms, with `stages` reporting compile failures.
        pub fn with_failing_stages(stages: &[ShaderStage]) -> Self {
            Self { failing_stages: stages.to_vec(), ..Self::with_cube_uniforms() }
        }

        pub fn with_failing_link() -> Self {
            Self { fail_link: true, ..Self::with_cube_uniforms() }
        }

        pub fn with_uniforms(names: &[&'static str]) -> Self {
            Self { active_uniforms: names.to_vec(), ..Default::default() }
        }

        pub fn calls(&self) -> Vec<Call> {
            self.state.borrow().calls.clone()
        }

        pub fn live_buffers(&self) -> usize {
            self.state.borrow().buffers.len()
        }

        fn next_id(&self) -> u32 {
            let mut state = self.state.borrow_mut();
            state.next_id += 1;
            state.next_id
        }

        fn record(&self, call: Call) {
            self.state.borrow_mut().calls.push(call);
        }
    }

    impl Gl for FakeGl {
        type Shader = u32;
        type Program = u32;
        type Buffer = u32;
        type VertexArray = u32;
        type Texture = u32;
        type UniformLocation = String;

        fn create_shader(&self, stage: ShaderStage) -> Result<u32, String> {
            let id = self.next_id();
            self.state.borrow_mut().shader_stages.insert(id, stage);
            Ok(id)
        }

        fn shader_source(&self, _shader: u32, _source: &str) {}

        fn compile_shader(&self, shader: u32) {
            let stage = self.state.borrow().shader_stages[&shader];
            self.record(Call::CompileShader(stage));
        }

        fn get_shader_compile_status(&self, shader: u32) -> bool {
            let stage = self.state.borrow().shader_stages[&shader];
            !self.failing_stages.contains(&stage)
        }

        fn get_shader_info_log(&self, shader: u32) -> String {
            let stage = self.state.borrow().shader_stages[&shader];
            format!("0:1({stage}): error: syntax error, unexpected IDENTIFIER")
        }

        fn delete_shader(&self, shader: u32) {
            self.record(Call::DeleteShader(shader));
        }

        fn create_program(&self) -> Result<u32, String> {
            Ok(self.next_id())
        }

        fn attach_shader(&self, _program: u32, _shader: u32) {}

        fn detach_shader(&self, _program: u32, _shader: u32) {}

        fn link_program(&self, program: u32) {
            self.record(Call::LinkProgram(program));
        }

        fn get_program_link_status(&self, _program: u32) -> bool {
            !self.fail_link
        }

        fn get_program_info_log(&self, _program: u32) -> String {
            "error: vertex output `tex_coord` not read by fragment".to_string()
        }

        fn use_program(&self, program: Option<u32>) {
            self.record(Call::UseProgram(program));
        }

        fn delete_program(&self, program: u32) {
            self.record(Call::DeleteProgram(program));
        }

        fn get_uniform_location(&self, _program: u32, name: &str) -> Option<String> {
            self.record(Call::UniformLookup(name.to_string()));
            self.active_uniforms
                .iter()
                .find(|n| **n == name)
                .map(|n| n.to_string())
        }

        fn uniform_matrix_4_f32_slice(&self, location: Option<&String>, values: &[f32; 16]) {
            self.record(Call::UniformMatrix(location.cloned(), *values));
        }

        fn uniform_1_i32(&self, location: Option<&String>, value: i32) {
            self.record(Call::UniformInt(location.cloned(), value));
        }

        fn create_vertex_array(&self) -> Result<u32, String> {
            Ok(self.next_id())
        }

        fn bind_vertex_array(&self, _vertex_array: Option<u32>) {}

        fn delete_vertex_array(&self, vertex_array: u32) {
            self.record(Call::DeleteVertexArray(vertex_array));
        }

        fn create_buffer(&self) -> Result<u32, String> {
            let id = self.next_id();
            self.state.borrow_mut().buffers.insert(id, Vec::new());
            Ok(id)
        }

        fn bind_array_buffer(&self, buffer: Option<u32>) {
            self.state.borrow_mut().bound_buffer = buffer;
        }

        fn array_buffer_data(&self, data: &[u8]) {
            let mut state = self.state.borrow_mut();
            if let Some(id) = state.bound_buffer {
                state.buffers.insert(id, data.to_vec());
            }
        }

        fn get_array_buffer_sub_data(&self, offset: usize, dst: &mut [u8]) {
            let state = self.state.borrow();
            if let Some(bytes) = state.bound_buffer.and_then(|id| state.buffers.get(&id)) {
                let end = (offset + dst.len()).min(bytes.len());
                let src = &bytes[offset.min(end)..end];
                dst[..src.len()].copy_from_slice(src);
            }
        }

        fn delete_buffer(&self, buffer: u32) {
            self.state.borrow_mut().buffers.remove(&buffer);
            self.record(Call::DeleteBuffer(buffer));
        }

        fn vertex_attrib_pointer_f32(&self, _index: u32, _components: i32, _stride: i32, _offset: i32) {}

        fn enable_vertex_attrib_array(&self, _index: u32) {}

        fn create_texture(&self) -> Result<u32, String> {
            Ok(self.next_id())
        }

        fn active_texture(&self, unit: u32) {
            self.record(Call::ActiveTexture(unit));
        }

        fn bind_texture_2d(&self, texture: Option<u32>) {
            self.record(Call::BindTexture(texture));
        }

        fn set_texture_2d_parameters(&self) {}

        fn tex_image_2d(&self, width: u32, height: u32, format: PixelFormat, pixels: &[u8]) {
            self.record(Call::TexImage { width, height, format, len: pixels.len() });
        }

        fn generate_mipmap_2d(&self) {}

        fn delete_texture(&self, texture: u32) {
            self.record(Call::DeleteTexture(texture));
        }

        fn enable_depth_test(&self) {}

        fn viewport(&self, _width: u32, _height: u32) {}

        fn clear_color_and_depth(&self, _color: [f32; 4]) {}

        fn draw_triangles(&self, first: i32, count: i32) {
            self.record(Call::Draw { first, count });
        }
    }
}
