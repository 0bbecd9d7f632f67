use std::fs;
use std::path::Path;

use glam::Mat4;
use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};
use crate::view::gl::{Gl, ShaderStage};

pub const CUBE_VERTEX_SHADER: &str = include_str!("shaders/cube.vert");
pub const CUBE_FRAGMENT_SHADER: &str = include_str!("shaders/cube.frag");

/// Sampler uniforms in texture-unit order.
pub const SAMPLER_UNIFORMS: [&str; 2] = ["u_texture1", "u_texture2"];

/// GLSL text for the two stages of a program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

impl Default for ShaderSources {
    fn default() -> Self {
        Self {
            vertex: CUBE_VERTEX_SHADER.to_string(),
            fragment: CUBE_FRAGMENT_SHADER.to_string(),
        }
    }
}

impl ShaderSources {
    /// The built-in cube shaders, with either stage replaced by a file on disk.
    pub fn with_overrides(vertex: Option<&Path>, fragment: Option<&Path>) -> Result<Self> {
        let mut sources = Self::default();
        if let Some(path) = vertex {
            sources.vertex = read_shader_file(path)?;
        }
        if let Some(path) = fragment {
            sources.fragment = read_shader_file(path)?;
        }
        Ok(sources)
    }
}

fn read_shader_file(path: &Path) -> Result<String> {
    info!("Reading shader {}", path.display());
    fs::read_to_string(path).map_err(|source| Error::ShaderRead {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixUniform {
    Model,
    View,
    Proj,
}

impl MatrixUniform {
    pub const fn name(self) -> &'static str {
        match self {
            MatrixUniform::Model => "u_model",
            MatrixUniform::View => "u_view",
            MatrixUniform::Proj => "u_proj",
        }
    }
}

/// Locations resolved once after linking. `None` is what GL reports as -1:
/// the uniform is unused or was optimized out, and uploads to it do nothing.
struct UniformLocations<G: Gl> {
    model: Option<G::UniformLocation>,
    view: Option<G::UniformLocation>,
    proj: Option<G::UniformLocation>,
    samplers: [Option<G::UniformLocation>; 2],
}

impl<G: Gl> UniformLocations<G> {
    fn resolve(gl: &G, program: G::Program) -> Self {
        let lookup = |name: &str| {
            let location = gl.get_uniform_location(program, name);
            if location.is_none() {
                warn!("uniform {name} is not active in the cube program");
            }
            location
        };
        Self {
            model: lookup(MatrixUniform::Model.name()),
            view: lookup(MatrixUniform::View.name()),
            proj: lookup(MatrixUniform::Proj.name()),
            samplers: [lookup(SAMPLER_UNIFORMS[0]), lookup(SAMPLER_UNIFORMS[1])],
        }
    }

    fn matrix(&self, uniform: MatrixUniform) -> Option<&G::UniformLocation> {
        match uniform {
            MatrixUniform::Model => self.model.as_ref(),
            MatrixUniform::View => self.view.as_ref(),
            MatrixUniform::Proj => self.proj.as_ref(),
        }
    }
}

/// A linked vertex + fragment program with its uniform locations cached.
///
/// Binding and uniform uploads go through the GL context's single "current
/// program", so they affect whatever is drawn next on this context.
pub struct ShaderProgram<G: Gl> {
    program: G::Program,
    uniforms: UniformLocations<G>,
}

impl<G: Gl> ShaderProgram<G> {
    /// Compiles both stages, links them and resolves the known uniforms.
    ///
    /// Both stages are always compiled so every failing log reaches the log
    /// output; the returned error names the first failing stage. Linking is
    /// never attempted after a compile failure.
    pub fn create(gl: &G, sources: &ShaderSources) -> Result<Self> {
        let vertex = compile_stage(gl, ShaderStage::Vertex, &sources.vertex);
        let fragment = compile_stage(gl, ShaderStage::Fragment, &sources.fragment);

        let (vertex, fragment) = match (vertex, fragment) {
            (Ok(vertex), Ok(fragment)) => (vertex, fragment),
            (Err(err), other) | (other, Err(err)) => {
                if let Ok(shader) = other {
                    gl.delete_shader(shader);
                }
                return Err(err);
            }
        };

        let program = match gl.create_program() {
            Ok(program) => program,
            Err(e) => {
                gl.delete_shader(vertex);
                gl.delete_shader(fragment);
                return Err(Error::GpuObject(format!("a shader program ({e})")));
            }
        };

        gl.attach_shader(program, vertex);
        gl.attach_shader(program, fragment);
        gl.link_program(program);

        gl.detach_shader(program, vertex);
        gl.detach_shader(program, fragment);
        gl.delete_shader(vertex);
        gl.delete_shader(fragment);

        if !gl.get_program_link_status(program) {
            let log = gl.get_program_info_log(program);
            error!("shader linking failed:\n{log}");
            gl.delete_program(program);
            return Err(Error::ShaderLink { log });
        }
        debug!(?program, "linked shader program");

        gl.use_program(Some(program));
        let uniforms = UniformLocations::resolve(gl, program);
        let shader = Self { program, uniforms };
        for (slot, unit) in [(0, 0), (1, 1)] {
            shader.set_sampler(gl, slot, unit);
        }
        Ok(shader)
    }

    pub fn use_program(&self, gl: &G) {
        gl.use_program(Some(self.program));
    }

    /// Uploads `matrix` (column-major) to one of the cached matrix uniforms.
    /// The program must be current.
    pub fn set_mat4(&self, gl: &G, uniform: MatrixUniform, matrix: &Mat4) {
        gl.uniform_matrix_4_f32_slice(self.uniforms.matrix(uniform), &matrix.to_cols_array());
    }

    /// Points sampler `slot` (0 = `u_texture1`, 1 = `u_texture2`) at texture unit `unit`.
    pub fn set_sampler(&self, gl: &G, slot: usize, unit: u32) {
        if let Some(location) = self.uniforms.samplers.get(slot) {
            gl.uniform_1_i32(location.as_ref(), unit as i32);
        }
    }

    pub fn destroy(self, gl: &G) {
        debug!(program = ?self.program, "deleting shader program");
        gl.delete_program(self.program);
    }
}

fn compile_stage<G: Gl>(gl: &G, stage: ShaderStage, source: &str) -> Result<G::Shader> {
    let shader = gl
        .create_shader(stage)
        .map_err(|e| Error::GpuObject(format!("a {stage} shader ({e})")))?;
    gl.shader_source(shader, source);
    gl.compile_shader(shader);

    if gl.get_shader_compile_status(shader) {
        return Ok(shader);
    }
    let log = gl.get_shader_info_log(shader);
    error!("{stage} shader compilation failed:\n{log}");
    gl.delete_shader(shader);
    Err(Error::ShaderCompile { stage, log })
}
