// VIEW: OpenGL context, shader program, textures and drawing
pub mod gl;
pub mod gpu_init;
pub mod render;
pub mod shader;
pub mod texture;

pub use gl::{Gl, GlowContext};
pub use gpu_init::GlContext;
pub use render::Scene;
pub use shader::{ShaderProgram, ShaderSources};
pub use texture::{Channels, TextureSpec};
