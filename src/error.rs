use std::path::PathBuf;

use crate::view::gl::ShaderStage;

/// Everything that can stop the sandbox from starting up.
///
/// Per-frame GL calls are not fallible; once the scene is initialized nothing
/// here is produced anymore.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{stage} shader compilation failed: \n{log}")]
    ShaderCompile { stage: ShaderStage, log: String },

    #[error("shader linking failed: \n{log}")]
    ShaderLink { log: String },

    #[error("failed to open shader file: {}", path.display())]
    ShaderRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load texture: {}", path.display())]
    TextureLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to create window: {0}")]
    WindowCreation(String),

    #[error("failed to initialize the OpenGL context: {0}")]
    GraphicsContextInit(String),

    #[error("driver refused to allocate {0}")]
    GpuObject(String),

    #[error("failed to parse config {}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to read config {}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
