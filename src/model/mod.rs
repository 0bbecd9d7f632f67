// MODEL: Camera pose, cube geometry and per-instance transforms
pub mod camera;
pub mod cube;
pub mod instance;

pub use camera::{Camera, CameraKey};
pub use cube::{Vertex, CUBE_VERTICES};
pub use instance::Instance;
