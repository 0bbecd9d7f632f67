// CONTROLLER: Input mapping and the per-frame update
pub mod frame_loop;
pub mod input;

pub use frame_loop::{FrameLoop, FrameTime};
pub use input::{InputEvent, InputState, KeyBindings, PointerTracker};
