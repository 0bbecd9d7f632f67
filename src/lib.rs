pub mod args;
pub mod config;
pub mod error;
pub mod logging;

// MVC Architecture
pub mod controller;
pub mod model;
pub mod view;

pub use error::{Error, Result};
