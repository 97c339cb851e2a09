mod application;
pub mod data;
mod render;
mod runtime_config;

pub use application::{Application, ApplicationError};
pub use render::{RenderError, TreeRenderer};
pub use runtime_config::RuntimeConfig;
