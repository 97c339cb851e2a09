mod view_config;

pub use view_config::{ViewConfig, ViewConfigError};
