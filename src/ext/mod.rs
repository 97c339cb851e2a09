mod absolute_path_ext;
mod system_time_ext;

pub use absolute_path_ext::AbsolutePathExt;
pub use system_time_ext::SystemTimeExt;
