pub mod descriptor;
pub mod presets;

pub use descriptor::{DescriptorError, ServiceDescriptor};
pub use presets::{preset, PRESET_NAMES};
