pub mod descriptor_builder;
pub mod link_extractor;
pub mod navigation_index;
pub mod path_resolver;
pub mod relay;

pub use descriptor_builder::*;
pub use link_extractor::extract;
pub use navigation_index::*;
pub use path_resolver::{is_absolute_url, parent_dir, resolve};
pub use relay::*;
