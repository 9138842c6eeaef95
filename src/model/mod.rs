pub mod coordinate;
pub mod endpoint;
pub mod navigation;
pub mod resource;

pub use coordinate::*;
pub use endpoint::*;
pub use navigation::*;
pub use resource::*;
