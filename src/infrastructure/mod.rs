//! Infrastructure layer: I/O implementations and DI container

pub mod di;
pub mod traits;

pub use di::ServiceContainer;
pub use traits::{FileSystem, RealFileSystem};
