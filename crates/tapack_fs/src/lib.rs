mod file_system;
mod memory;
#[cfg(feature = "os")]
mod os;

use std::sync::Arc;

pub use crate::{file_system::FileSystem, memory::MemoryFileSystem};
#[cfg(feature = "os")]
pub use os::OsFileSystem;

pub type SharedFileSystem = Arc<dyn FileSystem>;
