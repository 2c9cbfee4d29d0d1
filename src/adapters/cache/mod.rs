pub mod filesystem;
pub mod memory;

pub use filesystem::FilesystemCache;
pub use memory::InMemoryCache;
