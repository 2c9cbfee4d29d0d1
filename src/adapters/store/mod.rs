pub mod memory;
pub mod sqlite;

pub use memory::InMemoryPackingResultStore;
pub use sqlite::SqlitePackingResultStore;
