// Adapters layer: concrete implementations of the domain ports (http, catalogs, stores, caches).

pub mod bin_packing;
pub mod cache;
pub mod catalog;
pub mod database;
pub mod store;

pub use database::SqliteDatabase;
