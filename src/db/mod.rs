//! Database module: account rows, schema and the pool-backed store.
//!
//! Layout:
//! - `models.rs`: row struct plus insert/patch inputs
//! - `schema.rs`: SQL DDL for initializing the database (SQLite)
//! - `sqlite.rs`: `AccountStore`, the only component that touches the pool

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{Account, AccountPatch, NewAccount};
pub use schema::SQLITE_INIT;
pub use sqlite::{AccountStore, SqlitePool};
