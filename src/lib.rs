pub mod config;
pub mod db;
pub mod error;

pub use config::Config;
pub use db::{Account, AccountPatch, AccountStore, NewAccount};
pub use error::StoreError;
