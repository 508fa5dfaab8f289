//! PostgreSQL storage for accounts, profiles, listings and activity logs

pub mod client;
pub mod connection;
pub mod error;
pub mod operations;
pub mod schema;
pub mod types;

pub use client::Database;
pub use connection::DbConfig;
pub use error::{DbError, Result};
