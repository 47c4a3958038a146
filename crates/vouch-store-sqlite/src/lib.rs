//! SQLite backend for the Vouch auth store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. That single connection also
//! serializes every `call` closure, which is what makes the
//! insert-if-absent, consume-exactly-once, and set-if-null operations
//! atomic with respect to concurrent requests.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
