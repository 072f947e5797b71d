//! SQLite backend for the Warung payment engine.
mod sqlite_impl;

pub mod db;

pub use sqlite_impl::SqliteDatabase;
