//! # Repository Module
//!
//! SQLite repository implementations for Trolley.
//!
//! ## Available Repositories
//!
//! - [`kv::KvRepository`] - Key-value blobs (`kv_store` table)

pub mod kv;
