//! Request handlers orchestrating domain and storage.

pub mod cache;
