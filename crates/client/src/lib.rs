//! `entsync-client` — HTTP access to the remote entity store.
//!
//! Blocking reqwest client (no Tokio runtime required). Implements the
//! engine's `EntityStore` and `IdAllocator` traits: filtered entity
//! lookup, full-document replace, and batched id allocation, all
//! authenticated with a static `x-apikey` header.

pub mod client;

pub use client::StoreClient;
