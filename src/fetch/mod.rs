// src/fetch/mod.rs
pub mod client;
pub mod source;

pub use client::PageClient;
pub use source::DocumentSource;
