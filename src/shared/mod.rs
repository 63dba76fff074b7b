//! Cross-cutting concerns shared by every layer.

pub mod config;
