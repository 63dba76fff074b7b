//! Infrastructure adapters. Implement ports.
//!
//! Telegram, terminal UI, output rendering. Map errors to DomainError.

pub mod output;
pub mod telegram;
pub mod ui;
