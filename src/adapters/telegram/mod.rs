//! Telegram adapters built on grammers.

pub mod auth_adapter;
pub mod client;
pub mod mapper;

pub use auth_adapter::GrammersAuthAdapter;
pub use client::{GrammersTgGateway, connect};
