//! tg-digest: day-by-day summary of the most active discussions in a Telegram group.
//! Hexagonal Architecture: domain engine, ports, use cases, adapters.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
