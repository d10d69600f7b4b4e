//! HTTP API: server, routing, and request/response mapping.

pub mod app;
pub mod config;

/// `From` conversions between entities and DTOs, plus `map_all`.
pub mod mapping;
