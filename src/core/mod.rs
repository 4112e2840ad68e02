//! Core translation engine module

pub mod config;
pub mod decoder;
pub mod errors;
pub mod language;
pub mod models;
pub mod registry;
pub mod transport;
