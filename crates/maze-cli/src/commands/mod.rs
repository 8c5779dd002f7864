//! CLI command modules

pub mod config;
pub mod render;
pub mod train;
