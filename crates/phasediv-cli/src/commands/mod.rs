//! CLI command implementations.

pub mod modules;
pub mod preset;
pub mod render;
