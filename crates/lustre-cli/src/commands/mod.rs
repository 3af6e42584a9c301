//! CLI command implementations.

pub mod presets;
pub mod process;
pub mod rooms;
