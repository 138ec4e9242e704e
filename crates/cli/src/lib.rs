//! `wattcast-cli`: command handlers and presentation for the `wattcast` binary.

pub mod commands;
pub mod render;
