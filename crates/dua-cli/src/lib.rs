//! CLI library components for the dua browser.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod repl;
pub mod summary;
