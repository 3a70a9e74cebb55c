//! Command-line surface: argument parsing, the command registry, and the
//! find/rewrite handlers.
pub mod args;
pub mod commands;
pub mod registry;
