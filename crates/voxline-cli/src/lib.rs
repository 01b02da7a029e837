//! Command-line front end for voxline.
//!
//! `main.rs` parses arguments, calls [`bootstrap`] and dispatches to
//! [`handlers`].

pub mod bootstrap;
pub mod commands;
pub mod handlers;
pub mod parser;

pub use bootstrap::{CliContext, bootstrap, init_tracing};
pub use commands::{Commands, ConfigCommand, SpeakArgs};
pub use parser::Cli;
