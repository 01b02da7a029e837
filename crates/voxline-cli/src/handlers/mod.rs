//! Command handlers.

pub mod config;
pub mod speak;
pub mod voices;
