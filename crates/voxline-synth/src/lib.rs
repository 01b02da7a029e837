//! ElevenLabs-compatible HTTP adapter for voxline.
//!
//! Implements the [`SynthesisBackend`](voxline_core::SynthesisBackend) and
//! [`VoiceCatalog`](voxline_core::VoiceCatalog) ports. Internal errors
//! ([`SynthError`]) are mapped to [`BackendError`](voxline_core::BackendError)
//! at the port boundary.
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]
// SynthClient<B> is meant to be used through the port traits, not its
// internal generic structure
#![allow(private_interfaces, private_bounds)]

mod client;
mod config;
mod endpoints;
mod error;
mod http;
mod models;
mod port;

// ============================================================================
// Public API
// ============================================================================

// Client
pub use client::{DefaultSynthClient, SynthClient};

// Configuration
pub use config::SynthClientConfig;

// Errors
pub use error::SynthError;
