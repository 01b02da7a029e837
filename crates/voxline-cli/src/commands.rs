//! Subcommand definitions.

use clap::{Args, Subcommand};

/// Top-level commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Synthesize text and play it, highlighting words as they are spoken
    Speak(SpeakArgs),

    /// List the voices available to the configured API key
    Voices,

    /// View or change persisted settings
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for `voxline speak`.
///
/// Omitted voice, model and tuning values fall back to the persisted
/// settings and then to built-in defaults.
#[derive(Args, Debug)]
pub struct SpeakArgs {
    /// Text to speak (read from stdin when omitted)
    pub text: Option<String>,

    /// Voice ID
    #[arg(long)]
    pub voice: Option<String>,

    /// Model ID
    #[arg(long)]
    pub model: Option<String>,

    /// Voice stability (0.0-1.0)
    #[arg(long)]
    pub stability: Option<f32>,

    /// Similarity boost (0.0-1.0)
    #[arg(long = "similarity-boost")]
    pub similarity_boost: Option<f32>,

    /// Style exaggeration
    #[arg(long)]
    pub style: Option<f32>,

    /// Speaker boost
    #[arg(long = "speaker-boost")]
    pub speaker_boost: Option<bool>,

    /// Play without printing the text as it is spoken
    #[arg(long = "no-highlight")]
    pub no_highlight: bool,
}

/// Settings commands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show one setting
    Get {
        /// Setting name (e.g. `voice`, `stability`) or raw key
        key: String,
    },
    /// Persist a setting
    Set {
        /// Setting name (e.g. `voice`, `stability`) or raw key
        key: String,
        value: String,
    },
    /// Show every known setting
    List,
    /// Print the location of the settings file
    Path,
}
