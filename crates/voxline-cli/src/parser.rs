//! Main CLI parser and top-level argument handling.

use std::path::PathBuf;

use clap::Parser;

use crate::commands::Commands;

/// Speak text aloud with synchronized highlighting.
#[derive(Parser)]
#[command(name = "voxline")]
#[command(about = "Speak text through a timed speech backend with live highlighting")]
#[command(version)]
pub struct Cli {
    /// Directory holding the persisted `.env` settings file
    #[arg(long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Synthesis API base URL
    #[arg(long = "base-url", env = "VOXLINE_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// HTTP request timeout in seconds
    #[arg(long = "timeout", env = "VOXLINE_TIMEOUT_SECS", global = true)]
    pub timeout_secs: Option<u64>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    use crate::commands::ConfigCommand;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_args() {
        let cli = Cli::parse_from([
            "voxline",
            "--verbose",
            "--data-dir",
            "/tmp/voxline",
            "--timeout",
            "5",
            "voices",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/voxline")));
        assert_eq!(cli.timeout_secs, Some(5));
        assert!(matches!(cli.command, Some(Commands::Voices)));
    }

    #[test]
    fn test_speak_args() {
        let cli = Cli::parse_from([
            "voxline",
            "speak",
            "Hello world",
            "--voice",
            "abc",
            "--stability",
            "0.4",
            "--speaker-boost",
            "false",
        ]);
        let Some(Commands::Speak(args)) = cli.command else {
            panic!("expected speak");
        };
        assert_eq!(args.text.as_deref(), Some("Hello world"));
        assert_eq!(args.voice.as_deref(), Some("abc"));
        assert_eq!(args.stability, Some(0.4));
        assert_eq!(args.speaker_boost, Some(false));
        assert!(args.model.is_none());
    }

    #[test]
    fn test_config_set() {
        let cli = Cli::parse_from(["voxline", "config", "set", "stability", "0.7"]);
        let Some(Commands::Config { command }) = cli.command else {
            panic!("expected config");
        };
        assert!(matches!(
            command,
            ConfigCommand::Set { key, value } if key == "stability" && value == "0.7"
        ));
    }
}
