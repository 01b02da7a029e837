//! Speak command handler: synthesize, play and print text as it is spoken.

use std::io::{Read, Write};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use voxline_core::{
    AlignmentTrack, PlaybackEngine, SessionState, SpeakRequest, SynthesisBackend,
    VoiceSettingsOverrides,
};
use voxline_synth::DefaultSynthClient;
use voxline_voice::{PlaybackSynchronizer, RodioPlaybackEngine, SessionManager, SpeechEvent};

use crate::bootstrap::CliContext;
use crate::commands::SpeakArgs;

/// Execute the speak command. Ctrl-C stops playback.
pub async fn execute(ctx: &CliContext, args: SpeakArgs) -> Result<()> {
    let no_highlight = args.no_highlight;
    let request = build_request(args)?;

    let backend: Arc<dyn SynthesisBackend> =
        Arc::new(DefaultSynthClient::new(&ctx.synth_config)?);
    let engine: Arc<dyn PlaybackEngine> =
        Arc::new(RodioPlaybackEngine::new().context("Failed to open audio output")?);
    let (manager, events) = SessionManager::new(backend, engine, ctx.store.clone());
    tokio::spawn(report_events(events));

    let outcome = tokio::select! {
        outcome = manager.speak(request) => outcome?,
        _ = tokio::signal::ctrl_c() => {
            manager.stop();
            println!("Cancelled.");
            return Ok(());
        }
    };
    let Some(session) = outcome.into_session() else {
        println!("Cancelled.");
        return Ok(());
    };

    let mut highlighter = Highlighter::new(session.alignment(), &session.request().text);
    let cancel = CancellationToken::new();
    let ticks = PlaybackSynchronizer::watch(session.clone(), cancel.clone());
    tokio::pin!(ticks);

    let mut stdout = std::io::stdout();
    loop {
        tokio::select! {
            tick = ticks.next() => {
                let Some(tick) = tick else { break };
                if tick.should_scroll {
                    tracing::debug!(index = tick.signed_index(), "Scroll point");
                }
                if let Some(index) = tick.index.filter(|_| !no_highlight) {
                    write!(stdout, "{}", highlighter.advance_to(index))?;
                    stdout.flush()?;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                manager.stop();
            }
        }
    }
    cancel.cancel();

    let state = session.finished().await;
    if state == SessionState::Completed && !no_highlight {
        write!(stdout, "{}", highlighter.rest())?;
    }
    writeln!(stdout)?;

    match state {
        SessionState::Completed => Ok(()),
        SessionState::Stopped => {
            println!("Stopped.");
            Ok(())
        }
        other => bail!("Playback ended in state '{}'", other.label()),
    }
}

fn build_request(args: SpeakArgs) -> Result<SpeakRequest> {
    let text = match args.text {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read text from stdin")?;
            buf
        }
    };

    let settings = VoiceSettingsOverrides {
        stability: args.stability,
        similarity_boost: args.similarity_boost,
        style: args.style,
        speaker_boost: args.speaker_boost,
    };

    let mut request = SpeakRequest::new(text).with_settings(settings);
    if let Some(voice) = args.voice {
        request = request.with_voice(voice);
    }
    if let Some(model) = args.model {
        request = request.with_model(model);
    }
    Ok(request)
}

async fn report_events(mut events: mpsc::UnboundedReceiver<SpeechEvent>) {
    while let Some(event) = events.recv().await {
        match event {
            SpeechEvent::Fallback { reason, .. } => {
                eprintln!("(timed alignment unavailable, highlighting is estimated: {reason})");
            }
            SpeechEvent::StateChanged { session, state } => {
                tracing::debug!(%session, state = state.label(), "Speech state");
            }
        }
    }
}

// ── Highlighter ────────────────────────────────────────────────────

/// Turns highlighted indices into the text spoken since the last tick.
///
/// Exact tracks have one entry per character; estimated tracks have one per
/// word.
struct Highlighter {
    units: Vec<String>,
    printed: usize,
}

impl Highlighter {
    fn new(track: &AlignmentTrack, text: &str) -> Self {
        let units = if track.is_estimated() {
            text.split_whitespace().map(|word| format!("{word} ")).collect()
        } else {
            track.entries().iter().map(|e| e.character.clone()).collect()
        };
        Self { units, printed: 0 }
    }

    /// Text from the last printed unit up to and including `index`.
    fn advance_to(&mut self, index: usize) -> String {
        let end = (index + 1).min(self.units.len());
        if end <= self.printed {
            return String::new();
        }
        let out = self.units[self.printed..end].concat();
        self.printed = end;
        out
    }

    /// Everything not yet printed.
    fn rest(&mut self) -> String {
        self.advance_to(self.units.len().saturating_sub(1))
    }
}
