//! Dedicated audio output thread, isolating the `!Send` rodio stream from the
//! async runtime.
//!
//! `rodio::OutputStream` is `!Send` on some platforms. It is confined to a
//! single OS thread and sinks are created there on request. A `Sink` itself
//! is `Send + Sync`, so once created it is handed back to the caller and
//! controlled directly.

use std::io::Cursor;
use std::sync::mpsc;
use std::thread;

use rodio::{Decoder, OutputStream, Sink};
use voxline_core::PlaybackError;

// ── Commands ───────────────────────────────────────────────────────

/// A command sent to the audio thread.
enum AudioCommand {
    /// Decode `bytes` into a new, paused sink.
    Load {
        bytes: Vec<u8>,
        reply: mpsc::Sender<Result<Sink, PlaybackError>>,
    },

    /// Shut down the audio thread, releasing the output stream.
    Shutdown,
}

// ── Handle (Send + Sync proxy) ─────────────────────────────────────

/// `Send + Sync` handle to the dedicated audio output thread.
///
/// Request–reply methods block the caller until the audio thread responds;
/// call them from `spawn_blocking` in async code.
pub struct AudioThreadHandle {
    cmd_tx: mpsc::Sender<AudioCommand>,
    thread: Option<thread::JoinHandle<()>>,
}

impl AudioThreadHandle {
    /// Spawn the audio thread, open the default output device, and return
    /// the handle.
    ///
    /// Output-device errors are propagated back via a one-shot init channel.
    pub fn spawn() -> Result<Self, PlaybackError> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<AudioCommand>();
        let (init_tx, init_rx) = mpsc::channel::<Result<(), PlaybackError>>();

        let thread = thread::Builder::new()
            .name("voxline-audio".into())
            .spawn(move || {
                Self::run(&cmd_rx, &init_tx);
            })
            .map_err(|e| PlaybackError::Output(format!("failed to spawn audio thread: {e}")))?;

        // Wait for the audio thread to finish initialisation.
        init_rx.recv().map_err(|_| PlaybackError::EngineGone)??;

        Ok(Self {
            cmd_tx,
            thread: Some(thread),
        })
    }

    /// Decode `bytes` into a paused sink on the output device.
    pub fn load(&self, bytes: Vec<u8>) -> Result<Sink, PlaybackError> {
        self.send_and_recv(|reply| AudioCommand::Load { bytes, reply })
    }

    // ── Internal helpers ───────────────────────────────────────────

    /// Send a command that expects a `Result<T, PlaybackError>` reply.
    /// Channel failures map to [`PlaybackError::EngineGone`].
    fn send_and_recv<T>(
        &self,
        build: impl FnOnce(mpsc::Sender<Result<T, PlaybackError>>) -> AudioCommand,
    ) -> Result<T, PlaybackError> {
        let (tx, rx) = mpsc::channel();
        self.cmd_tx
            .send(build(tx))
            .map_err(|_| PlaybackError::EngineGone)?;
        rx.recv().map_err(|_| PlaybackError::EngineGone)?
    }

    // ── Audio thread event loop ────────────────────────────────────

    /// The body of the dedicated audio thread. Owns the `OutputStream` for
    /// its entire lifetime.
    fn run(cmd_rx: &mpsc::Receiver<AudioCommand>, init_tx: &mpsc::Sender<Result<(), PlaybackError>>) {
        let (_stream, stream_handle) = match OutputStream::try_default() {
            Ok(pair) => pair,
            Err(e) => {
                let _ = init_tx.send(Err(PlaybackError::Output(e.to_string())));
                return;
            }
        };

        tracing::info!("Audio output initialized on default output device");

        if init_tx.send(Ok(())).is_err() {
            return;
        }

        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                AudioCommand::Load { bytes, reply } => {
                    let result = decode(bytes).and_then(|source| {
                        let sink = Sink::try_new(&stream_handle)
                            .map_err(|e| PlaybackError::Output(e.to_string()))?;
                        sink.pause();
                        sink.append(source);
                        Ok(sink)
                    });
                    let _ = reply.send(result);
                }

                AudioCommand::Shutdown => break,
            }
        }

        tracing::debug!("Audio thread shutting down");
    }
}

/// Decode encoded audio (mp3, wav) held in memory.
pub fn decode(bytes: Vec<u8>) -> Result<Decoder<Cursor<Vec<u8>>>, PlaybackError> {
    if bytes.is_empty() {
        return Err(PlaybackError::Decode("no audio data".to_string()));
    }
    Decoder::new(Cursor::new(bytes)).map_err(|e| PlaybackError::Decode(e.to_string()))
}

impl Drop for AudioThreadHandle {
    fn drop(&mut self) {
        // Best-effort shutdown; the thread may already be dead.
        let _ = self.cmd_tx.send(AudioCommand::Shutdown);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}
