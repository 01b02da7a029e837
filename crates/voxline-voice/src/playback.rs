//! Audio playback via `rodio`.
//!
//! [`RodioPlaybackEngine`] implements the [`PlaybackEngine`] port. Each
//! loaded sound is a paused `Sink`; a watcher thread publishes natural
//! completion on the handle's status channel.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use rodio::Sink;
use tokio::sync::watch;
use voxline_core::{AudioSource, PlaybackEngine, PlaybackError, PlaybackHandle, PlaybackStatus};

use crate::audio_thread::AudioThreadHandle;

// ── Engine ─────────────────────────────────────────────────────────

/// Playback engine on the default output device.
pub struct RodioPlaybackEngine {
    audio: Arc<AudioThreadHandle>,
}

impl RodioPlaybackEngine {
    /// Open the default output device.
    pub fn new() -> Result<Self, PlaybackError> {
        let audio = AudioThreadHandle::spawn()?;
        Ok(Self {
            audio: Arc::new(audio),
        })
    }
}

#[async_trait]
impl PlaybackEngine for RodioPlaybackEngine {
    async fn load(&self, source: AudioSource) -> Result<Box<dyn PlaybackHandle>, PlaybackError> {
        let bytes = match source {
            AudioSource::Bytes(bytes) => bytes,
            AudioSource::Uri(uri) => {
                let path = uri.strip_prefix("file://").unwrap_or(&uri);
                if path.contains("://") {
                    return Err(PlaybackError::Unsupported(uri));
                }
                tokio::fs::read(path)
                    .await
                    .map_err(|e| PlaybackError::Decode(format!("{path}: {e}")))?
            }
        };

        let audio = Arc::clone(&self.audio);
        let sink = tokio::task::spawn_blocking(move || audio.load(bytes))
            .await
            .map_err(|_| PlaybackError::EngineGone)??;

        tracing::debug!("Audio loaded (paused)");
        Ok(Box::new(RodioPlaybackHandle::new(sink)))
    }
}

// ── Handle ─────────────────────────────────────────────────────────

/// One loaded sound.
pub struct RodioPlaybackHandle {
    sink: Arc<Sink>,
    status: Arc<watch::Sender<PlaybackStatus>>,
    watcher_started: AtomicBool,
}

impl RodioPlaybackHandle {
    pub(crate) fn new(sink: Sink) -> Self {
        let (status, _) = watch::channel(PlaybackStatus::Loaded);
        Self {
            sink: Arc::new(sink),
            status: Arc::new(status),
            watcher_started: AtomicBool::new(false),
        }
    }

    /// Move to `next` unless playback is already over.
    fn transition(&self, next: PlaybackStatus) -> bool {
        self.status.send_if_modified(|current| {
            if current.is_done() {
                false
            } else {
                *current = next;
                true
            }
        })
    }

    /// Spawn a background thread that blocks until the sink drains or is
    /// stopped. Only a drain while `Playing` counts as natural completion.
    fn spawn_completion_watcher(&self) {
        if self.watcher_started.swap(true, Ordering::SeqCst) {
            return;
        }

        let sink = Arc::clone(&self.sink);
        let status = Arc::clone(&self.status);

        // `sleep_until_end()` returns when the queue drains or `stop()`
        // drops the queued sources.
        std::thread::spawn(move || {
            sink.sleep_until_end();

            let finished = status.send_if_modified(|current| {
                if *current == PlaybackStatus::Playing {
                    *current = PlaybackStatus::Finished;
                    true
                } else {
                    false
                }
            });
            if finished {
                tracing::debug!("Playback finished naturally");
            }
        });
    }
}

impl PlaybackHandle for RodioPlaybackHandle {
    fn play(&self) -> Result<(), PlaybackError> {
        if self.status.borrow().is_done() {
            return Err(PlaybackError::Output("sound already released".to_string()));
        }
        self.sink.play();
        self.transition(PlaybackStatus::Playing);
        self.spawn_completion_watcher();
        Ok(())
    }

    fn position_seconds(&self) -> f64 {
        self.sink.get_pos().as_secs_f64()
    }

    fn status(&self) -> watch::Receiver<PlaybackStatus> {
        self.status.subscribe()
    }

    fn stop(&self) {
        if self.transition(PlaybackStatus::Stopped) {
            tracing::debug!("Audio playback stopped");
        }
        self.sink.stop();
    }

    fn unload(&self) {
        self.sink.stop();
        self.status.send_replace(PlaybackStatus::Unloaded);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idle_handle() -> (RodioPlaybackHandle, rodio::queue::SourcesQueueOutput<f32>) {
        let (sink, queue) = Sink::new_idle();
        (RodioPlaybackHandle::new(sink), queue)
    }

    #[test]
    fn loads_paused() {
        let (handle, _queue) = idle_handle();
        assert_eq!(*handle.status().borrow(), PlaybackStatus::Loaded);
        assert!(handle.position_seconds().abs() < f64::EPSILON);
    }

    #[test]
    fn stop_then_unload() {
        let (handle, _queue) = idle_handle();
        handle.stop();
        assert_eq!(*handle.status().borrow(), PlaybackStatus::Stopped);

        // Idempotent
        handle.stop();
        handle.unload();
        handle.unload();
        assert_eq!(*handle.status().borrow(), PlaybackStatus::Unloaded);
    }

    #[test]
    fn play_after_unload_fails() {
        let (handle, _queue) = idle_handle();
        handle.unload();
        assert!(handle.play().is_err());
    }

    #[tokio::test]
    async fn empty_sink_finishes_immediately() {
        let (handle, _queue) = idle_handle();
        let mut status = handle.status();

        handle.play().unwrap();

        let ended = tokio::time::timeout(
            std::time::Duration::from_secs(2),
            status.wait_for(|s| s.is_done()),
        )
        .await
        .expect("watcher should publish completion")
        .map(|s| *s)
        .unwrap();
        assert_eq!(ended, PlaybackStatus::Finished);
    }
}
