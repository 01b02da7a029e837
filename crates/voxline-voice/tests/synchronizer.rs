//! Integration tests for `PlaybackSynchronizer` driven by live sessions.

mod common;

use std::time::Duration;

use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;
use voxline_core::{ExactAlignment, SpeakRequest, SyncTick, TimedSynthesis};
use voxline_voice::{PlaybackSynchronizer, SessionHandle};

use common::{Harness, MockBackend, Reply};

/// A track of `n` entries starting every 100 ms.
fn uniform_timed(n: u32) -> TimedSynthesis {
    TimedSynthesis {
        audio: b"timed-audio".to_vec(),
        alignment: Some(ExactAlignment {
            characters: (0..n).map(|_| "a".to_string()).collect(),
            character_start_times_seconds: (0..n).map(|i| f64::from(i) * 0.1).collect(),
        }),
    }
}

async fn start(h: &Harness, text: &str) -> SessionHandle {
    h.manager
        .speak(SpeakRequest::new(text))
        .await
        .unwrap()
        .into_session()
        .unwrap()
}

#[tokio::test]
async fn tick_follows_playback_position() {
    let h = Harness::new(MockBackend::new());
    let session = start(&h, "Hi there").await;
    let sound = h.engine.sound(0);
    let mut sync = PlaybackSynchronizer::new();

    // Nothing highlighted before audio advances.
    let tick = sync.tick(&session);
    assert_eq!(tick, SyncTick::NONE);
    assert_eq!(tick.signed_index(), -1);

    let mut previous = None;
    for (position, expected) in [(0.05, 0), (0.15, 1), (0.2, 2), (0.3, 4), (0.46, 6), (5.0, 7)] {
        sound.set_position(position);
        let tick = sync.tick(&session);
        assert_eq!(tick.index, Some(expected), "position {position}");
        assert!(tick.index >= previous);
        assert!(!tick.should_scroll);
        previous = tick.index;
    }
}

#[tokio::test]
async fn dead_session_yields_no_highlight() {
    let h = Harness::new(MockBackend::new());
    let session = start(&h, "Hi there").await;
    let mut sync = PlaybackSynchronizer::new();

    h.engine.sound(0).set_position(0.2);
    assert_eq!(sync.tick(&session).index, Some(2));

    h.manager.stop();
    assert_eq!(sync.tick(&session), SyncTick::NONE);
}

#[tokio::test]
async fn scroll_hint_fires_every_twenty_entries() {
    let h = Harness::new(MockBackend::new().with_timed(Reply::Ok(uniform_timed(41))));
    let session = start(&h, "a long passage").await;
    let sound = h.engine.sound(0);
    let mut sync = PlaybackSynchronizer::new();

    sound.set_position(1.95);
    let tick = sync.tick(&session);
    assert_eq!(tick.index, Some(19));
    assert!(!tick.should_scroll);

    sound.set_position(2.05);
    let tick = sync.tick(&session);
    assert_eq!(tick.index, Some(20));
    assert!(tick.should_scroll);

    // Same entry again: no repeated hint.
    let tick = sync.tick(&session);
    assert_eq!(tick.index, Some(20));
    assert!(!tick.should_scroll);

    sound.set_position(2.15);
    assert!(!sync.tick(&session).should_scroll);

    sound.set_position(4.05);
    let tick = sync.tick(&session);
    assert_eq!(tick.index, Some(40));
    assert!(tick.should_scroll);
}

#[tokio::test]
async fn new_session_resets_scroll_memory() {
    let h = Harness::new(MockBackend::new().with_timed(Reply::Ok(uniform_timed(41))));
    let mut sync = PlaybackSynchronizer::new();

    let first = start(&h, "first").await;
    h.engine.sound(0).set_position(2.05);
    assert!(sync.tick(&first).should_scroll);

    let second = start(&h, "second").await;
    h.engine.sound(1).set_position(2.05);
    let tick = sync.tick(&second);
    assert_eq!(tick.index, Some(20));
    assert!(tick.should_scroll);
}

#[tokio::test(start_paused = true)]
async fn watch_yields_changes_and_ends_with_session() {
    let h = Harness::new(MockBackend::new());
    let session = start(&h, "Hi there").await;
    let sound = h.engine.sound(0);

    let stream = PlaybackSynchronizer::watch_every(
        session.clone(),
        Duration::from_millis(10),
        CancellationToken::new(),
    );
    tokio::pin!(stream);

    sound.set_position(0.15);
    let tick = stream.next().await.expect("first highlight");
    assert_eq!(tick.index, Some(1));

    sound.set_position(0.5);
    let tick = stream.next().await.expect("second highlight");
    assert_eq!(tick.index, Some(7));

    h.manager.stop();
    assert_eq!(stream.next().await, Some(SyncTick::NONE));
    assert_eq!(stream.next().await, None);
}

#[tokio::test(start_paused = true)]
async fn watch_ends_on_cancel() {
    let h = Harness::new(MockBackend::new());
    let session = start(&h, "Hi there").await;
    let cancel = CancellationToken::new();

    let stream = PlaybackSynchronizer::watch(session, cancel.clone());
    tokio::pin!(stream);

    cancel.cancel();
    assert_eq!(stream.next().await, None);
    assert!(h.manager.is_busy());
}
