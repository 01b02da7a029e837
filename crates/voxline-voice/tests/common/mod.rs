//! Hand-written port doubles shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Notify, mpsc, watch};
use tokio_util::sync::CancellationToken;
use voxline_core::settings::API_KEY;
use voxline_core::{
    AudioSource, BackendError, ExactAlignment, MemoryCredentialStore, PlaybackEngine,
    PlaybackError, PlaybackHandle, PlaybackStatus, SynthesisBackend, SynthesisRequest,
    TimedSynthesis,
};
use voxline_voice::{SessionManager, SpeechEvent};

// ── Backend ────────────────────────────────────────────────────────

/// What the mock backend does for one call.
#[derive(Clone)]
pub enum Reply<T> {
    Ok(T),
    Fail(BackendError),
    /// Wait until the caller cancels.
    Hang,
    /// Succeed after a delay (cancellable).
    Delayed(Duration, T),
}

pub struct MockBackend {
    timed: Mutex<VecDeque<Reply<TimedSynthesis>>>,
    plain: Mutex<VecDeque<Reply<Vec<u8>>>>,
    default_timed: Mutex<Reply<TimedSynthesis>>,
    default_plain: Mutex<Reply<Vec<u8>>>,
    pub timed_calls: AtomicUsize,
    pub plain_calls: AtomicUsize,
    pub last_request: Mutex<Option<SynthesisRequest>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            timed: Mutex::new(VecDeque::new()),
            plain: Mutex::new(VecDeque::new()),
            default_timed: Mutex::new(Reply::Ok(hi_there_timed())),
            default_plain: Mutex::new(Reply::Ok(b"plain-audio".to_vec())),
            timed_calls: AtomicUsize::new(0),
            plain_calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Reply used for every timed call without a queued reply.
    pub fn with_timed(self, reply: Reply<TimedSynthesis>) -> Self {
        *self.default_timed.lock().unwrap() = reply;
        self
    }

    pub fn with_plain(self, reply: Reply<Vec<u8>>) -> Self {
        *self.default_plain.lock().unwrap() = reply;
        self
    }

    /// Queue a reply for the next timed call only.
    pub fn queue_timed(&self, reply: Reply<TimedSynthesis>) {
        self.timed.lock().unwrap().push_back(reply);
    }

    pub fn set_timed(&self, reply: Reply<TimedSynthesis>) {
        *self.default_timed.lock().unwrap() = reply;
    }

    pub fn timed_calls(&self) -> usize {
        self.timed_calls.load(Ordering::SeqCst)
    }

    pub fn plain_calls(&self) -> usize {
        self.plain_calls.load(Ordering::SeqCst)
    }

    fn next<T: Clone>(queue: &Mutex<VecDeque<Reply<T>>>, default: &Mutex<Reply<T>>) -> Reply<T> {
        queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| default.lock().unwrap().clone())
    }
}

async fn play_out<T>(reply: Reply<T>, cancel: &CancellationToken) -> Result<T, BackendError> {
    match reply {
        Reply::Ok(value) => Ok(value),
        Reply::Fail(e) => Err(e),
        Reply::Hang => {
            cancel.cancelled().await;
            Err(BackendError::Cancelled)
        }
        Reply::Delayed(delay, value) => {
            tokio::select! {
                () = cancel.cancelled() => Err(BackendError::Cancelled),
                () = tokio::time::sleep(delay) => Ok(value),
            }
        }
    }
}

#[async_trait]
impl SynthesisBackend for MockBackend {
    async fn synthesize_timed(
        &self,
        request: &SynthesisRequest,
        _api_key: &str,
        cancel: &CancellationToken,
    ) -> Result<TimedSynthesis, BackendError> {
        self.timed_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        let reply = Self::next(&self.timed, &self.default_timed);
        play_out(reply, cancel).await
    }

    async fn synthesize_plain(
        &self,
        request: &SynthesisRequest,
        _api_key: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, BackendError> {
        self.plain_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        let reply = Self::next(&self.plain, &self.default_plain);
        play_out(reply, cancel).await
    }
}

pub fn hi_there_alignment() -> ExactAlignment {
    ExactAlignment {
        characters: ["H", "i", " ", "t", "h", "e", "r", "e"]
            .iter()
            .map(ToString::to_string)
            .collect(),
        character_start_times_seconds: vec![0.0, 0.1, 0.18, 0.22, 0.3, 0.35, 0.41, 0.47],
    }
}

pub fn hi_there_timed() -> TimedSynthesis {
    TimedSynthesis {
        audio: b"timed-audio".to_vec(),
        alignment: Some(hi_there_alignment()),
    }
}

pub fn status_500() -> BackendError {
    BackendError::Status {
        status: 500,
        message: "internal error".to_string(),
    }
}

// ── Playback engine ────────────────────────────────────────────────

/// Shared state of one loaded mock sound.
pub struct MockSound {
    pub audio: Vec<u8>,
    status: watch::Sender<PlaybackStatus>,
    position: Mutex<f64>,
    pub stop_calls: AtomicUsize,
    pub unloaded: AtomicBool,
}

impl MockSound {
    pub fn status(&self) -> PlaybackStatus {
        *self.status.borrow()
    }

    pub fn set_position(&self, seconds: f64) {
        *self.position.lock().unwrap() = seconds;
    }

    /// Simulate natural end of stream.
    pub fn finish(&self) {
        self.status.send_replace(PlaybackStatus::Finished);
    }

    /// Simulate an engine failure mid-playback.
    pub fn fail(&self) {
        self.status.send_replace(PlaybackStatus::Failed);
    }

    pub fn is_unloaded(&self) -> bool {
        self.unloaded.load(Ordering::SeqCst)
    }
}

struct MockHandle {
    sound: Arc<MockSound>,
}

impl PlaybackHandle for MockHandle {
    fn play(&self) -> Result<(), PlaybackError> {
        if self.sound.is_unloaded() {
            return Err(PlaybackError::Output("unloaded".to_string()));
        }
        self.sound.status.send_replace(PlaybackStatus::Playing);
        Ok(())
    }

    fn position_seconds(&self) -> f64 {
        *self.sound.position.lock().unwrap()
    }

    fn status(&self) -> watch::Receiver<PlaybackStatus> {
        self.sound.status.subscribe()
    }

    fn stop(&self) {
        self.sound.stop_calls.fetch_add(1, Ordering::SeqCst);
        self.sound.status.send_if_modified(|s| {
            if s.is_done() {
                false
            } else {
                *s = PlaybackStatus::Stopped;
                true
            }
        });
    }

    fn unload(&self) {
        self.sound.unloaded.store(true, Ordering::SeqCst);
        self.sound.status.send_replace(PlaybackStatus::Unloaded);
    }
}

/// Runs synchronously just before a load resolves.
type LoadHook = Box<dyn Fn() + Send + Sync>;

#[derive(Default)]
pub struct MockEngine {
    sounds: Mutex<Vec<Arc<MockSound>>>,
    fail_load: AtomicBool,
    loads_started: AtomicUsize,
    /// Each queued gate holds one load until notified.
    gates: Mutex<VecDeque<Arc<Notify>>>,
    on_loaded: Mutex<Option<LoadHook>>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let engine = Self::default();
        engine.fail_load.store(true, Ordering::SeqCst);
        engine
    }

    pub fn sounds(&self) -> Vec<Arc<MockSound>> {
        self.sounds.lock().unwrap().clone()
    }

    pub fn sound(&self, index: usize) -> Arc<MockSound> {
        Arc::clone(&self.sounds.lock().unwrap()[index])
    }

    /// Hold the next load until the returned gate is notified.
    pub fn gate_next_load(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates.lock().unwrap().push_back(Arc::clone(&gate));
        gate
    }

    /// Run `hook` inside every load, after decoding and before it returns.
    pub fn on_loaded(&self, hook: impl Fn() + Send + Sync + 'static) {
        *self.on_loaded.lock().unwrap() = Some(Box::new(hook));
    }

    pub fn loads_started(&self) -> usize {
        self.loads_started.load(Ordering::SeqCst)
    }

    /// Sounds that are loaded and not yet released.
    pub fn live_sounds(&self) -> usize {
        self.sounds().iter().filter(|s| !s.is_unloaded()).count()
    }
}

#[async_trait]
impl PlaybackEngine for MockEngine {
    async fn load(&self, source: AudioSource) -> Result<Box<dyn PlaybackHandle>, PlaybackError> {
        self.loads_started.fetch_add(1, Ordering::SeqCst);
        let gate = self.gates.lock().unwrap().pop_front();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if self.fail_load.load(Ordering::SeqCst) {
            return Err(PlaybackError::Decode("corrupt audio".to_string()));
        }
        let AudioSource::Bytes(audio) = source else {
            return Err(PlaybackError::Unsupported("uri".to_string()));
        };

        let (status, _) = watch::channel(PlaybackStatus::Loaded);
        let sound = Arc::new(MockSound {
            audio,
            status,
            position: Mutex::new(0.0),
            stop_calls: AtomicUsize::new(0),
            unloaded: AtomicBool::new(false),
        });
        self.sounds.lock().unwrap().push(Arc::clone(&sound));
        if let Some(hook) = self.on_loaded.lock().unwrap().as_ref() {
            hook();
        }
        Ok(Box::new(MockHandle { sound }))
    }
}

// ── Harness ────────────────────────────────────────────────────────

pub struct Harness {
    pub manager: Arc<SessionManager>,
    pub events: mpsc::UnboundedReceiver<SpeechEvent>,
    pub backend: Arc<MockBackend>,
    pub engine: Arc<MockEngine>,
    pub store: Arc<MemoryCredentialStore>,
}

impl Harness {
    pub fn new(backend: MockBackend) -> Self {
        Self::build(backend, MockEngine::new(), with_api_key())
    }

    pub fn build(backend: MockBackend, engine: MockEngine, store: MemoryCredentialStore) -> Self {
        let backend = Arc::new(backend);
        let engine = Arc::new(engine);
        let store = Arc::new(store);
        let (manager, events) = SessionManager::new(
            Arc::clone(&backend) as Arc<dyn SynthesisBackend>,
            Arc::clone(&engine) as Arc<dyn PlaybackEngine>,
            Arc::clone(&store) as Arc<dyn voxline_core::CredentialStore>,
        );
        Self {
            manager: Arc::new(manager),
            events,
            backend,
            engine,
            store,
        }
    }

    /// All events emitted so far.
    pub fn drain_events(&mut self) -> Vec<SpeechEvent> {
        let mut out = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            out.push(event);
        }
        out
    }
}

pub fn with_api_key() -> MemoryCredentialStore {
    MemoryCredentialStore::with_entries([(API_KEY, "sk-test")])
}

/// Poll `condition` until it holds, yielding to the runtime in between.
pub async fn eventually(mut condition: impl FnMut() -> bool) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached");
}
