//! Speech playback
//!
//! Fetches synthesized narration audio from the remote TTS endpoint and
//! plays it through rodio. The output stream is not `Send`, so a dedicated
//! audio thread owns the playback infrastructure behind a command channel.
//!
//! At most one playback session exists at a time. Each `speak` bumps a
//! generation counter; audio belonging to a superseded generation is
//! dropped wherever it surfaces, so two in-flight synthesis requests can
//! never interleave into the same session slot.

use crate::error::{DoclystError, DoclystResult};
use crate::language::Language;
use async_trait::async_trait;
use std::io::Cursor;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// User-safe notice for any speech failure
pub const SPEECH_FAILED_NOTICE: &str = "We couldn't read that aloud. Please try again.";

/// How often the audio thread checks for a drained sink
const END_POLL_INTERVAL: Duration = Duration::from_millis(100);

type EndCallback = Box<dyn Fn() + Send + Sync>;
type EndSlot = Arc<Mutex<Option<EndCallback>>>;

/// Source of synthesized narration audio
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Produce a playable audio payload for the text
    async fn synthesize(&self, text: &str, language: Language) -> DoclystResult<Vec<u8>>;
}

/// Remote TTS endpoint client
pub struct HttpSynthesizer {
    base_url: String,
    http: reqwest::Client,
}

impl HttpSynthesizer {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Synthesizer for HttpSynthesizer {
    async fn synthesize(&self, text: &str, language: Language) -> DoclystResult<Vec<u8>> {
        let response = match self
            .http
            .post(format!("{}/tts", self.base_url))
            .json(&serde_json::json!({ "text": text, "language": language.code() }))
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                warn!("❌ TTS request failed: {}", e);
                return Err(DoclystError::Speech(SPEECH_FAILED_NOTICE.to_string()));
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!("❌ TTS endpoint returned {}", status);
            return Err(DoclystError::Speech(SPEECH_FAILED_NOTICE.to_string()));
        }

        match response.bytes().await {
            Ok(bytes) if !bytes.is_empty() => Ok(bytes.to_vec()),
            Ok(_) => {
                warn!("❌ TTS endpoint returned an empty audio payload");
                Err(DoclystError::Speech(SPEECH_FAILED_NOTICE.to_string()))
            }
            Err(e) => {
                warn!("❌ Could not read TTS audio stream: {}", e);
                Err(DoclystError::Speech(SPEECH_FAILED_NOTICE.to_string()))
            }
        }
    }
}

/// Monotonic playback-session generation counter
///
/// A token is current until the next `begin` or `invalidate`; anything
/// holding a stale token must drop its work instead of touching the
/// session slot.
#[derive(Clone, Default)]
struct SessionCounter(Arc<AtomicU64>);

impl SessionCounter {
    fn begin(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, token: u64) -> bool {
        self.0.load(Ordering::SeqCst) == token
    }

    fn invalidate(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Commands sent to the audio thread
enum AudioCommand {
    Play {
        session: u64,
        bytes: Vec<u8>,
        started: tokio::sync::oneshot::Sender<DoclystResult<()>>,
    },
    Stop,
}

/// Owns at most one active narration playback session
pub struct SpeechPlayer {
    synth: Arc<dyn Synthesizer>,
    sender: mpsc::Sender<AudioCommand>,
    sessions: SessionCounter,
    playing: Arc<AtomicBool>,
    on_end: EndSlot,
}

impl std::fmt::Debug for SpeechPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechPlayer")
            .field("playing", &self.is_speaking())
            .finish()
    }
}

impl SpeechPlayer {
    /// Player backed by the remote TTS endpoint at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_synthesizer(Arc::new(HttpSynthesizer::new(base_url)))
    }

    pub fn with_synthesizer(synth: Arc<dyn Synthesizer>) -> Self {
        let (sender, receiver) = mpsc::channel::<AudioCommand>();
        let sessions = SessionCounter::default();
        let playing = Arc::new(AtomicBool::new(false));
        let on_end: EndSlot = Arc::new(Mutex::new(None));

        // Spawn dedicated audio thread
        {
            let sessions = sessions.clone();
            let playing = playing.clone();
            let on_end = on_end.clone();
            thread::spawn(move || audio_thread(receiver, sessions, playing, on_end));
        }

        Self {
            synth,
            sender,
            sessions,
            playing,
            on_end,
        }
    }

    /// Fetch narration audio and start playing it
    ///
    /// Any active session is stopped first; two sessions never overlap.
    /// Resolves once playback has started - natural completion is
    /// reported through the `on_end` callback. A call superseded by a
    /// newer `speak` or `stop` while its audio was still being fetched
    /// resolves without starting playback.
    pub async fn speak(&self, text: &str, language: Language) -> DoclystResult<()> {
        let session = self.sessions.begin();
        // Halt current playback before the fetch, not after it
        let _ = self.sender.send(AudioCommand::Stop);

        info!(
            "📢 Narration requested ({} chars, '{}')",
            text.len(),
            language.code()
        );

        let bytes = self.synth.synthesize(text, language).await?;

        if !self.sessions.is_current(session) {
            debug!("🗑️ Narration superseded during synthesis, dropping audio");
            return Ok(());
        }

        let (started_tx, started_rx) = tokio::sync::oneshot::channel();
        self.sender
            .send(AudioCommand::Play {
                session,
                bytes,
                started: started_tx,
            })
            .map_err(|_| {
                warn!("❌ Speech thread unavailable");
                DoclystError::Speech(SPEECH_FAILED_NOTICE.to_string())
            })?;

        match started_rx.await {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!("❌ Speech thread dropped the start acknowledgement");
                Err(DoclystError::Speech(SPEECH_FAILED_NOTICE.to_string()))
            }
        }
    }

    /// Halt playback and return to idle; a no-op when already idle
    ///
    /// Never triggers the `on_end` callback - stop is caller-initiated,
    /// not a completion.
    pub fn stop(&self) {
        self.sessions.invalidate();
        let _ = self.sender.send(AudioCommand::Stop);
    }

    pub fn is_speaking(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }

    /// Register the completion callback; the latest registration wins
    ///
    /// Fired exactly once when a session drains naturally or dies on a
    /// mid-stream playback error, never for an explicit `stop`.
    pub fn on_end<F: Fn() + Send + Sync + 'static>(&self, callback: F) {
        if let Ok(mut slot) = self.on_end.lock() {
            *slot = Some(Box::new(callback));
        }
    }
}

fn audio_thread(
    receiver: mpsc::Receiver<AudioCommand>,
    sessions: SessionCounter,
    playing: Arc<AtomicBool>,
    on_end: EndSlot,
) {
    use rodio::{Decoder, OutputStream, Sink};

    // Initialize audio output on this thread
    let (stream, stream_handle) = match OutputStream::try_default() {
        Ok(s) => s,
        Err(e) => {
            warn!("🔇 Failed to initialize audio output: {}", e);
            return;
        }
    };

    // Keep stream alive
    let _stream = stream;
    let mut active: Option<(u64, Sink)> = None;

    info!("🔊 Speech thread started");

    loop {
        match receiver.recv_timeout(END_POLL_INTERVAL) {
            Ok(AudioCommand::Play {
                session,
                bytes,
                started,
            }) => {
                // Replace semantics: the previous sink goes away silently
                if let Some((_, sink)) = active.take() {
                    sink.stop();
                }
                playing.store(false, Ordering::SeqCst);

                if !sessions.is_current(session) {
                    debug!("🗑️ Dropping audio for superseded session {}", session);
                    let _ = started.send(Ok(()));
                    continue;
                }

                let source = match Decoder::new(Cursor::new(bytes)) {
                    Ok(source) => source,
                    Err(e) => {
                        warn!("❌ Undecodable TTS audio payload: {}", e);
                        let _ = started.send(Err(DoclystError::Speech(
                            SPEECH_FAILED_NOTICE.to_string(),
                        )));
                        continue;
                    }
                };

                let sink = match Sink::try_new(&stream_handle) {
                    Ok(sink) => sink,
                    Err(e) => {
                        warn!("❌ Failed to create audio sink: {}", e);
                        let _ = started.send(Err(DoclystError::Speech(
                            SPEECH_FAILED_NOTICE.to_string(),
                        )));
                        continue;
                    }
                };

                sink.append(source);
                playing.store(true, Ordering::SeqCst);
                debug!("▶️ Playback started for session {}", session);
                active = Some((session, sink));
                let _ = started.send(Ok(()));
            }
            Ok(AudioCommand::Stop) => {
                if let Some((session, sink)) = active.take() {
                    sink.stop();
                    debug!("🛑 Stopped session {}", session);
                }
                playing.store(false, Ordering::SeqCst);
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                // A drained sink means natural completion (or a mid-stream
                // decode failure, which rodio also surfaces as an end)
                let finished = active
                    .as_ref()
                    .map(|(_, sink)| sink.empty())
                    .unwrap_or(false);

                if finished {
                    if let Some((session, _sink)) = active.take() {
                        debug!("✅ Session {} finished", session);
                        playing.store(false, Ordering::SeqCst);
                        if let Ok(slot) = on_end.lock() {
                            if let Some(callback) = slot.as_ref() {
                                callback();
                            }
                        }
                    }
                }
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    info!("🔇 Speech thread stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingSynth;

    #[async_trait]
    impl Synthesizer for FailingSynth {
        async fn synthesize(&self, _text: &str, _language: Language) -> DoclystResult<Vec<u8>> {
            Err(DoclystError::Speech(SPEECH_FAILED_NOTICE.to_string()))
        }
    }

    #[test]
    fn test_session_counter_staleness() {
        let sessions = SessionCounter::default();
        let first = sessions.begin();
        assert!(sessions.is_current(first));

        // A newer session supersedes the old token
        let second = sessions.begin();
        assert!(!sessions.is_current(first));
        assert!(sessions.is_current(second));

        // Stop invalidates without starting anything
        sessions.invalidate();
        assert!(!sessions.is_current(second));
    }

    #[test]
    fn test_stop_is_idempotent() {
        let player = SpeechPlayer::with_synthesizer(Arc::new(FailingSynth));
        player.stop();
        player.stop();
        assert!(!player.is_speaking());
    }

    #[test]
    fn test_on_end_last_registration_wins() {
        let player = SpeechPlayer::with_synthesizer(Arc::new(FailingSynth));

        let first = Arc::new(AtomicBool::new(false));
        let second = Arc::new(AtomicBool::new(false));
        {
            let flag = first.clone();
            player.on_end(move || flag.store(true, Ordering::SeqCst));
        }
        {
            let flag = second.clone();
            player.on_end(move || flag.store(true, Ordering::SeqCst));
        }

        let slot = player.on_end.lock().expect("slot lock");
        slot.as_ref().expect("registered callback")();
        assert!(!first.load(Ordering::SeqCst));
        assert!(second.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_speak_failure_leaves_player_idle() {
        let player = SpeechPlayer::with_synthesizer(Arc::new(FailingSynth));
        let outcome = player.speak("hello", Language::En).await;
        assert!(matches!(outcome, Err(DoclystError::Speech(_))));
        assert!(!player.is_speaking());
    }

    #[tokio::test]
    async fn test_superseded_speak_resolves_without_playing() {
        struct SlowSynth(SessionCounter);

        #[async_trait]
        impl Synthesizer for SlowSynth {
            async fn synthesize(&self, _text: &str, _language: Language) -> DoclystResult<Vec<u8>> {
                // Simulate a stop racing the fetch
                self.0.invalidate();
                Ok(vec![0u8; 32])
            }
        }

        let player = SpeechPlayer::with_synthesizer(Arc::new(FailingSynth));
        let racing = SlowSynth(player.sessions.clone());
        let player = SpeechPlayer {
            synth: Arc::new(racing),
            sender: player.sender.clone(),
            sessions: player.sessions.clone(),
            playing: player.playing.clone(),
            on_end: player.on_end.clone(),
        };

        let outcome = player.speak("hello", Language::En).await;
        assert!(outcome.is_ok());
        assert!(!player.is_speaking());
    }
}
