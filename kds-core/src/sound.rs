//! Notification sound service
//!
//! Synthesized alert tones, no recorded assets. The service object owns
//! its enabled flag and the preference store behind it; playback runs on
//! a dedicated thread because the audio output stream cannot leave the
//! thread that opened it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Mutex};
use std::time::Duration;

use rodio::source::SineWave;
use rodio::Source;

use crate::prefs::{NotificationPrefs, PrefsError};

/// One synthesized tone segment; 0 Hz renders as silence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub freq_hz: f32,
    pub duration: Duration,
}

/// Alert chirp: two short tones, the second higher-pitched, starting
/// 300 ms apart
const ALERT_CHIRP: [Tone; 3] = [
    Tone {
        freq_hz: 880.0,
        duration: Duration::from_millis(150),
    },
    Tone {
        freq_hz: 0.0,
        duration: Duration::from_millis(150),
    },
    Tone {
        freq_hz: 1318.5,
        duration: Duration::from_millis(150),
    },
];

/// Single tone confirming the notification toggle
const CONFIRM_TONE: [Tone; 1] = [Tone {
    freq_hz: 880.0,
    duration: Duration::from_millis(150),
}];

/// Playback backend seam
pub trait AlertSink: Send + Sync {
    /// Play a tone sequence back to back; returns immediately
    fn play(&self, tones: &[Tone]);
}

/// Rodio-backed sink on a dedicated playback thread
pub struct RodioSink {
    tx: mpsc::Sender<Vec<Tone>>,
}

impl RodioSink {
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel::<Vec<Tone>>();

        std::thread::spawn(move || {
            let (_stream, handle) = match rodio::OutputStream::try_default() {
                Ok(out) => out,
                Err(e) => {
                    tracing::warn!("No audio output device, alerts are silent: {}", e);
                    return;
                }
            };

            while let Ok(tones) = rx.recv() {
                match rodio::Sink::try_new(&handle) {
                    Ok(sink) => {
                        for tone in tones {
                            sink.append(
                                SineWave::new(tone.freq_hz)
                                    .take_duration(tone.duration)
                                    .amplify(0.25),
                            );
                        }
                        sink.sleep_until_end();
                    }
                    Err(e) => tracing::warn!("Audio sink unavailable: {}", e),
                }
            }
        });

        Self { tx }
    }
}

impl AlertSink for RodioSink {
    fn play(&self, tones: &[Tone]) {
        if let Err(e) = self.tx.send(tones.to_vec()) {
            tracing::debug!("Playback thread gone: {}", e);
        }
    }
}

/// Audible alert side channel
///
/// Enabled by default; the flag is read from the preference store once at
/// construction and written back only on explicit toggle.
pub struct SoundService {
    enabled: AtomicBool,
    prefs: Mutex<NotificationPrefs>,
    sink: Box<dyn AlertSink>,
}

impl SoundService {
    pub fn new(prefs: NotificationPrefs, sink: Box<dyn AlertSink>) -> Self {
        Self {
            enabled: AtomicBool::new(prefs.enabled()),
            prefs: Mutex::new(prefs),
            sink,
        }
    }

    /// Service with the default audio output backend
    pub fn with_audio_output(prefs: NotificationPrefs) -> Self {
        Self::new(prefs, Box::new(RodioSink::spawn()))
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Play the alert chirp, if enabled
    pub fn play(&self) {
        if self.is_enabled() {
            self.sink.play(&ALERT_CHIRP);
        }
    }

    /// Toggle and persist; turning on plays an immediate confirmation
    pub fn set_enabled(&self, enabled: bool) -> Result<(), PrefsError> {
        self.enabled.store(enabled, Ordering::SeqCst);

        {
            let mut prefs = self.prefs.lock().expect("prefs lock poisoned");
            prefs.set_enabled(enabled)?;
        }

        if enabled {
            self.sink.play(&CONFIRM_TONE);
        }
        Ok(())
    }
}
