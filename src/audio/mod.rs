//=========================================================================
// Tone Service
//
// Fire-and-forget tone bursts for UI feedback. Synthesizes a sine burst
// and streams it to the board's speaker codec from a dedicated worker
// thread, so a scene can trigger a blip from inside the game tick without
// the tick ever waiting on codec writes.
//
// Architecture:
// ```text
//  Game Thread:                    Tone Worker:
//  ┌─────────────────────┐        ┌──────────────────────┐
//  │  ToneService::play ─┼───────>│  set_volume          │
//  │  (try_send, never   │  MPSC  │  synthesize chunks   │
//  │   blocks)           │        │  CodecPort::write    │
//  └─────────────────────┘        └──────────────────────┘
// ```
//
// Key Design Decisions:
// - **Degraded start**: a codec that fails to open yields a disabled
//   service; `play` becomes a silent no-op and everything else runs
// - **Bounded queue, drop on overflow**: a burst arriving while the queue
//   is full is dropped, never queued unboundedly or waited on
// - **Worker joins on drop**: the channel closes, the worker drains what
//   it has and exits, which keeps tests deterministic
//
//=========================================================================

//=== Submodules ==========================================================

mod codec;

//=== Public API ==========================================================

pub use codec::{AudioError, CodecPort, SampleFormat};

//=== External Crates =====================================================

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{debug, info, warn};

//=== Standard Library Imports ============================================

use std::f32::consts::TAU;
use std::thread::{self, JoinHandle};

//=== Tuning Constants ====================================================

/// Samples synthesized per codec write.
const TONE_CHUNK: usize = 256;

/// Peak amplitude as a fraction of full scale, kept low to avoid clipping.
const TONE_AMPLITUDE: f32 = 0.20;

/// Bursts that can be queued before new ones are dropped.
const TONE_QUEUE: usize = 8;

//=== ToneCmd =============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ToneCmd {
    freq_hz: u16,
    duration_ms: u16,
    volume: u8,
}

//=== ToneService =========================================================

/// Tone burst generator over the board's speaker codec.
///
/// Constructed once at startup and handed to scenes through the device
/// context. All methods take `&self`; the service is safe to call from
/// the game thread at any tick.
pub struct ToneService {
    sender: Option<Sender<ToneCmd>>,
    worker: Option<JoinHandle<()>>,
}

impl ToneService {
    //--- Construction -----------------------------------------------------

    /// Opens the codec and spawns the tone worker.
    ///
    /// On open failure the error is logged and a disabled service is
    /// returned; tone playback silently no-ops from then on.
    pub fn start(mut codec: Box<dyn CodecPort>) -> Self {
        if let Err(e) = codec.open(SampleFormat::TONE) {
            warn!(target: "audio", "Tones disabled: {}", e);
            return Self::disabled();
        }

        let (tx, rx) = bounded(TONE_QUEUE);
        let worker = thread::spawn(move || worker_loop(rx, codec));

        info!(target: "audio", "Tone service started");
        Self {
            sender: Some(tx),
            worker: Some(worker),
        }
    }

    /// A service with no codec behind it. `play` is a no-op.
    pub fn disabled() -> Self {
        Self {
            sender: None,
            worker: None,
        }
    }

    //--- Playback ---------------------------------------------------------

    /// Queues a sine burst: `freq_hz` for `duration_ms` at
    /// `volume_percent` (clamped to 100).
    ///
    /// Never blocks. A full queue drops the burst; a disabled service
    /// ignores the call entirely.
    pub fn play(&self, freq_hz: u16, duration_ms: u16, volume_percent: u8) {
        let Some(sender) = &self.sender else {
            return;
        };

        let cmd = ToneCmd {
            freq_hz,
            duration_ms,
            volume: volume_percent.min(100),
        };

        if sender.try_send(cmd).is_err() {
            debug!(target: "audio", "Tone queue full, dropping {} Hz burst", freq_hz);
        }
    }

    /// Returns whether a codec is attached.
    pub fn is_enabled(&self) -> bool {
        self.sender.is_some()
    }
}

impl Drop for ToneService {
    fn drop(&mut self) {
        // Closing the channel ends the worker loop once queued bursts drain.
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

//=== Worker ==============================================================

fn worker_loop(receiver: Receiver<ToneCmd>, mut codec: Box<dyn CodecPort>) {
    for cmd in receiver.iter() {
        codec.set_volume(cmd.volume);
        write_sine(codec.as_mut(), cmd.freq_hz, cmd.duration_ms);
    }
    debug!(target: "audio", "Tone worker exiting");
}

/// Streams one sine burst to the codec in fixed-size chunks.
fn write_sine(codec: &mut dyn CodecPort, freq_hz: u16, duration_ms: u16) {
    let rate = SampleFormat::TONE.sample_rate;
    let mut remaining = (rate as usize * duration_ms as usize) / 1000;
    if remaining == 0 {
        return;
    }

    let amplitude = TONE_AMPLITUDE * i16::MAX as f32;
    let phase_step = TAU * freq_hz as f32 / rate as f32;
    let mut phase = 0.0f32;
    let mut buf = [0i16; TONE_CHUNK];

    while remaining > 0 {
        let n = remaining.min(TONE_CHUNK);
        for sample in buf.iter_mut().take(n) {
            *sample = (phase.sin() * amplitude) as i16;
            phase += phase_step;
            if phase > TAU {
                phase -= TAU;
            }
        }
        codec.write(&buf[..n]);
        remaining -= n;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    //--- Test Helpers -----------------------------------------------------

    #[derive(Default)]
    struct CodecLog {
        volumes: Vec<u8>,
        samples_written: usize,
        peak: i16,
    }

    struct FakeCodec {
        fail_open: bool,
        log: Arc<Mutex<CodecLog>>,
    }

    impl FakeCodec {
        fn new(fail_open: bool) -> (Self, Arc<Mutex<CodecLog>>) {
            let log = Arc::new(Mutex::new(CodecLog::default()));
            (
                Self {
                    fail_open,
                    log: Arc::clone(&log),
                },
                log,
            )
        }
    }

    impl CodecPort for FakeCodec {
        fn open(&mut self, format: SampleFormat) -> Result<(), AudioError> {
            assert_eq!(format, SampleFormat::TONE);
            if self.fail_open {
                Err(AudioError::CodecOpen("no speaker".into()))
            } else {
                Ok(())
            }
        }

        fn set_volume(&mut self, percent: u8) {
            self.log.lock().unwrap().volumes.push(percent);
        }

        fn write(&mut self, samples: &[i16]) {
            let mut log = self.log.lock().unwrap();
            log.samples_written += samples.len();
            for &s in samples {
                log.peak = log.peak.max(s.abs());
            }
        }
    }

    //--- Tests ------------------------------------------------------------

    #[test]
    fn failed_open_yields_disabled_service() {
        let (codec, log) = FakeCodec::new(true);
        let tones = ToneService::start(Box::new(codec));

        assert!(!tones.is_enabled());
        tones.play(440, 20, 50);
        drop(tones);

        assert_eq!(log.lock().unwrap().samples_written, 0);
    }

    #[test]
    fn disabled_service_ignores_play() {
        let tones = ToneService::disabled();
        assert!(!tones.is_enabled());
        tones.play(440, 20, 50);
    }

    #[test]
    fn burst_length_matches_duration() {
        let (codec, log) = FakeCodec::new(false);
        let tones = ToneService::start(Box::new(codec));

        tones.play(440, 10, 50);
        drop(tones); // joins the worker

        // 44100 samples/s * 10 ms
        assert_eq!(log.lock().unwrap().samples_written, 441);
    }

    #[test]
    fn volume_is_clamped_to_100() {
        let (codec, log) = FakeCodec::new(false);
        let tones = ToneService::start(Box::new(codec));

        tones.play(880, 1, 250);
        drop(tones);

        assert_eq!(log.lock().unwrap().volumes, vec![100]);
    }

    #[test]
    fn zero_duration_writes_nothing() {
        let (codec, log) = FakeCodec::new(false);
        let tones = ToneService::start(Box::new(codec));

        tones.play(880, 0, 50);
        drop(tones);

        assert_eq!(log.lock().unwrap().samples_written, 0);
    }

    #[test]
    fn amplitude_stays_below_clipping_headroom() {
        let (codec, log) = FakeCodec::new(false);
        let tones = ToneService::start(Box::new(codec));

        tones.play(440, 50, 100);
        drop(tones);

        let peak = log.lock().unwrap().peak;
        assert!(peak > 0, "burst should produce signal");
        assert!(
            (peak as f32) <= TONE_AMPLITUDE * i16::MAX as f32 + 1.0,
            "peak {} exceeds the amplitude cap",
            peak
        );
    }
}
