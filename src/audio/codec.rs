//=========================================================================
// Codec Contract
//
// Seam between tone generation and the board's speaker codec. The codec
// driver (I2S bring-up, DAC configuration) belongs to the host board; the
// tone service only needs open / volume / PCM write.
//
//=========================================================================

//=== SampleFormat ========================================================

/// PCM format the codec is opened with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleFormat {
    pub sample_rate: u32,
    pub channels: u8,
    pub bits_per_sample: u8,
}

impl SampleFormat {
    /// Format used for tone bursts: 44.1 kHz mono, signed 16-bit.
    pub const TONE: Self = Self {
        sample_rate: 44_100,
        channels: 1,
        bits_per_sample: 16,
    };
}

//=== CodecPort ===========================================================

/// Speaker codec implemented by the host board.
///
/// `write` may block while the codec's transmit buffer drains; the tone
/// service calls it from a dedicated worker thread so game code never
/// waits on it.
pub trait CodecPort: Send {
    /// Opens the codec output path with the given format.
    fn open(&mut self, format: SampleFormat) -> Result<(), AudioError>;

    /// Sets output volume, 0 to 100.
    fn set_volume(&mut self, percent: u8);

    /// Writes a block of PCM samples.
    fn write(&mut self, samples: &[i16]);
}

//=== AudioError ==========================================================

/// Codec bring-up errors.
#[derive(Debug)]
pub enum AudioError {
    /// Codec open failed (hardware not ready, format rejected).
    CodecOpen(String),
}

//--- Trait Implementations -----------------------------------------------

impl std::fmt::Display for AudioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CodecOpen(e) => write!(f, "Codec open failed: {}", e),
        }
    }
}

impl std::error::Error for AudioError {}
