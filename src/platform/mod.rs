//=========================================================================
// Platform Contracts
//
// Board-support seams consumed by the game core. The display stack, touch
// controller, and timer hardware live in the host board crate; this module
// defines the contract each one implements so the core never links against
// vendor code directly and platform backends can be swapped without
// touching game logic.
//
// Components:
// - `display`: surface lock + object primitives (`DisplayPort`)
// - `touch`:   capture registration and event routing (`TouchPort`)
// - `clock`:   monotonic pacing primitive (`TickSource`)
//
//=========================================================================

//=== Submodules ==========================================================

mod clock;
mod display;
mod touch;

//=== Public API ==========================================================

pub use clock::{MonotonicClock, TickSource};
pub use display::{DisplayPort, ObjectId, SurfaceGuard};
pub use touch::{TouchEvent, TouchPort};

pub(crate) use touch::spawn_touch_router;

#[cfg(test)]
pub(crate) use display::NullDisplay;
#[cfg(test)]
pub(crate) use touch::NullTouch;

//=== PlatformError =======================================================

/// Board bring-up errors surfaced by the platform contracts.
///
/// Every variant is a degraded-mode condition: the affected subsystem is
/// disabled and logged, and the rest of the firmware keeps running.
#[derive(Debug)]
pub enum PlatformError {
    /// Touch capture registration failed (surface not ready).
    CaptureUnavailable(String),
}

//--- Trait Implementations -----------------------------------------------

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CaptureUnavailable(e) => {
                write!(f, "Touch capture registration failed: {}", e)
            }
        }
    }
}

impl std::error::Error for PlatformError {}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_error_mentions_the_cause() {
        let err = PlatformError::CaptureUnavailable("indev missing".into());
        assert!(err.to_string().contains("indev missing"));
    }
}
