//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use joydot::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Firmware entry point
pub use crate::firmware::{Board, Firmware, FirmwareBuilder};

// Shared services
pub use crate::core::context::DeviceContext;

// Input system
pub use crate::core::input::{InputState, InputStore, JoystickTuning};

// Scene system
pub use crate::core::scene::{Scene, SceneDispatcher, SceneKey};

// Shipped scenes
pub use crate::scenes::play::{PlayParams, PlayScene};

// Board contracts
pub use crate::audio::{AudioError, CodecPort, SampleFormat, ToneService};
pub use crate::platform::{
    DisplayPort, MonotonicClock, ObjectId, PlatformError, SurfaceGuard, TickSource, TouchEvent,
    TouchPort,
};
