//=========================================================================
// Device Context
//=========================================================================
//
// Shared services container for scenes.
//
// Built once at startup from the host's board ports and passed by
// reference into every scene call. This replaces ambient module-level
// state with one explicit object that owns the process-wide services.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::audio::ToneService;
use crate::platform::DisplayPort;

use std::sync::Arc;

//=== DeviceContext =======================================================

/// Process-wide services handed to scenes during lifecycle and update
/// calls.
///
/// # Available Services
///
/// - `display`: the board's rendering surface, used through
///   [`crate::platform::SurfaceGuard`] scoped locks
/// - `tones`: fire-and-forget tone bursts; disabled when the board has
///   no codec
pub struct DeviceContext {
    /// Rendering surface port shared with the display's own flush task.
    pub display: Arc<dyn DisplayPort>,

    /// Tone burst service. Safe to call every tick; never blocks.
    pub tones: ToneService,
}

impl DeviceContext {
    pub fn new(display: Arc<dyn DisplayPort>, tones: ToneService) -> Self {
        Self { display, tones }
    }
}
