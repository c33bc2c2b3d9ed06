//=========================================================================
// Game Loop Core
//
// Fixed-tick scheduler for game logic, running on its own thread.
//
// Responsibilities:
// - Perform one-time startup: settle delay, input reset, touch capture
//   registration, boot scene activation
// - Each tick: measure dt from the monotonic tick source, run input edge
//   detection, snapshot the input state, update the active scene
// - Maintain pacing by sleeping to the next tick boundary
//
// Notes:
// The loop never terminates under normal operation; it is the process's
// primary control thread for game logic. It blocks only on its own
// sleep. Touch events arrive on a separate routing thread and meet this
// thread solely through the input store's mutex.
//
//=========================================================================

//=== External Crates =====================================================

use crossbeam_channel::Sender;
use log::{info, warn};

//=== Internal Modules ====================================================

use crate::core::context::DeviceContext;
use crate::core::input::InputStore;
use crate::core::scene::{SceneDispatcher, SceneKey};
use crate::platform::{TickSource, TouchEvent, TouchPort};

use std::sync::Arc;

pub mod context;
pub mod input;
pub mod scene;

//=== GameLoop ============================================================
//
// Owns the scene dispatcher and the shared services for the lifetime of
// the process. Constructed by the firmware entry point, then moved onto
// the game thread.
//
pub(crate) struct GameLoop<K: SceneKey> {
    input: Arc<InputStore>,
    scenes: SceneDispatcher<K>,
    context: DeviceContext,
    clock: Box<dyn TickSource>,
    period_ms: u32,
    settle_ms: u32,
    boot_scene: Option<K>,
    last_ms: u64,
}

impl<K: SceneKey> GameLoop<K> {
    //--- Construction -----------------------------------------------------

    pub fn new(
        input: Arc<InputStore>,
        scenes: SceneDispatcher<K>,
        context: DeviceContext,
        clock: Box<dyn TickSource>,
        period_ms: u32,
        settle_ms: u32,
        boot_scene: Option<K>,
    ) -> Self {
        Self {
            input,
            scenes,
            context,
            clock,
            period_ms,
            settle_ms,
            boot_scene,
            last_ms: 0,
        }
    }

    //--- Startup ----------------------------------------------------------
    //
    // Runs exactly once before the steady-state loop:
    //  1. Settle delay so the display stack finishes its own bring-up
    //  2. Input reset and touch capture registration (degrades on failure)
    //  3. Boot scene activation
    //
    pub fn start(&mut self, touch: &mut dyn TouchPort, sink: Sender<TouchEvent>) {
        let settle_deadline = self.clock.now_ms() + self.settle_ms as u64;
        self.clock.sleep_until(settle_deadline);

        self.input.reset();
        match touch.register(sink) {
            Ok(()) => info!("Touch capture registered"),
            Err(e) => warn!("{}; running with a zeroed input snapshot", e),
        }

        if let Some(key) = self.boot_scene {
            self.scenes.set_active(key, &self.context);
        }

        self.last_ms = self.clock.now_ms();
    }

    //--- Tick -------------------------------------------------------------

    /// Runs one tick and returns the measured dt in milliseconds.
    ///
    /// dt is wall time since the previous tick, taken from the monotonic
    /// source; it is not assumed to equal the nominal period.
    pub fn tick(&mut self) -> u32 {
        let now = self.clock.now_ms();
        let dt_ms = now.saturating_sub(self.last_ms) as u32;
        self.last_ms = now;

        self.input.update(dt_ms);
        let snapshot = self.input.state();
        self.scenes.update(&self.context, dt_ms, &snapshot);

        dt_ms
    }

    //--- Execution --------------------------------------------------------

    /// Runs startup, then ticks forever.
    pub fn run(mut self, mut touch: Box<dyn TouchPort>, sink: Sender<TouchEvent>) {
        self.start(touch.as_mut(), sink);

        info!("Game loop entering steady state ({} ms tick)", self.period_ms);
        loop {
            let frame_start = self.clock.now_ms();
            self.tick();
            self.clock.sleep_until(frame_start + self.period_ms as u64);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
