//=========================================================================
// Touch Event Source
//
// Bridges the board's touch controller with the input store via a bounded
// channel. The touch driver delivers press/drag/release notifications on
// its own thread; a small routing thread owned by the firmware applies
// them to the shared input snapshot.
//
// Architecture:
// ```text
//  Driver Thread:                  Routing Thread:        Game Thread:
//  ┌──────────────────────┐       ┌───────────────┐      ┌─────────────┐
//  │  Touch ISR / task    │       │  route_event  │      │  GameLoop   │
//  │   ↓                  │       │   ↓           │      │   ↓         │
//  │  Sender<TouchEvent> ─┼──────>│  InputStore ──┼──────┼> snapshot   │
//  └──────────────────────┘ MPSC  │  (mutex)      │      │  per tick   │
//                                 └───────────────┘      └─────────────┘
// ```
//
// Key Design Decisions:
// - **No event queue beyond the channel**: the store keeps only the latest
//   snapshot, so rapid drags between ticks coalesce into the last position
// - **Graceful channel disconnect**: when every sender is gone the routing
//   thread logs and exits; the store keeps serving its last snapshot
// - **Button level rides the same channel**: the physical action button is
//   not wired yet, so its level signal is an injectable event variant
//   rather than a hardware binding
//
//=========================================================================

//=== External Crates =====================================================

use crossbeam_channel::{Receiver, Sender};
use log::{debug, info};

//=== Internal Imports ====================================================

use crate::core::input::InputStore;
use super::PlatformError;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

//=== TouchEvent ==========================================================

/// Notification from the board's touch controller (or button driver).
///
/// Coordinates are screen pixels, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchEvent {
    /// First contact of a press sequence.
    PressStart { x: i32, y: i32 },

    /// Drag while the press is held.
    PressMove { x: i32, y: i32 },

    /// End of the press sequence.
    Release,

    /// Level change of the action button.
    ///
    /// The button is driven by an external source; whatever owns it sends
    /// the current level here and edge detection happens per game tick in
    /// the input store.
    Action { down: bool },
}

//=== TouchPort ===========================================================

/// Touch capture surface implemented by the host board.
///
/// `register` installs one handler set covering a full-surface capture
/// region: after it returns `Ok`, the driver delivers every press, drag,
/// and release through the given sender, on the driver's own thread.
///
/// Registration failure (capture surface not ready) is a degraded-mode
/// condition, not a fatal one: the firmware logs it and keeps running
/// with a zeroed input snapshot.
pub trait TouchPort: Send {
    /// Installs the full-surface capture handler.
    fn register(&mut self, sink: Sender<TouchEvent>) -> Result<(), PlatformError>;
}

//=== Event Routing =======================================================

/// Applies one touch event to the input store.
///
/// Press and drag both carry the latest contact point; the store derives
/// the joystick vector from it. Release zeroes the joystick regardless of
/// prior state.
pub(crate) fn route_event(store: &InputStore, event: TouchEvent) {
    match event {
        TouchEvent::PressStart { x, y } | TouchEvent::PressMove { x, y } => {
            store.handle_touch(true, x, y);
        }
        TouchEvent::Release => {
            store.handle_touch(false, 0, 0);
        }
        TouchEvent::Action { down } => {
            store.set_action_down(down);
        }
    }
}

/// Spawns the routing thread feeding driver events into the input store.
///
/// Runs for process lifetime under normal operation. Exits only when every
/// sender handle has been dropped.
pub(crate) fn spawn_touch_router(
    receiver: Receiver<TouchEvent>,
    store: Arc<InputStore>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        info!(target: "platform::touch", "Touch routing thread started");

        for event in receiver.iter() {
            route_event(&store, event);
        }

        debug!(target: "platform::touch", "Touch channel closed, routing thread exiting");
    })
}

//=== Test Support ========================================================

#[cfg(test)]
pub(crate) struct NullTouch;

#[cfg(test)]
impl TouchPort for NullTouch {
    fn register(&mut self, _sink: Sender<TouchEvent>) -> Result<(), PlatformError> {
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
