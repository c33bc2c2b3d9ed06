//=========================================================================
// Input State Store
//
// Thread-safe holder of the latest touch/joystick/button snapshot.
// Written by the touch routing thread as events arrive, read once per
// tick by the game loop. One mutex guards the whole state; critical
// sections are field copies and compares only, never I/O.
//
// Frame lifecycle, per game tick:
//   update(dt) -> edge detection on the action level -> state() snapshot
//
// Responsibilities:
// - Derive the virtual joystick vector from touch drags
// - Convert the action button level into one-tick pressed/released pulses
// - Hand out consistent snapshot copies under the lock
//
// Notes:
// Only the latest state is kept. Touch events that land between two ticks
// coalesce into the final position; there is no event queue here.
//
//=========================================================================

//=== Submodules ==========================================================

mod joystick;
mod state;

//=== Public API ==========================================================

pub use joystick::JoystickTuning;
pub use state::InputState;

//=== Internal Imports ====================================================

use joystick::JoystickTracker;

//=== Standard Library Imports ============================================

use std::sync::{Mutex, MutexGuard, PoisonError};

//=== InputStore ==========================================================

/// Process-wide input store shared between the touch routing thread and
/// the game loop.
///
/// Constructed once at startup and owned behind an `Arc` for process
/// lifetime. All methods take `&self` and lock internally.
pub struct InputStore {
    inner: Mutex<StoreInner>,
}

struct StoreInner {
    state: InputState,
    prev_action_down: bool,
    joystick: JoystickTracker,
}

impl InputStore {
    //--- Construction -----------------------------------------------------

    pub fn new(tuning: JoystickTuning) -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                state: InputState::default(),
                prev_action_down: false,
                joystick: JoystickTracker::new(tuning),
            }),
        }
    }

    /// Zeroes the snapshot and drops any in-progress touch tracking.
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.state = InputState::default();
        inner.prev_action_down = false;
        inner.joystick.reset();
    }

    //--- Per-Tick Update --------------------------------------------------

    /// Runs edge detection for this tick. Call exactly once per game tick.
    ///
    /// Clears both pulse flags, then compares the current action level
    /// against the previous tick's level: a rise sets `action_pressed`, a
    /// fall sets `action_released`, each for this one tick only.
    pub fn update(&self, _dt_ms: u32) {
        let mut inner = self.lock();

        inner.state.action_pressed = false;
        inner.state.action_released = false;

        let down = inner.state.action_down;
        if down && !inner.prev_action_down {
            inner.state.action_pressed = true;
        }
        if !down && inner.prev_action_down {
            inner.state.action_released = true;
        }
        inner.prev_action_down = down;
    }

    /// Returns a snapshot copy of the current state.
    pub fn state(&self) -> InputState {
        self.lock().state
    }

    //--- Event-Side Mutators ----------------------------------------------

    /// Applies one touch sample. Invoked from the routing thread.
    pub(crate) fn handle_touch(&self, down: bool, x: i32, y: i32) {
        let mut inner = self.lock();

        inner.state.touch_down = down;
        inner.state.touch_x = x;
        inner.state.touch_y = y;

        let (joy_x, joy_y, active) = inner.joystick.feed(down, x, y);
        inner.state.joy_x = joy_x;
        inner.state.joy_y = joy_y;
        inner.state.joy_active = active;
    }

    /// Sets the action button level.
    ///
    /// The physical button is driven by an external source; this is the
    /// injection point for its level signal. Edge detection happens in
    /// [`InputStore::update`], not here.
    pub fn set_action_down(&self, down: bool) {
        self.lock().state.action_down = down;
    }

    //--- Internal Helpers -------------------------------------------------

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        // A poisoned lock still yields the data; input must stay readable.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn store() -> InputStore {
        InputStore::new(JoystickTuning::default())
    }

    //--- Edge Detection ---------------------------------------------------

    #[test]
    fn rising_edge_pulses_pressed_for_one_tick() {
        let store = store();

        store.update(16);
        assert!(!store.state().action_pressed);

        // false -> true -> false across three consecutive ticks.
        store.set_action_down(true);
        store.update(16);
        let tick2 = store.state();
        assert!(tick2.action_pressed);
        assert!(!tick2.action_released);

        store.set_action_down(false);
        store.update(16);
        let tick3 = store.state();
        assert!(!tick3.action_pressed);
        assert!(tick3.action_released);

        store.update(16);
        let tick4 = store.state();
        assert!(!tick4.action_pressed);
        assert!(!tick4.action_released);
    }

    #[test]
    fn held_level_pulses_only_once() {
        let store = store();

        store.set_action_down(true);
        store.update(16);
        assert!(store.state().action_pressed);

        store.update(16);
        assert!(!store.state().action_pressed, "held level must not re-pulse");
        assert!(store.state().action_down);
    }

    #[test]
    fn pulses_are_never_both_set_in_one_tick() {
        let store = store();

        for level in [true, false, true, true, false, false, true] {
            store.set_action_down(level);
            store.update(16);
            let snap = store.state();
            assert!(
                !(snap.action_pressed && snap.action_released),
                "pressed and released must be exclusive"
            );
        }
    }

    //--- Snapshot Semantics -----------------------------------------------

    #[test]
    fn snapshot_is_a_copy_not_a_view() {
        let store = store();
        store.handle_touch(true, 30, 40);

        let before = store.state();
        store.handle_touch(true, 90, 40);
        let after = store.state();

        assert_eq!((before.touch_x, before.touch_y), (30, 40));
        assert_eq!(after.touch_x, 90);
    }

    #[test]
    fn reset_zeroes_everything() {
        let store = store();
        store.handle_touch(true, 100, 100);
        store.handle_touch(true, 180, 140);
        store.set_action_down(true);
        store.update(16);

        store.reset();
        assert_eq!(store.state(), InputState::default());

        // A rise after reset is a fresh edge.
        store.set_action_down(true);
        store.update(16);
        assert!(store.state().action_pressed);
    }

    #[test]
    fn drag_scenario_produces_full_deflection() {
        let store = store();
        store.handle_touch(true, 100, 100);
        store.handle_touch(true, 180, 100);

        let snap = store.state();
        assert_eq!(snap.joy_x, 1.0);
        assert_eq!(snap.joy_y, 0.0);
        assert!(snap.joy_active);
    }

    //--- Cross-Thread Access ----------------------------------------------

    #[test]
    fn concurrent_touch_writes_keep_snapshots_consistent() {
        let store = Arc::new(store());

        let writer = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..2_000 {
                    store.handle_touch(true, 100 + (i % 300), 100 + (i % 200));
                }
                store.handle_touch(false, 0, 0);
            })
        };

        for _ in 0..2_000 {
            let snap = store.state();
            let magnitude = (snap.joy_x * snap.joy_x + snap.joy_y * snap.joy_y).sqrt();
            assert!(magnitude <= 1.0 + 1e-5);
        }

        writer.join().expect("writer thread");
        assert!(!store.state().joy_active);
    }
}
