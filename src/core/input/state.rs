//=========================================================================
// Input Snapshot
//
// The per-tick input value handed to scenes. Plain copyable data: the
// store owns the live instance and every reader gets a copy, so scenes
// never observe a half-written state.
//
//=========================================================================

/// Snapshot of the device's input for one game tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputState {
    /// Virtual joystick deflection, -1 to 1 per axis.
    ///
    /// Positive `joy_y` corresponds to an upward drag on screen; the sign
    /// is flipped from screen coordinates when the vector is derived.
    pub joy_x: f32,
    pub joy_y: f32,

    /// Whether a touch sequence is currently driving the joystick.
    pub joy_active: bool,

    /// Action button level.
    pub action_down: bool,

    /// One-tick pulse: `action_down` rose this tick.
    pub action_pressed: bool,

    /// One-tick pulse: `action_down` fell this tick.
    pub action_released: bool,

    /// Raw touch contact state and position, screen pixels.
    pub touch_down: bool,
    pub touch_x: i32,
    pub touch_y: i32,
}
