//=========================================================================
// Scene System
//=========================================================================
//
// Scene lifecycle with exactly one active scene.
//
// Architecture:
//   SceneDispatcher
//     ├─ scenes: HashMap<K, Box<dyn Scene>>
//     └─ active: Option<K>
//
// Flow:
//   set_active() → on_leave(current) → on_enter(next)
//   tick         → update() → Scene::on_update(dt, input)
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::context::DeviceContext;
use crate::core::input::InputState;

//=== Standard Library Imports ============================================

use std::fmt::Debug;
use std::hash::Hash;

//=== Module Declarations =================================================

mod dispatcher;

//=== Public API ==========================================================

pub use dispatcher::SceneDispatcher;

//=== Scene Key Trait =====================================================

/// Marker trait for scene identifiers.
///
/// Scene keys uniquely identify scenes in the dispatcher's registry.
/// Typically implemented by a game-specific enum.
pub trait SceneKey: Clone + Copy + Eq + Hash + Debug + Send + 'static {}

//=== Scene Trait =========================================================

/// Defines scene behavior: lifecycle hooks plus per-tick update logic.
///
/// Scenes are registered in the dispatcher and activated one at a time.
/// A scene owns its visual resources: `on_enter` (re)creates them on the
/// display surface and `on_leave` must release them, so resources never
/// outlive one activation interval.
///
/// # Minimal Implementation
///
/// Only `on_update` is required; the lifecycle hooks default to no-ops:
///
/// ```rust
/// # use joydot::core::context::DeviceContext;
/// # use joydot::core::input::InputState;
/// # use joydot::core::scene::Scene;
/// struct IdleScene;
///
/// impl Scene for IdleScene {
///     fn on_update(&mut self, _ctx: &DeviceContext, _dt_ms: u32, _input: &InputState) {
///         // Only this method is required
///     }
/// }
/// ```
pub trait Scene: Send {
    /// Called when the scene becomes active.
    ///
    /// Default implementation does nothing. Override to reset game state
    /// and create visual resources.
    fn on_enter(&mut self, _ctx: &DeviceContext) {}

    /// Called when the scene stops being active.
    ///
    /// Default implementation does nothing. Override to release visual
    /// resources.
    fn on_leave(&mut self, _ctx: &DeviceContext) {}

    /// Called every tick while the scene is active.
    ///
    /// `dt_ms` is the measured time since the previous tick; `input` is a
    /// read-only snapshot taken at the start of this tick.
    fn on_update(&mut self, ctx: &DeviceContext, dt_ms: u32, input: &InputState);
}
