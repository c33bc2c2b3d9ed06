//=========================================================================
// Scene Dispatcher
//=========================================================================
//
// Owns the scene registry and the single active-scene slot, and performs
// leave/enter transitions.
//
// State machine: { no active scene } ∪ { scene K active }. Transitions
// run synchronously inside set_active and complete before it returns, so
// no tick ever observes a half-switched scene. There is no terminal
// state; the dispatcher runs until process exit.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::{Scene, SceneKey};
use crate::core::context::DeviceContext;
use crate::core::input::InputState;

//=== Scene Dispatcher ====================================================

/// Registry plus single active-scene slot.
///
/// Scenes are registered once at startup and referenced by key. Each
/// scene instance lives for process lifetime and keeps its own state
/// between activations; only its visual resources follow the
/// enter/leave lifecycle.
pub struct SceneDispatcher<K: SceneKey> {
    scenes: HashMap<K, Box<dyn Scene>>,
    active: Option<K>,
}

impl<K: SceneKey> SceneDispatcher<K> {
    //--- Construction -----------------------------------------------------

    /// Creates a dispatcher with no scenes and no active scene.
    pub fn new() -> Self {
        Self {
            scenes: HashMap::new(),
            active: None,
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers a scene under `key`.
    ///
    /// Scenes must be registered before they can be activated.
    pub fn register(&mut self, key: K, scene: Box<dyn Scene>) {
        if self.scenes.insert(key, scene).is_some() {
            warn!("Scene {:?} was already registered and has been replaced", key);
        }
    }

    /// Returns the key of the active scene, if any.
    pub fn active(&self) -> Option<K> {
        self.active
    }

    //--- Transitions ------------------------------------------------------

    /// Switches the active scene to `key`.
    ///
    /// A no-op when `key` is already active. An unregistered key is
    /// ignored with a warning. Otherwise the current scene's `on_leave`
    /// runs, the slot is reassigned, and the next scene's `on_enter`
    /// runs, in that order, before this method returns.
    pub fn set_active(&mut self, key: K, ctx: &DeviceContext) {
        if self.active == Some(key) {
            debug!("Scene {:?} is already active, skipping transition", key);
            return;
        }

        if !self.scenes.contains_key(&key) {
            warn!("Attempted to activate unregistered scene {:?}", key);
            return;
        }

        if let Some(current) = self.active {
            if let Some(scene) = self.scenes.get_mut(&current) {
                scene.on_leave(ctx);
            }
        }

        debug!("Activating scene {:?}", key);
        self.active = Some(key);

        if let Some(scene) = self.scenes.get_mut(&key) {
            scene.on_enter(ctx);
        }
    }

    //--- Update Loop ------------------------------------------------------

    /// Forwards one tick to the active scene, if any.
    pub fn update(&mut self, ctx: &DeviceContext, dt_ms: u32, input: &InputState) {
        if let Some(key) = self.active {
            if let Some(scene) = self.scenes.get_mut(&key) {
                scene.on_update(ctx, dt_ms, input);
            }
        }
    }
}

impl<K: SceneKey> Default for SceneDispatcher<K> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
