//=========================================================================
// Display Surface Contract
//
// Contract for the board's rendering surface. The display stack (widget
// toolkit, flush task, panel driver) lives outside this crate; game code
// only needs a handful of primitives: a bounded-wait surface lock plus
// object creation, positioning, styling, and deletion.
//
// The surface lock is shared with the display's own flush task, so callers
// must treat a failed acquisition as routine contention and skip the
// operation rather than stall the game tick.
//
// Responsibilities:
// - Define the raw lock/object primitives the host board implements
// - Wrap the raw lock pair in an RAII guard (`SurfaceGuard`) so the lock
//   is released on every exit path
//
//=========================================================================

//=== ObjectId ============================================================

/// Opaque handle to an object created on the display surface.
///
/// The host's display layer assigns these when objects are created and
/// resolves them back to concrete widgets on positioning and deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(pub u32);

//=== DisplayPort =========================================================

/// Rendering surface implemented by the host board.
///
/// All object operations require the surface lock to be held. Game code
/// never calls the raw `try_lock`/`unlock` pair directly; it goes through
/// [`SurfaceGuard::acquire`], which pairs the two automatically.
///
/// # Contract
///
/// - `try_lock` waits at most `timeout_ms` milliseconds and returns whether
///   the lock was taken. It must never block past the timeout.
/// - Object operations are only invoked between a successful `try_lock`
///   and the matching `unlock`.
pub trait DisplayPort: Send + Sync {
    /// Attempts to take the surface lock, waiting at most `timeout_ms`.
    fn try_lock(&self, timeout_ms: u32) -> bool;

    /// Releases the surface lock taken by a successful `try_lock`.
    fn unlock(&self);

    /// Creates a filled rectangle object and returns its handle.
    fn create_rect(&self, width: i32, height: i32) -> ObjectId;

    /// Fills the screen background with an `0xRRGGBB` color.
    fn fill_background(&self, rgb: u32);

    /// Moves an object to pixel position `(x, y)`, top-left origin.
    fn set_position(&self, obj: ObjectId, x: i32, y: i32);

    /// Deletes an object. The handle is invalid afterwards.
    fn delete_object(&self, obj: ObjectId);
}

//=== SurfaceGuard ========================================================

/// Scoped surface lock.
///
/// Acquired via [`SurfaceGuard::acquire`] with a bounded wait; `None`
/// means the surface was busy for the whole timeout and the caller should
/// skip its drawing work for this tick. The underlying lock is released
/// when the guard drops, on every exit path.
pub struct SurfaceGuard<'a> {
    port: &'a dyn DisplayPort,
}

impl<'a> SurfaceGuard<'a> {
    /// Takes the surface lock, waiting at most `timeout_ms` milliseconds.
    pub fn acquire(port: &'a dyn DisplayPort, timeout_ms: u32) -> Option<Self> {
        if port.try_lock(timeout_ms) {
            Some(Self { port })
        } else {
            None
        }
    }

    /// Creates a filled rectangle object and returns its handle.
    pub fn create_rect(&self, width: i32, height: i32) -> ObjectId {
        self.port.create_rect(width, height)
    }

    /// Fills the screen background with an `0xRRGGBB` color.
    pub fn fill_background(&self, rgb: u32) {
        self.port.fill_background(rgb)
    }

    /// Moves an object to pixel position `(x, y)`.
    pub fn set_position(&self, obj: ObjectId, x: i32, y: i32) {
        self.port.set_position(obj, x, y)
    }

    /// Deletes an object created on this surface.
    pub fn delete_object(&self, obj: ObjectId) {
        self.port.delete_object(obj)
    }
}

impl Drop for SurfaceGuard<'_> {
    fn drop(&mut self) {
        self.port.unlock();
    }
}

//=== Test Support ========================================================
//
// Minimal surface stub for modules that need a context but never draw.
//
#[cfg(test)]
pub(crate) struct NullDisplay;

#[cfg(test)]
impl DisplayPort for NullDisplay {
    fn try_lock(&self, _timeout_ms: u32) -> bool {
        true
    }
    fn unlock(&self) {}
    fn create_rect(&self, _width: i32, _height: i32) -> ObjectId {
        ObjectId(0)
    }
    fn fill_background(&self, _rgb: u32) {}
    fn set_position(&self, _obj: ObjectId, _x: i32, _y: i32) {}
    fn delete_object(&self, _obj: ObjectId) {}
}

//=========================================================================
// Unit Tests
//=========================================================================
