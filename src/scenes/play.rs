//=========================================================================
// Play Scene
//
// The demo scene: a dot driven around a playfield by the virtual
// joystick. The action button recenters it with a confirmation blip.
//
// Resource lifecycle: the dot object is created lazily on first enter,
// reused across repeated enters, and destroyed on leave. All display
// work happens under a scoped surface lock; lifecycle calls wait up to
// 200 ms while the per-tick position push waits only 10 ms and skips
// on contention.
//
//=========================================================================

//=== External Crates =====================================================

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use crate::core::context::DeviceContext;
use crate::core::input::InputState;
use crate::core::scene::Scene;
use crate::platform::{ObjectId, SurfaceGuard};

//=== Tuning Constants ====================================================

/// Surface lock budget for enter/leave resource management.
const LIFECYCLE_LOCK_MS: u32 = 200;

/// Surface lock budget for the per-tick position push. Deliberately
/// short: a missed tick is invisible, a stalled game loop is not.
const UPDATE_LOCK_MS: u32 = 10;

const BACKGROUND_RGB: u32 = 0x000000;

const RECENTER_TONE_HZ: u16 = 880;
const RECENTER_TONE_MS: u16 = 30;
const RECENTER_TONE_VOLUME: u8 = 40;

//=== PlayParams ==========================================================

/// Playfield geometry and movement tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayParams {
    /// Playfield size in pixels.
    pub width: i32,
    pub height: i32,

    /// Side length of the square dot.
    pub dot_size: i32,

    /// Movement speed at full joystick deflection.
    pub speed_px_s: i32,
}

impl Default for PlayParams {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
            dot_size: 40,
            speed_px_s: 180,
        }
    }
}

//=== PlayScene ===========================================================

/// Joystick-driven dot on a clamped playfield.
pub struct PlayScene {
    params: PlayParams,
    x: i32,
    y: i32,
    speed_px_s: i32,
    dot: Option<ObjectId>,
}

impl PlayScene {
    //--- Construction -----------------------------------------------------

    pub fn new(params: PlayParams) -> Self {
        let (x, y) = home_position(&params);
        Self {
            params,
            x,
            y,
            speed_px_s: params.speed_px_s,
            dot: None,
        }
    }

    /// Current dot position. Always within the clamped playfield.
    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}

fn home_position(params: &PlayParams) -> (i32, i32) {
    (params.width / 2, params.height / 2)
}

//=== Scene Implementation ================================================

impl Scene for PlayScene {
    fn on_enter(&mut self, ctx: &DeviceContext) {
        let (x, y) = home_position(&self.params);
        self.x = x;
        self.y = y;
        self.speed_px_s = self.params.speed_px_s;

        let Some(surface) = SurfaceGuard::acquire(ctx.display.as_ref(), LIFECYCLE_LOCK_MS) else {
            warn!("Play scene enter: surface lock timed out");
            return;
        };

        surface.fill_background(BACKGROUND_RGB);

        // Create once; a surviving handle from a previous enter is reused.
        if self.dot.is_none() {
            let dot = surface.create_rect(self.params.dot_size, self.params.dot_size);
            surface.set_position(dot, self.x, self.y);
            debug!("Play scene created dot {:?}", dot);
            self.dot = Some(dot);
        }
    }

    fn on_leave(&mut self, ctx: &DeviceContext) {
        let Some(surface) = SurfaceGuard::acquire(ctx.display.as_ref(), LIFECYCLE_LOCK_MS) else {
            warn!("Play scene leave: surface lock timed out");
            return;
        };

        if let Some(dot) = self.dot.take() {
            surface.delete_object(dot);
        }
    }

    fn on_update(&mut self, ctx: &DeviceContext, dt_ms: u32, input: &InputState) {
        let dt = dt_ms as f32 / 1000.0;
        self.x += (input.joy_x * self.speed_px_s as f32 * dt) as i32;
        self.y += (input.joy_y * self.speed_px_s as f32 * dt) as i32;

        self.x = self.x.clamp(0, self.params.width - self.params.dot_size);
        self.y = self.y.clamp(0, self.params.height - self.params.dot_size);

        if input.action_pressed {
            let (x, y) = home_position(&self.params);
            self.x = x;
            self.y = y;
            ctx.tones.play(RECENTER_TONE_HZ, RECENTER_TONE_MS, RECENTER_TONE_VOLUME);
        }

        let Some(dot) = self.dot else {
            return;
        };

        // Contention with the display's flush task is expected here; a
        // skipped push just means this tick's position lands next tick.
        if let Some(surface) = SurfaceGuard::acquire(ctx.display.as_ref(), UPDATE_LOCK_MS) {
            surface.set_position(dot, self.x, self.y);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::ToneService;
    use crate::platform::DisplayPort;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    //--- Test Helpers -----------------------------------------------------

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Op {
        Rect(i32, i32),
        Background(u32),
        Position(ObjectId, i32, i32),
        Delete(ObjectId),
    }

    struct FakeSurface {
        busy: AtomicBool,
        next_id: AtomicU32,
        ops: Mutex<Vec<Op>>,
    }

    impl FakeSurface {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                busy: AtomicBool::new(false),
                next_id: AtomicU32::new(1),
                ops: Mutex::new(Vec::new()),
            })
        }

        fn set_busy(&self, busy: bool) {
            self.busy.store(busy, Ordering::SeqCst);
        }

        fn ops(&self) -> Vec<Op> {
            self.ops.lock().unwrap().clone()
        }

        fn take_ops(&self) -> Vec<Op> {
            std::mem::take(&mut *self.ops.lock().unwrap())
        }
    }

    impl DisplayPort for FakeSurface {
        fn try_lock(&self, _timeout_ms: u32) -> bool {
            !self.busy.load(Ordering::SeqCst)
        }
        fn unlock(&self) {}
        fn create_rect(&self, width: i32, height: i32) -> ObjectId {
            let id = ObjectId(self.next_id.fetch_add(1, Ordering::SeqCst));
            self.ops.lock().unwrap().push(Op::Rect(width, height));
            id
        }
        fn fill_background(&self, rgb: u32) {
            self.ops.lock().unwrap().push(Op::Background(rgb));
        }
        fn set_position(&self, obj: ObjectId, x: i32, y: i32) {
            self.ops.lock().unwrap().push(Op::Position(obj, x, y));
        }
        fn delete_object(&self, obj: ObjectId) {
            self.ops.lock().unwrap().push(Op::Delete(obj));
        }
    }

    fn context(surface: &Arc<FakeSurface>) -> DeviceContext {
        DeviceContext::new(Arc::clone(surface) as Arc<dyn DisplayPort>, ToneService::disabled())
    }

    fn rect_count(ops: &[Op]) -> usize {
        ops.iter().filter(|op| matches!(op, Op::Rect(..))).count()
    }

    fn joystick(x: f32, y: f32) -> InputState {
        InputState {
            joy_x: x,
            joy_y: y,
            joy_active: true,
            ..InputState::default()
        }
    }

    //--- Resource Lifecycle -----------------------------------------------

    #[test]
    fn enter_creates_the_dot_at_home() {
        let surface = FakeSurface::new();
        let ctx = context(&surface);
        let mut scene = PlayScene::new(PlayParams::default());

        scene.on_enter(&ctx);

        let ops = surface.ops();
        assert_eq!(rect_count(&ops), 1);
        assert!(ops.contains(&Op::Background(0x000000)));
        assert_eq!(scene.position(), (160, 120));
    }

    #[test]
    fn repeated_enter_does_not_recreate_the_dot() {
        let surface = FakeSurface::new();
        let ctx = context(&surface);
        let mut scene = PlayScene::new(PlayParams::default());

        scene.on_enter(&ctx);
        scene.on_enter(&ctx);

        assert_eq!(rect_count(&surface.ops()), 1, "handle check guards recreation");
    }

    #[test]
    fn leave_deletes_the_dot_and_enter_recreates_it() {
        let surface = FakeSurface::new();
        let ctx = context(&surface);
        let mut scene = PlayScene::new(PlayParams::default());

        scene.on_enter(&ctx);
        scene.on_leave(&ctx);

        let ops = surface.take_ops();
        assert!(ops.iter().any(|op| matches!(op, Op::Delete(_))));

        scene.on_enter(&ctx);
        assert_eq!(rect_count(&surface.ops()), 1, "fresh dot after a real leave");
    }

    #[test]
    fn enter_with_busy_surface_degrades_and_recovers() {
        let surface = FakeSurface::new();
        let ctx = context(&surface);
        let mut scene = PlayScene::new(PlayParams::default());

        surface.set_busy(true);
        scene.on_enter(&ctx);
        assert!(surface.ops().is_empty(), "no display work without the lock");

        // Position still reset even though the dot could not be created.
        assert_eq!(scene.position(), (160, 120));

        surface.set_busy(false);
        scene.on_enter(&ctx);
        assert_eq!(rect_count(&surface.ops()), 1);
    }

    //--- Movement ---------------------------------------------------------

    #[test]
    fn update_integrates_joystick_deflection() {
        let surface = FakeSurface::new();
        let ctx = context(&surface);
        let mut scene = PlayScene::new(PlayParams::default());
        scene.on_enter(&ctx);
        surface.take_ops();

        // 1.0 deflection * 180 px/s * 0.5 s = 90 px
        scene.on_update(&ctx, 500, &joystick(1.0, 0.0));

        assert_eq!(scene.position(), (250, 120));
        let ops = surface.ops();
        assert_eq!(ops, vec![Op::Position(ObjectId(1), 250, 120)]);
    }

    #[test]
    fn position_stays_clamped_to_the_playfield() {
        let surface = FakeSurface::new();
        let ctx = context(&surface);
        let params = PlayParams::default();
        let mut scene = PlayScene::new(params);
        scene.on_enter(&ctx);

        // Hold full deflection toward each corner far longer than needed.
        for _ in 0..40 {
            scene.on_update(&ctx, 100, &joystick(1.0, 1.0));
        }
        assert_eq!(
            scene.position(),
            (params.width - params.dot_size, params.height - params.dot_size)
        );

        for _ in 0..40 {
            scene.on_update(&ctx, 100, &joystick(-1.0, -1.0));
        }
        assert_eq!(scene.position(), (0, 0));

        let (x, y) = scene.position();
        assert!(x >= 0 && x <= params.width - params.dot_size);
        assert!(y >= 0 && y <= params.height - params.dot_size);
    }

    #[test]
    fn action_press_recenters_after_movement() {
        let surface = FakeSurface::new();
        let ctx = context(&surface);
        let mut scene = PlayScene::new(PlayParams::default());
        scene.on_enter(&ctx);

        scene.on_update(&ctx, 500, &joystick(1.0, 0.0));
        assert_ne!(scene.position(), (160, 120));

        let input = InputState {
            action_pressed: true,
            ..InputState::default()
        };
        scene.on_update(&ctx, 16, &input);
        assert_eq!(scene.position(), (160, 120));
    }

    //--- Contention -------------------------------------------------------

    #[test]
    fn busy_surface_skips_the_position_push_without_error() {
        let surface = FakeSurface::new();
        let ctx = context(&surface);
        let mut scene = PlayScene::new(PlayParams::default());
        scene.on_enter(&ctx);
        surface.take_ops();

        surface.set_busy(true);
        scene.on_update(&ctx, 500, &joystick(1.0, 0.0));

        assert!(surface.ops().is_empty(), "push skipped this tick");
        assert_eq!(scene.position(), (250, 120), "movement still integrated");

        // Next tick with a free surface lands the current position.
        surface.set_busy(false);
        scene.on_update(&ctx, 0, &joystick(0.0, 0.0));
        assert_eq!(surface.ops(), vec![Op::Position(ObjectId(1), 250, 120)]);
    }

    #[test]
    fn update_before_enter_touches_no_display() {
        let surface = FakeSurface::new();
        let ctx = context(&surface);
        let mut scene = PlayScene::new(PlayParams::default());

        scene.on_update(&ctx, 16, &joystick(1.0, 0.0));
        assert!(surface.ops().is_empty());
    }
}
