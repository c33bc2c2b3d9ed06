//=========================================================================
// Firmware Entry Point
//
// Main coordinator: wires the board ports to the game core and runs it.
//
// Architecture:
// ```text
//     FirmwareBuilder ──build(board)──> Firmware ──run()──> [Runtime]
//         │                               │
//         ├─ with_tps()                   ├─ spawns touch routing thread
//         ├─ with_channel_capacity()      ├─ spawns game loop thread
//         ├─ with_settle_ms()             └─ blocks for process lifetime
//         └─ with_joystick()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::bounded;
use log::{error, info};

//=== Internal Dependencies ===============================================

use crate::audio::{CodecPort, ToneService};
use crate::core::context::DeviceContext;
use crate::core::input::{InputStore, JoystickTuning};
use crate::core::scene::{SceneDispatcher, SceneKey};
use crate::core::GameLoop;
use crate::platform::{spawn_touch_router, DisplayPort, MonotonicClock, TickSource, TouchPort};

use std::marker::PhantomData;
use std::sync::Arc;
use std::thread;

//=== Board ===============================================================

/// The host board's ports, assembled once at startup.
///
/// `display` and `touch` are mandatory; a board without a speaker simply
/// leaves `codec` out and tone playback becomes a no-op. The clock
/// defaults to [`MonotonicClock`] and is swappable for tests.
pub struct Board {
    pub display: Arc<dyn DisplayPort>,
    pub touch: Box<dyn TouchPort>,
    pub codec: Option<Box<dyn CodecPort>>,
    pub clock: Box<dyn TickSource>,
}

impl Board {
    pub fn new(display: Arc<dyn DisplayPort>, touch: Box<dyn TouchPort>) -> Self {
        Self {
            display,
            touch,
            codec: None,
            clock: Box::new(MonotonicClock::new()),
        }
    }

    /// Attaches the speaker codec.
    pub fn with_codec(mut self, codec: Box<dyn CodecPort>) -> Self {
        self.codec = Some(codec);
        self
    }

    /// Replaces the default monotonic clock.
    pub fn with_clock(mut self, clock: Box<dyn TickSource>) -> Self {
        self.clock = clock;
        self
    }
}

//=== FirmwareBuilder =====================================================

/// Builder for configuring and constructing a [`Firmware`] instance.
///
/// # Default Values
///
/// - **TPS**: 60.0 (game ticks per second, 16 ms nominal period)
/// - **Channel capacity**: 64 touch events
/// - **Settle delay**: 200 ms before input bring-up
/// - **Joystick tuning**: 0.10 deadzone, 80 px full deflection
///
/// # Examples
///
/// ```text
/// FirmwareBuilder::<GameScene>::new()
///     .with_tps(60.0)
///     .build(board)
///     .init(|scenes| {
///         scenes.register(GameScene::Play, Box::new(PlayScene::new(PlayParams::default())));
///     })
///     .with_boot_scene(GameScene::Play)
///     .run();
/// ```
pub struct FirmwareBuilder<K: SceneKey> {
    tps: f64,
    channel_capacity: usize,
    settle_ms: u32,
    joystick: JoystickTuning,
    _phantom: PhantomData<K>,
}

impl<K: SceneKey> FirmwareBuilder<K> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            tps: 60.0,
            channel_capacity: 64,
            settle_ms: 200,
            joystick: JoystickTuning::default(),
            _phantom: PhantomData,
        }
    }

    /// Sets the target ticks per second for the game loop.
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.tps = tps;
        self
    }

    /// Sets the touch event channel capacity.
    ///
    /// The store keeps only the latest snapshot, so this only needs to
    /// absorb the driver's burst rate between routing-thread wakeups.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Sets the one-time settle delay before input bring-up, giving the
    /// display stack time to finish its own initialization.
    pub fn with_settle_ms(mut self, settle_ms: u32) -> Self {
        self.settle_ms = settle_ms;
        self
    }

    /// Overrides the virtual joystick tuning.
    pub fn with_joystick(mut self, tuning: JoystickTuning) -> Self {
        self.joystick = tuning;
        self
    }

    /// Builds the firmware against the given board ports.
    pub fn build(self, board: Board) -> Firmware<K> {
        info!(
            "Building firmware (TPS: {}, channel: {})",
            self.tps, self.channel_capacity
        );

        Firmware {
            board,
            scenes: SceneDispatcher::new(),
            boot_scene: None,
            tps: self.tps,
            channel_capacity: self.channel_capacity,
            settle_ms: self.settle_ms,
            joystick: self.joystick,
        }
    }
}

impl<K: SceneKey> Default for FirmwareBuilder<K> {
    fn default() -> Self {
        Self::new()
    }
}

//=== Firmware ============================================================

/// Firmware runtime.
///
/// Owns the scene registry and board ports between construction and
/// `run()`. Create via [`FirmwareBuilder`], register scenes with
/// [`Firmware::init`], pick the boot scene, then call [`Firmware::run`].
///
/// # Threads
///
/// ```text
/// Firmware::run (caller thread, parks)
///   ├─► touch routing thread: driver events → InputStore
///   ├─► game loop thread: fixed-tick input/scene updates
///   └─► tone worker thread (only when a codec is attached)
/// ```
pub struct Firmware<K: SceneKey> {
    board: Board,
    scenes: SceneDispatcher<K>,
    boot_scene: Option<K>,
    tps: f64,
    channel_capacity: usize,
    settle_ms: u32,
    joystick: JoystickTuning,
}

impl<K: SceneKey> Firmware<K> {
    //--- Initialization ---------------------------------------------------

    /// Registers scenes before execution.
    ///
    /// The closure receives the scene dispatcher so game code can install
    /// its scene set. Can only be called before [`Firmware::run`].
    pub fn init<F>(mut self, init_fn: F) -> Self
    where
        F: FnOnce(&mut SceneDispatcher<K>),
    {
        info!("Registering scenes");
        init_fn(&mut self.scenes);
        self
    }

    /// Selects the scene the game loop activates once at startup.
    pub fn with_boot_scene(mut self, key: K) -> Self {
        self.boot_scene = Some(key);
        self
    }

    //--- Execution --------------------------------------------------------

    /// Starts the firmware runtime and blocks for process lifetime.
    ///
    /// # Lifecycle
    ///
    /// 1. Creates the bounded touch event channel
    /// 2. Spawns the routing thread feeding the input store
    /// 3. Starts the tone service (degrades without a codec)
    /// 4. Spawns the game loop thread (settle, input init, boot scene,
    ///    steady-state ticks)
    /// 5. Parks on the game thread, which never exits normally
    ///
    /// # Thread Panic Handling
    ///
    /// If the game thread panics the error is logged and `run` returns,
    /// letting the host decide whether to restart or reboot.
    pub fn run(self) {
        info!("Starting firmware runtime (TPS: {})", self.tps);

        //--- 1. Input plumbing -------------------------------------------
        let (touch_tx, touch_rx) = bounded(self.channel_capacity);
        let input = Arc::new(InputStore::new(self.joystick));

        let _router = spawn_touch_router(touch_rx, Arc::clone(&input));
        info!("Touch routing thread spawned");

        //--- 2. Shared services ------------------------------------------
        let Board { display, touch, codec, clock } = self.board;

        let tones = match codec {
            Some(codec) => ToneService::start(codec),
            None => ToneService::disabled(),
        };
        let context = DeviceContext::new(display, tones);

        //--- 3. Game loop thread -----------------------------------------
        let period_ms = (1000.0 / self.tps).round().max(1.0) as u32;
        let game = GameLoop::new(
            input,
            self.scenes,
            context,
            clock,
            period_ms,
            self.settle_ms,
            self.boot_scene,
        );

        let game_handle = thread::spawn(move || game.run(touch, touch_tx));
        info!("Game loop thread spawned");

        //--- 4. Park ------------------------------------------------------
        // The game loop runs for process lifetime; reaching past this
        // join means it panicked.
        match game_handle.join() {
            Ok(()) => info!("Game loop exited"),
            Err(e) => error!("Game loop panicked: {:?}", e),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{NullDisplay, NullTouch};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum TestKey {
        Play,
    }

    impl SceneKey for TestKey {}

    fn board() -> Board {
        Board::new(Arc::new(NullDisplay), Box::new(NullTouch))
    }

    //=====================================================================
    // FirmwareBuilder Tests
    //=====================================================================

    #[test]
    fn builder_defaults() {
        let builder = FirmwareBuilder::<TestKey>::new();
        assert_eq!(builder.tps, 60.0);
        assert_eq!(builder.channel_capacity, 64);
        assert_eq!(builder.settle_ms, 200);
        assert_eq!(builder.joystick, JoystickTuning::default());
    }

    #[test]
    fn builder_with_tps() {
        let builder = FirmwareBuilder::<TestKey>::new().with_tps(120.0);
        assert_eq!(builder.tps, 120.0);
    }

    #[test]
    #[should_panic(expected = "TPS must be positive")]
    fn builder_with_tps_panics_on_zero() {
        FirmwareBuilder::<TestKey>::new().with_tps(0.0);
    }

    #[test]
    #[should_panic(expected = "TPS must be positive")]
    fn builder_with_tps_panics_on_negative() {
        FirmwareBuilder::<TestKey>::new().with_tps(-60.0);
    }

    #[test]
    #[should_panic(expected = "Channel capacity must be positive")]
    fn builder_with_channel_capacity_panics_on_zero() {
        FirmwareBuilder::<TestKey>::new().with_channel_capacity(0);
    }

    #[test]
    fn builder_fluent_api_chaining() {
        let firmware = FirmwareBuilder::<TestKey>::new()
            .with_tps(120.0)
            .with_channel_capacity(256)
            .with_settle_ms(50)
            .build(board());

        assert_eq!(firmware.tps, 120.0);
        assert_eq!(firmware.channel_capacity, 256);
        assert_eq!(firmware.settle_ms, 50);
    }

    //=====================================================================
    // Firmware Tests
    //=====================================================================

    #[test]
    fn boot_scene_is_recorded() {
        let firmware = FirmwareBuilder::<TestKey>::new()
            .build(board())
            .with_boot_scene(TestKey::Play);

        assert_eq!(firmware.boot_scene, Some(TestKey::Play));
    }

    #[test]
    fn init_reaches_the_scene_dispatcher() {
        let mut called = false;
        let _firmware = FirmwareBuilder::<TestKey>::new().build(board()).init(|scenes| {
            called = true;
            assert!(scenes.active().is_none());
        });
        assert!(called);
    }

    #[test]
    fn board_defaults_have_no_codec() {
        let board = board();
        assert!(board.codec.is_none());
    }
}
