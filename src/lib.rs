//=========================================================================
// Joydot — Library Root
//
// Game core for a small handheld touchscreen device: a virtual joystick
// derived from touch drag, a fixed-tick game loop, scene lifecycle
// dispatch, and fire-and-forget tone bursts.
//
// Responsibilities:
// - Expose the firmware entry point (`Firmware`) and the scene API
// - Define the board-support contracts the host implements (display
//   surface, touch capture, codec, tick source)
// - Keep game logic decoupled from vendor display/audio code behind
//   those contracts
//
// Typical usage:
// ```text
// use joydot::prelude::*;
//
// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
// enum GameScene { Play }
// impl SceneKey for GameScene {}
//
// fn main() {
//     let board = Board::new(display_port(), touch_port()).with_codec(codec_port());
//
//     FirmwareBuilder::<GameScene>::new()
//         .build(board)
//         .init(|scenes| {
//             scenes.register(GameScene::Play, Box::new(PlayScene::new(PlayParams::default())));
//         })
//         .with_boot_scene(GameScene::Play)
//         .run();
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the input store, scene system, and game loop. `platform`
// and `audio` define the board-support contracts, which the host crate
// implements against its display/touch/codec drivers. `scenes` contains
// the shipped game content.
//
pub mod audio;
pub mod core;
pub mod platform;
pub mod scenes;

//--- Internal Modules ----------------------------------------------------
//
// `firmware` defines the entry point and thread wiring.
//
mod firmware;

pub mod prelude;

//--- Public Exports ------------------------------------------------------
//
// Re-exports the entry point types so hosts can simply
// `use joydot::{Board, Firmware, FirmwareBuilder};`.
//
pub use firmware::{Board, Firmware, FirmwareBuilder};
