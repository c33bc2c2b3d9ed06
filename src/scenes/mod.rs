//=========================================================================
// Scenes
//
// Concrete scene implementations shipped with the firmware. The core's
// scene system is generic; everything here is the actual game content.
//
//=========================================================================

pub mod play;
