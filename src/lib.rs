pub mod math;
pub mod constants;
pub mod error;
pub mod transform;
pub mod surface;
pub mod render;
pub mod integrator;
pub mod control;
pub mod body;
pub mod crash;
pub mod output;
pub mod config;
pub mod cli;
pub mod sim;

pub use body::{ Body, BodyBuilder, BodyKind };
pub use config::SimConfig;
pub use error::SimError;
pub use math::Vec2;
pub use sim::{ FrameControl, Simulation };

///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Notes
//
// Coordinate system:
//  Simulation space has its origin at the lower left with +Y up; y <= 0 is the ground. The grid surface has its
//  origin at the upper left with rows growing down. Nothing is flipped until the moment a glyph is clipped.
//
// Clocks:
//  Real elapsed time (wall) drives flicker and spin so they look the same at any frame rate. Simulation time (now)
//  is wall time scaled by the time warp, and drives physics and the autopilot so warp speeds up both together.
//
// Frame:
//  1. Handle at most one key
//  2. Advance + constrain every body against the previous frame's state, building the next body list
//  3. Clear, draw bodies, draw HUD, refresh
//
///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
