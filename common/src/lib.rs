//! Avatar Stage Locomotion Rules
//!
//! Engine-free rules shared by the viewer and its tests: which keys move the
//! avatar, the two-state gait machine driven by key edges, the heading math
//! that turns a local direction into a world-space step relative to the
//! camera, and the square stage boundary.
//!
//! Coordinates follow the viewer's world convention: Y up, the ground is the
//! XZ plane, and a yaw of 0 faces +Z.

pub mod heading;
pub mod locomotion;
pub mod stage;

pub use heading::{Step, step, wrap_angle, yaw_toward};
pub use locomotion::{Gait, GaitChange, LocomotionIntent, MoveKey};
pub use stage::StageBounds;
