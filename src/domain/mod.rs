//! Domain accessor seam.
//!
//! Handlers read and write game state only through [`World`] and [`Pawn`].
//! Implementations are shared across request threads and must synchronize
//! themselves; the dispatch layer does not serialize access.

pub mod sim;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use sim::{SimPawn, SimWorld};

/// Position in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Orientation in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rotator {
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
}

impl Rotator {
    pub fn new(pitch: f64, yaw: f64, roll: f64) -> Self {
        Self { pitch, yaw, roll }
    }

    pub fn is_finite(&self) -> bool {
        self.pitch.is_finite() && self.yaw.is_finite() && self.roll.is_finite()
    }
}

/// The entity currently under player control.
pub trait Pawn: Send + Sync {
    fn location(&self) -> Vector3;

    /// Returns false if the move was refused.
    fn set_location(&self, location: Vector3) -> bool;

    fn rotation(&self) -> Rotator;

    /// Returns false if the rotation was refused.
    fn set_rotation(&self, rotation: Rotator) -> bool;
}

/// Access to the running game world.
pub trait World: Send + Sync {
    /// The pawn possessed by the first player, if any.
    fn controlled_pawn(&self) -> Option<Arc<dyn Pawn>>;
}
