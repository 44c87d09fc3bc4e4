//! In-memory world used by the server binary and the tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use crate::domain::{Pawn, Rotator, Vector3, World};

#[derive(Debug, Default, Clone, Copy)]
struct Transform {
    location: Vector3,
    rotation: Rotator,
}

/// A pawn with a mutable transform. Non-finite values are refused.
#[derive(Debug, Default)]
pub struct SimPawn {
    transform: Mutex<Transform>,
    frozen: AtomicBool,
}

impl SimPawn {
    pub fn new(location: Vector3, rotation: Rotator) -> Self {
        Self {
            transform: Mutex::new(Transform { location, rotation }),
            frozen: AtomicBool::new(false),
        }
    }

    /// A frozen pawn refuses every setter.
    pub fn set_frozen(&self, frozen: bool) {
        self.frozen.store(frozen, Ordering::SeqCst);
    }

    fn update(&self, apply: impl FnOnce(&mut Transform)) -> bool {
        if self.frozen.load(Ordering::SeqCst) {
            return false;
        }
        match self.transform.lock() {
            Ok(mut transform) => {
                apply(&mut transform);
                true
            }
            Err(_) => {
                tracing::error!("Pawn transform lock poisoned");
                false
            }
        }
    }

    fn snapshot(&self) -> Transform {
        match self.transform.lock() {
            Ok(transform) => *transform,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

impl Pawn for SimPawn {
    fn location(&self) -> Vector3 {
        self.snapshot().location
    }

    fn set_location(&self, location: Vector3) -> bool {
        location.is_finite() && self.update(|t| t.location = location)
    }

    fn rotation(&self) -> Rotator {
        self.snapshot().rotation
    }

    fn set_rotation(&self, rotation: Rotator) -> bool {
        rotation.is_finite() && self.update(|t| t.rotation = rotation)
    }
}

/// A world with at most one possessed pawn.
#[derive(Default)]
pub struct SimWorld {
    pawn: RwLock<Option<Arc<SimPawn>>>,
}

impl SimWorld {
    /// World with no pawn under control.
    pub fn empty() -> Self {
        Self::default()
    }

    /// World with a pawn possessed at the origin.
    pub fn with_pawn() -> (Self, Arc<SimPawn>) {
        let world = Self::empty();
        let pawn = Arc::new(SimPawn::default());
        world.possess(pawn.clone());
        (world, pawn)
    }

    pub fn possess(&self, pawn: Arc<SimPawn>) {
        if let Ok(mut slot) = self.pawn.write() {
            *slot = Some(pawn);
        }
    }

    pub fn unpossess(&self) {
        if let Ok(mut slot) = self.pawn.write() {
            *slot = None;
        }
    }
}

impl World for SimWorld {
    fn controlled_pawn(&self) -> Option<Arc<dyn Pawn>> {
        let slot = self.pawn.read().ok()?;
        let pawn = slot.as_ref()?;
        Some(pawn.clone() as Arc<dyn Pawn>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_world_has_no_pawn() {
        assert!(SimWorld::empty().controlled_pawn().is_none());
    }

    #[test]
    fn test_possess_and_unpossess() {
        let (world, pawn) = SimWorld::with_pawn();
        pawn.set_location(Vector3::new(1.0, 2.0, 3.0));

        let controlled = world.controlled_pawn().unwrap();
        assert_eq!(controlled.location(), Vector3::new(1.0, 2.0, 3.0));

        world.unpossess();
        assert!(world.controlled_pawn().is_none());
    }

    #[test]
    fn test_setters_refuse_non_finite_values() {
        let pawn = SimPawn::new(Vector3::new(1.0, 1.0, 1.0), Rotator::default());
        assert!(!pawn.set_location(Vector3::new(f64::NAN, 0.0, 0.0)));
        assert!(!pawn.set_rotation(Rotator::new(0.0, f64::INFINITY, 0.0)));
        assert_eq!(pawn.location(), Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(pawn.rotation(), Rotator::default());
    }

    #[test]
    fn test_frozen_pawn_refuses_updates() {
        let pawn = SimPawn::default();
        pawn.set_frozen(true);
        assert!(!pawn.set_location(Vector3::new(1.0, 0.0, 0.0)));
        pawn.set_frozen(false);
        assert!(pawn.set_rotation(Rotator::new(10.0, 20.0, 30.0)));
        assert_eq!(pawn.rotation(), Rotator::new(10.0, 20.0, 30.0));
    }
}
