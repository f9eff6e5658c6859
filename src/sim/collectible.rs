//! Caught fish flying back to shore
//!
//! A fish is airborne until the physics collaborator reports it slowed below
//! the landing speed. Landed fish can be picked up by touching the player and
//! spoil after a while if nobody does.

use serde::{Deserialize, Serialize};

use super::clock::Countdown;
use super::state::EntityId;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CollectiblePhase {
    /// In flight, owned by physics
    Airborne,
    /// On the ground, pickup eligible until the countdown runs out
    Landed { ttl: Countdown },
    Collected,
    Expired,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    pub id: EntityId,
    pub species: String,
    pub health_value: i32,
    pub score_value: u32,
    pub phase: CollectiblePhase,
}

impl Collectible {
    pub fn new(id: EntityId, species: String, health_value: i32, score_value: u32) -> Self {
        Self {
            id,
            species,
            health_value,
            score_value,
            phase: CollectiblePhase::Airborne,
        }
    }

    pub fn is_pickup_eligible(&self) -> bool {
        matches!(self.phase, CollectiblePhase::Landed { .. })
    }

    /// Finished one way or the other; ready to drop from the world
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, CollectiblePhase::Collected | CollectiblePhase::Expired)
    }

    /// Physics speed report. Returns `true` when this report landed the fish.
    pub fn report_speed(&mut self, speed: f32, landing_speed: f32, ttl: f32) -> bool {
        if self.phase != CollectiblePhase::Airborne || speed >= landing_speed {
            return false;
        }
        self.phase = CollectiblePhase::Landed {
            ttl: Countdown::started(ttl),
        };
        true
    }

    /// Attempt pickup. Only landed fish can be collected.
    pub fn collect(&mut self) -> bool {
        if !self.is_pickup_eligible() {
            return false;
        }
        self.phase = CollectiblePhase::Collected;
        true
    }

    /// Age a landed fish. Returns `true` on the tick it expires.
    pub fn update(&mut self, dt: f32) -> bool {
        let expired = match &mut self.phase {
            CollectiblePhase::Landed { ttl } => ttl.tick(dt),
            _ => false,
        };
        if expired {
            self.phase = CollectiblePhase::Expired;
        }
        expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perch() -> Collectible {
        Collectible::new(7, "Perch".to_string(), 10, 10)
    }

    #[test]
    fn test_airborne_fish_cannot_be_collected() {
        let mut fish = perch();
        assert!(!fish.collect());
        assert!(!fish.report_speed(3.0, 0.5, 30.0));
        assert!(fish.report_speed(0.2, 0.5, 30.0));
        assert!(fish.collect());
        assert!(fish.is_finished());
        assert!(!fish.collect());
    }

    #[test]
    fn test_landed_fish_expires() {
        let mut fish = perch();
        fish.report_speed(0.0, 0.5, 2.0);
        assert!(!fish.update(1.0));
        assert!(fish.update(1.0));
        assert_eq!(fish.phase, CollectiblePhase::Expired);
        assert!(!fish.collect());
    }
}
