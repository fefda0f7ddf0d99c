//! Sensors that turn world state into what an actor is allowed to perceive.

use cleanroom_core::{BumpStatus, DirtStatus, NearbyThing, ThingId, ThingKind, VacuumPercept};

use crate::{GridWorld, Phase};

/// Produces a percept for one actor from the current world state.
pub trait Sensor {
    /// Value handed to the actor's program.
    type Percept;

    /// Senses on behalf of `actor`, or `None` when it is not a live actor.
    fn sense<P: Phase>(&self, world: &GridWorld<P>, actor: ThingId) -> Option<Self::Percept>;
}

/// Perceives every thing within a radius of the actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NearbySensor {
    radius: i64,
}

impl NearbySensor {
    /// Creates a sensor that reaches `radius` cells around the actor.
    #[must_use]
    pub const fn new(radius: i64) -> Self {
        Self { radius }
    }

    /// Perception radius in cells.
    #[must_use]
    pub const fn radius(&self) -> i64 {
        self.radius
    }
}

impl Default for NearbySensor {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Sensor for NearbySensor {
    type Percept = Vec<NearbyThing>;

    fn sense<P: Phase>(&self, world: &GridWorld<P>, actor: ThingId) -> Option<Self::Percept> {
        let thing = world.things.get(actor)?;
        let _ = thing.actor()?;
        Some(world.things_near(thing.location, Some(self.radius)))
    }
}

/// Perceives dirt under the actor and whether its last move bumped.
///
/// The actor's location is deliberately withheld.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DirtSensor;

impl Sensor for DirtSensor {
    type Percept = VacuumPercept;

    fn sense<P: Phase>(&self, world: &GridWorld<P>, actor: ThingId) -> Option<Self::Percept> {
        let thing = world.things.get(actor)?;
        let state = thing.actor()?;
        let status = if world.things.has_kind_at(thing.location, ThingKind::Dirt) {
            DirtStatus::Dirty
        } else {
            DirtStatus::Clean
        };
        let bump = if state.bump {
            BumpStatus::Bump
        } else {
            BumpStatus::Clear
        };
        Some(VacuumPercept { status, bump })
    }
}
