//! Authoritative thing storage and identifier allocation.

use std::collections::BTreeMap;

use cleanroom_core::{Direction, Location, ThingId, ThingKind, ThingSnapshot};

/// Heading assigned to actors that enter the world without one.
pub(crate) const DEFAULT_HEADING: Direction = Direction::Up;

/// Placed entity stored inside the world or carried by an actor.
#[derive(Clone, Debug)]
pub(crate) struct Thing {
    /// Identifier allocated by the world for the thing.
    pub(crate) id: ThingId,
    /// Cell the thing occupies, or the carrier's cell while held.
    pub(crate) location: Location,
    /// Variant-specific state.
    pub(crate) body: Body,
}

impl Thing {
    pub(crate) fn kind(&self) -> ThingKind {
        self.body.kind()
    }

    pub(crate) fn snapshot(&self) -> ThingSnapshot {
        ThingSnapshot {
            id: self.id,
            kind: self.kind(),
            location: self.location,
        }
    }

    pub(crate) fn actor(&self) -> Option<&Actor> {
        match &self.body {
            Body::Actor(actor) => Some(actor),
            _ => None,
        }
    }

    pub(crate) fn actor_mut(&mut self) -> Option<&mut Actor> {
        match &mut self.body {
            Body::Actor(actor) => Some(actor),
            _ => None,
        }
    }
}

/// Variant-specific state of a thing.
#[derive(Clone, Debug)]
pub(crate) enum Body {
    Wall,
    Dirt,
    Actor(Actor),
}

impl Body {
    pub(crate) fn for_kind(kind: ThingKind) -> Self {
        match kind {
            ThingKind::Wall => Self::Wall,
            ThingKind::Dirt => Self::Dirt,
            ThingKind::Actor => Self::Actor(Actor::new(DEFAULT_HEADING)),
        }
    }

    pub(crate) fn kind(&self) -> ThingKind {
        match self {
            Self::Wall => ThingKind::Wall,
            Self::Dirt => ThingKind::Dirt,
            Self::Actor(_) => ThingKind::Actor,
        }
    }
}

/// Actor state layered on top of a thing.
#[derive(Clone, Debug)]
pub(crate) struct Actor {
    pub(crate) heading: Direction,
    /// Carried things, most recently grabbed last. Owned exclusively while held.
    pub(crate) holding: Vec<Thing>,
    pub(crate) bump: bool,
    pub(crate) performance: i64,
}

impl Actor {
    pub(crate) fn new(heading: Direction) -> Self {
        Self {
            heading,
            holding: Vec::new(),
            bump: false,
            performance: 0,
        }
    }
}

/// Registry that stores placed things and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct ThingRegistry {
    entries: BTreeMap<ThingId, Thing>,
    next_thing_id: ThingId,
}

impl ThingRegistry {
    /// Creates an empty registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_thing_id: ThingId::new(0),
        }
    }

    /// Stores a fresh thing at `location`, returning its new identifier.
    pub(crate) fn spawn(&mut self, body: Body, location: Location) -> ThingId {
        let id = self.next_thing_id;
        self.next_thing_id = ThingId::new(id.get().saturating_add(1));
        self.restore(Thing { id, location, body });
        id
    }

    /// Stores a thing that already owns an identifier.
    pub(crate) fn restore(&mut self, thing: Thing) {
        let _ = self.entries.insert(thing.id, thing);
    }

    pub(crate) fn remove(&mut self, id: ThingId) -> Option<Thing> {
        self.entries.remove(&id)
    }

    pub(crate) fn get(&self, id: ThingId) -> Option<&Thing> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: ThingId) -> Option<&mut Thing> {
        self.entries.get_mut(&id)
    }

    /// Iterator over every placed thing in identifier order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Thing> {
        self.entries.values()
    }

    /// Iterator over the things occupying `location` in identifier order.
    pub(crate) fn at(&self, location: Location) -> impl Iterator<Item = &Thing> {
        self.entries
            .values()
            .filter(move |thing| thing.location == location)
    }

    pub(crate) fn has_kind_at(&self, location: Location, kind: ThingKind) -> bool {
        self.at(location).any(|thing| thing.kind() == kind)
    }

    pub(crate) fn has_obstacle_at(&self, location: Location) -> bool {
        self.at(location).any(|thing| thing.kind().is_obstacle())
    }
}
