#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative grid world state management for Cleanroom.
//!
//! A [`GridWorld`] owns every placed thing, the usable rectangle and the
//! observers listening for movement and deletion. Mutating operations append
//! [`Event`] values to a caller-provided buffer so adapters can narrate what
//! happened; observers are notified synchronously in registration order.
//!
//! Walls are raised through a one-way transition: [`GridWorld<Open>`] becomes
//! [`GridWorld<Walled>`], whose usable rectangle excludes the perimeter.

pub mod perception;
mod registry;

use std::{cell::RefCell, fmt, marker::PhantomData, rc::Rc};

use cleanroom_core::{
    Action, Bounds, Direction, Event, IgnoreReason, Location, NearbyThing, PlacementError,
    ThingId, ThingKind, ThingSnapshot,
};
use log::{debug, trace};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::registry::{Actor, Body, Thing, ThingRegistry};

const DEFAULT_WORLD_SEED: u64 = 0x42f0_e1eb_d4a5_3c21;
const DEFAULT_PERCEPTIBLE_DISTANCE: i64 = 1;
const DEFAULT_LOCATION_ATTEMPTS: usize = 64;
const SUCK_REWARD: i64 = 10;
const STEP_PENALTY: i64 = 1;

/// Bounds phase of a [`GridWorld`].
pub trait Phase {
    /// Number of cells trimmed from every side of the grid.
    const INSET: i32;
}

/// Phase of a world whose whole grid is usable.
#[derive(Debug)]
pub enum Open {}

impl Phase for Open {
    const INSET: i32 = 0;
}

/// Phase of a world whose perimeter is occupied by walls.
#[derive(Debug)]
pub enum Walled {}

impl Phase for Walled {
    const INSET: i32 = 1;
}

/// Passive listener notified when things move or leave the world.
pub trait Observer {
    /// Called after `thing` moved to its new location.
    fn thing_moved(&mut self, thing: &ThingSnapshot);

    /// Called after `thing` was removed from the world.
    fn thing_deleted(&mut self, thing: &ThingSnapshot);
}

impl<O: Observer> Observer for Rc<RefCell<O>> {
    fn thing_moved(&mut self, thing: &ThingSnapshot) {
        self.borrow_mut().thing_moved(thing);
    }

    fn thing_deleted(&mut self, thing: &ThingSnapshot) {
        self.borrow_mut().thing_deleted(thing);
    }
}

/// Represents the authoritative grid world state.
pub struct GridWorld<P: Phase> {
    width: u32,
    height: u32,
    bounds: Bounds,
    things: ThingRegistry,
    observers: Vec<Box<dyn Observer>>,
    rng: ChaCha8Rng,
    phase: PhantomData<fn() -> P>,
}

impl GridWorld<Open> {
    /// Creates an unwalled world seeded with the default placement seed.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_seed(width, height, DEFAULT_WORLD_SEED)
    }

    /// Creates an unwalled world whose random placements derive from `seed`.
    #[must_use]
    pub fn with_seed(width: u32, height: u32, seed: u64) -> Self {
        Self {
            width,
            height,
            bounds: Bounds::of_grid(width, height).inset(Open::INSET),
            things: ThingRegistry::new(),
            observers: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            phase: PhantomData,
        }
    }

    /// Places walls along the full perimeter and narrows the usable rectangle.
    ///
    /// Walls are placed while the outer rectangle is still in effect; every
    /// bounds check performed by the returned world uses the interior.
    #[must_use]
    pub fn add_walls(mut self, out: &mut Vec<Event>) -> GridWorld<Walled> {
        for location in perimeter(self.bounds) {
            let _ = self.add_thing(ThingKind::Wall, Some(location), false, out);
        }

        let bounds = Bounds::of_grid(self.width, self.height).inset(Walled::INSET);
        out.push(Event::WallsRaised { bounds });
        debug!("walls raised around a {}x{} grid", self.width, self.height);

        GridWorld {
            width: self.width,
            height: self.height,
            bounds,
            things: self.things,
            observers: self.observers,
            rng: self.rng,
            phase: PhantomData,
        }
    }
}

impl<P: Phase> GridWorld<P> {
    /// Width of the grid in cells, perimeter included.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the grid in cells, perimeter included.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Usable rectangle for the world's current phase.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Reports whether `location` lies in the usable rectangle, edges included.
    #[must_use]
    pub fn is_inbounds(&self, location: Location) -> bool {
        self.bounds.contains(location)
    }

    /// Registers an observer. Notifications follow registration order.
    pub fn add_observer(&mut self, observer: Box<dyn Observer>) {
        self.observers.push(observer);
    }

    /// Adds a thing of `kind` to the world.
    ///
    /// Without a location the default-location policy chooses one. Invalid
    /// placements are dropped rather than rejected: the world is left untouched
    /// and a [`Event::PlacementRejected`] diagnostic is emitted. When
    /// `exclude_duplicate_kind` is set, a location already holding a thing of
    /// the same kind is treated as invalid.
    pub fn add_thing(
        &mut self,
        kind: ThingKind,
        location: Option<Location>,
        exclude_duplicate_kind: bool,
        out: &mut Vec<Event>,
    ) -> Option<ThingId> {
        self.place(Body::for_kind(kind), location, exclude_duplicate_kind, out)
    }

    /// Adds an actor facing `heading`, using the same rules as [`Self::add_thing`].
    pub fn add_actor(
        &mut self,
        location: Option<Location>,
        heading: Direction,
        out: &mut Vec<Event>,
    ) -> Option<ThingId> {
        self.place(Body::Actor(Actor::new(heading)), location, false, out)
    }

    /// Samples a uniformly random usable location.
    ///
    /// When `exclude` is provided the draw repeats until it differs. Returns
    /// `None` when no eligible cell exists.
    pub fn random_location_inbounds(&mut self, exclude: Option<Location>) -> Option<Location> {
        if self.bounds.is_empty() {
            return None;
        }
        if let Some(excluded) = exclude {
            if self.bounds.cells().all(|cell| cell == excluded) {
                return None;
            }
        }

        loop {
            let candidate = Location::new(
                self.rng
                    .gen_range(self.bounds.x_start()..=self.bounds.x_end()),
                self.rng
                    .gen_range(self.bounds.y_start()..=self.bounds.y_end()),
            );
            if Some(candidate) != exclude {
                return Some(candidate);
            }
        }
    }

    /// Chooses a usable location that holds no wall.
    ///
    /// Random draws are attempted first; after a bounded number of misses the
    /// first wall-free cell in row-major order is used instead.
    pub fn default_location(&mut self) -> Option<Location> {
        for _ in 0..DEFAULT_LOCATION_ATTEMPTS {
            let candidate = self.random_location_inbounds(None)?;
            if !self.things.has_obstacle_at(candidate) {
                return Some(candidate);
            }
        }

        self.bounds
            .cells()
            .find(|cell| !self.things.has_obstacle_at(*cell))
    }

    /// Lists every thing within `radius` of `location` with its proximity score.
    ///
    /// The radius defaults to one cell. Scores are `radius² - distance²`, so
    /// nearer things rank higher.
    #[must_use]
    pub fn things_near(&self, location: Location, radius: Option<i64>) -> Vec<NearbyThing> {
        let radius = radius.unwrap_or(DEFAULT_PERCEPTIBLE_DISTANCE);
        let radius_squared = radius.saturating_mul(radius);
        self.things
            .iter()
            .filter_map(|thing| {
                let distance_squared = location.distance_squared(thing.location);
                (distance_squared <= radius_squared).then(|| NearbyThing {
                    thing: thing.id,
                    kind: thing.kind(),
                    score: radius_squared - distance_squared,
                })
            })
            .collect()
    }

    /// Moves `thing` to `destination`, returning `true` when the move bumped.
    ///
    /// A destination holding a wall, or lying outside the usable rectangle,
    /// blocks the move and leaves the world untouched. A successful move
    /// relocates everything the mover carries to the same destination; carried
    /// things are not validated on their own. Unknown things never move and
    /// report a bump.
    pub fn move_to(&mut self, thing: ThingId, destination: Location, out: &mut Vec<Event>) -> bool {
        let blocked = !self.is_inbounds(destination) || self.things.has_obstacle_at(destination);
        let Some(entry) = self.things.get_mut(thing) else {
            trace!("move of unknown thing {thing} ignored");
            return true;
        };

        if let Some(actor) = entry.actor_mut() {
            actor.bump = blocked;
        }
        if blocked {
            return true;
        }

        let from = entry.location;
        entry.location = destination;
        if let Some(actor) = entry.actor_mut() {
            for held in &mut actor.holding {
                held.location = destination;
            }
        }

        let snapshot = entry.snapshot();
        out.push(Event::ThingMoved {
            thing,
            kind: snapshot.kind,
            from,
            to: destination,
        });
        for observer in &mut self.observers {
            observer.thing_moved(&snapshot);
        }
        false
    }

    /// Removes `thing` from the world, returning whether it was present.
    ///
    /// An actor's carried things are discarded with it rather than released.
    pub fn delete_thing(&mut self, thing: ThingId, out: &mut Vec<Event>) -> bool {
        let Some(removed) = self.things.remove(thing) else {
            return false;
        };

        let snapshot = removed.snapshot();
        if let Some(actor) = removed.actor() {
            if !actor.holding.is_empty() {
                trace!(
                    "discarding {} carried things with actor {thing}",
                    actor.holding.len()
                );
            }
        }
        out.push(Event::ThingDeleted {
            thing,
            kind: snapshot.kind,
            location: snapshot.location,
        });
        for observer in &mut self.observers {
            observer.thing_deleted(&snapshot);
        }
        true
    }

    /// Performs `action` on behalf of `actor`, updating its performance.
    ///
    /// Every action other than `NoOp` and `Suck` costs one point; sucking up
    /// dirt earns ten. Actions without an eligible target leave the world
    /// untouched and emit an [`Event::ActionIgnored`] diagnostic.
    pub fn execute_action(&mut self, actor: ThingId, action: Action, out: &mut Vec<Event>) {
        let Some(entry) = self.things.get_mut(actor) else {
            ignore(actor, action, IgnoreReason::UnknownActor, out);
            return;
        };
        let location = entry.location;
        let Some(state) = entry.actor_mut() else {
            ignore(actor, action, IgnoreReason::UnknownActor, out);
            return;
        };
        state.bump = false;
        let heading = state.heading;

        let executed = Event::ActionExecuted {
            actor,
            action,
            location,
            heading,
        };
        debug!("{executed}");
        out.push(executed);

        match action {
            Action::TurnRight => self.set_heading(actor, heading.turn_right()),
            Action::TurnLeft => self.set_heading(actor, heading.turn_left()),
            Action::Forward => self.step_forward(actor, heading, location, out),
            Action::Left => self.step_forward(actor, Direction::Left, location, out),
            Action::Right => self.step_forward(actor, Direction::Right, location, out),
            Action::Up => self.step_forward(actor, Direction::Up, location, out),
            Action::Down => self.step_forward(actor, Direction::Down, location, out),
            Action::Grab => self.grab(actor, location, out),
            Action::Release => self.release(actor, location, out),
            Action::Suck => self.suck(actor, location, out),
            Action::NoOp => {}
        }

        if action.is_penalized() {
            self.adjust_performance(actor, -STEP_PENALTY);
        }
    }

    fn place(
        &mut self,
        body: Body,
        location: Option<Location>,
        exclude_duplicate_kind: bool,
        out: &mut Vec<Event>,
    ) -> Option<ThingId> {
        let kind = body.kind();
        let target = match location {
            None => match self.default_location() {
                Some(target) => target,
                None => {
                    reject(kind, None, PlacementError::NoFreeLocation, out);
                    return None;
                }
            },
            Some(target) if !self.is_inbounds(target) => {
                reject(kind, Some(target), PlacementError::OutOfBounds, out);
                return None;
            }
            Some(target) if exclude_duplicate_kind && self.things.has_kind_at(target, kind) => {
                reject(kind, Some(target), PlacementError::DuplicateKind, out);
                return None;
            }
            Some(target) => target,
        };

        let thing = self.things.spawn(body, target);
        out.push(Event::ThingAdded {
            thing,
            kind,
            location: target,
        });
        Some(thing)
    }

    fn set_heading(&mut self, actor: ThingId, heading: Direction) {
        if let Some(state) = self.things.get_mut(actor).and_then(Thing::actor_mut) {
            state.heading = heading;
        }
    }

    fn step_forward(
        &mut self,
        actor: ThingId,
        heading: Direction,
        location: Location,
        out: &mut Vec<Event>,
    ) {
        self.set_heading(actor, heading);
        let destination = heading.move_forward(location);
        if self.move_to(actor, destination, out) {
            out.push(Event::ActorBumped { actor, destination });
        }
    }

    fn grab(&mut self, actor: ThingId, location: Location, out: &mut Vec<Event>) {
        let target = self
            .things
            .at(location)
            .find(|thing| thing.id != actor && thing.kind().is_graspable())
            .map(|thing| thing.id);
        let Some(grabbed) = target.and_then(|id| self.things.remove(id)) else {
            ignore(actor, Action::Grab, IgnoreReason::NothingToGrab, out);
            return;
        };

        let snapshot = grabbed.snapshot();
        if let Some(state) = self.things.get_mut(actor).and_then(Thing::actor_mut) {
            state.holding.push(grabbed);
        }
        out.push(Event::ThingGrabbed {
            actor,
            thing: snapshot.id,
            kind: snapshot.kind,
        });
        for observer in &mut self.observers {
            observer.thing_deleted(&snapshot);
        }
    }

    fn release(&mut self, actor: ThingId, location: Location, out: &mut Vec<Event>) {
        let dropped = self
            .things
            .get_mut(actor)
            .and_then(Thing::actor_mut)
            .and_then(|state| state.holding.pop());
        let Some(mut dropped) = dropped else {
            ignore(actor, Action::Release, IgnoreReason::NothingHeld, out);
            return;
        };

        let kind = dropped.kind();
        if !self.is_inbounds(location) {
            reject(kind, Some(location), PlacementError::OutOfBounds, out);
            return;
        }

        dropped.location = location;
        let thing = dropped.id;
        self.things.restore(dropped);
        out.push(Event::ThingReleased {
            actor,
            thing,
            kind,
            location,
        });
    }

    fn suck(&mut self, actor: ThingId, location: Location, out: &mut Vec<Event>) {
        let dirt = self
            .things
            .at(location)
            .find(|thing| thing.kind() == ThingKind::Dirt)
            .map(|thing| thing.id);
        let Some(dirt) = dirt else {
            ignore(actor, Action::Suck, IgnoreReason::NothingToSuck, out);
            return;
        };

        out.push(Event::DirtSucked {
            actor,
            dirt,
            location,
        });
        let _ = self.delete_thing(dirt, out);
        self.adjust_performance(actor, SUCK_REWARD);
    }

    fn adjust_performance(&mut self, actor: ThingId, delta: i64) {
        if let Some(state) = self.things.get_mut(actor).and_then(Thing::actor_mut) {
            state.performance = state.performance.saturating_add(delta);
        }
    }
}

impl<P: Phase> fmt::Debug for GridWorld<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridWorld")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bounds", &self.bounds)
            .field("things", &self.things)
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use cleanroom_core::{Direction, Location, ThingId, ThingKind, ThingSnapshot};

    use super::{GridWorld, Phase};

    /// Immutable representation of a single actor's state used for queries.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct ActorSnapshot {
        /// Identifier allocated to the actor.
        pub id: ThingId,
        /// Cell the actor occupies.
        pub location: Location,
        /// Current heading of the actor.
        pub heading: Direction,
        /// Whether the actor's last move attempt was blocked.
        pub bump: bool,
        /// Accumulated performance score.
        pub performance: i64,
        /// Carried things, most recently grabbed last.
        pub holding: Vec<ThingSnapshot>,
    }

    /// Captures a snapshot of the placed thing with the provided identifier.
    #[must_use]
    pub fn thing<P: Phase>(world: &GridWorld<P>, id: ThingId) -> Option<ThingSnapshot> {
        world.things.get(id).map(|thing| thing.snapshot())
    }

    /// Captures a snapshot of the live actor with the provided identifier.
    #[must_use]
    pub fn actor<P: Phase>(world: &GridWorld<P>, id: ThingId) -> Option<ActorSnapshot> {
        let thing = world.things.get(id)?;
        let actor = thing.actor()?;
        Some(ActorSnapshot {
            id,
            location: thing.location,
            heading: actor.heading,
            bump: actor.bump,
            performance: actor.performance,
            holding: actor.holding.iter().map(|held| held.snapshot()).collect(),
        })
    }

    /// Identifiers of every live actor in ascending order.
    #[must_use]
    pub fn actors<P: Phase>(world: &GridWorld<P>) -> Vec<ThingId> {
        world
            .things
            .iter()
            .filter(|thing| thing.kind() == ThingKind::Actor)
            .map(|thing| thing.id)
            .collect()
    }

    /// Snapshots of every placed thing in identifier order.
    #[must_use]
    pub fn things<P: Phase>(world: &GridWorld<P>) -> Vec<ThingSnapshot> {
        world.things.iter().map(|thing| thing.snapshot()).collect()
    }

    /// Snapshots of the things occupying `location` in identifier order.
    #[must_use]
    pub fn things_at<P: Phase>(world: &GridWorld<P>, location: Location) -> Vec<ThingSnapshot> {
        world
            .things
            .at(location)
            .map(|thing| thing.snapshot())
            .collect()
    }

    /// Reports whether a thing of `kind` occupies `location`.
    #[must_use]
    pub fn has_kind_at<P: Phase>(world: &GridWorld<P>, location: Location, kind: ThingKind) -> bool {
        world.things.has_kind_at(location, kind)
    }

    /// Counts the placed things of `kind`.
    #[must_use]
    pub fn count_of<P: Phase>(world: &GridWorld<P>, kind: ThingKind) -> usize {
        world
            .things
            .iter()
            .filter(|thing| thing.kind() == kind)
            .count()
    }
}

fn reject(kind: ThingKind, location: Option<Location>, reason: PlacementError, out: &mut Vec<Event>) {
    let event = Event::PlacementRejected {
        kind,
        location,
        reason,
    };
    trace!("{event}");
    out.push(event);
}

fn ignore(actor: ThingId, action: Action, reason: IgnoreReason, out: &mut Vec<Event>) {
    let event = Event::ActionIgnored {
        actor,
        action,
        reason,
    };
    trace!("{event}");
    out.push(event);
}

fn perimeter(bounds: Bounds) -> Vec<Location> {
    bounds
        .cells()
        .filter(|cell| {
            cell.x() == bounds.x_start()
                || cell.x() == bounds.x_end()
                || cell.y() == bounds.y_start()
                || cell.y() == bounds.y_end()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        moved: Vec<ThingSnapshot>,
        deleted: Vec<ThingSnapshot>,
    }

    impl Observer for Recorder {
        fn thing_moved(&mut self, thing: &ThingSnapshot) {
            self.moved.push(*thing);
        }

        fn thing_deleted(&mut self, thing: &ThingSnapshot) {
            self.deleted.push(*thing);
        }
    }

    fn walled(width: u32, height: u32) -> (GridWorld<Walled>, Vec<Event>) {
        let mut events = Vec::new();
        let world = GridWorld::new(width, height).add_walls(&mut events);
        (world, events)
    }

    #[test]
    fn out_of_bounds_placement_is_dropped() {
        let mut world = GridWorld::new(3, 3);
        let mut events = Vec::new();

        let placed = world.add_thing(ThingKind::Dirt, Some(Location::new(3, 0)), false, &mut events);

        assert!(placed.is_none());
        assert!(query::things(&world).is_empty());
        assert_eq!(
            events,
            vec![Event::PlacementRejected {
                kind: ThingKind::Dirt,
                location: Some(Location::new(3, 0)),
                reason: PlacementError::OutOfBounds,
            }]
        );
    }

    #[test]
    fn duplicate_kind_exclusion_only_applies_when_requested() {
        let mut world = GridWorld::new(3, 3);
        let mut events = Vec::new();
        let cell = Location::new(1, 1);

        assert!(world.add_thing(ThingKind::Dirt, Some(cell), true, &mut events).is_some());
        assert!(world.add_thing(ThingKind::Dirt, Some(cell), true, &mut events).is_none());
        assert!(world.add_thing(ThingKind::Dirt, Some(cell), false, &mut events).is_some());
        assert!(world.add_thing(ThingKind::Actor, Some(cell), true, &mut events).is_some());

        assert_eq!(query::count_of(&world, ThingKind::Dirt), 2);
    }

    #[test]
    fn walls_cover_the_perimeter_exactly_once() {
        let (world, events) = walled(5, 4);

        assert_eq!(query::count_of(&world, ThingKind::Wall), 14);
        assert!(events.contains(&Event::WallsRaised {
            bounds: Bounds::new(1, 3, 1, 2),
        }));
        for x in 0..5 {
            assert!(query::has_kind_at(&world, Location::new(x, 0), ThingKind::Wall));
            assert!(query::has_kind_at(&world, Location::new(x, 3), ThingKind::Wall));
        }
    }

    #[test]
    fn default_location_avoids_walls() {
        let (mut world, _) = walled(4, 4);
        for _ in 0..32 {
            let location = world.default_location().expect("interior is free");
            assert!(world.is_inbounds(location));
            assert!(!query::has_kind_at(&world, location, ThingKind::Wall));
        }
    }

    #[test]
    fn default_location_reports_fully_walled_grids() {
        let (mut world, _) = walled(2, 2);
        let mut events = Vec::new();
        assert!(world.default_location().is_none());
        assert!(world.add_thing(ThingKind::Dirt, None, false, &mut events).is_none());
        assert!(matches!(
            events.as_slice(),
            [Event::PlacementRejected {
                reason: PlacementError::NoFreeLocation,
                ..
            }]
        ));
    }

    #[test]
    fn random_location_honours_exclusion() {
        let mut world = GridWorld::new(2, 1);
        let excluded = Location::new(0, 0);
        for _ in 0..16 {
            assert_eq!(world.random_location_inbounds(Some(excluded)), Some(Location::new(1, 0)));
        }

        let mut single = GridWorld::new(1, 1);
        assert_eq!(single.random_location_inbounds(Some(excluded)), None);
    }

    #[test]
    fn things_near_scores_nearer_things_higher() {
        let mut world = GridWorld::new(5, 5);
        let mut events = Vec::new();
        let centre = Location::new(2, 2);
        let here = world.add_thing(ThingKind::Dirt, Some(centre), false, &mut events).unwrap();
        let beside = world
            .add_thing(ThingKind::Dirt, Some(Location::new(3, 2)), false, &mut events)
            .unwrap();
        let _diagonal = world
            .add_thing(ThingKind::Dirt, Some(Location::new(3, 3)), false, &mut events)
            .unwrap();

        let near = world.things_near(centre, None);
        assert_eq!(
            near,
            vec![
                NearbyThing {
                    thing: here,
                    kind: ThingKind::Dirt,
                    score: 1,
                },
                NearbyThing {
                    thing: beside,
                    kind: ThingKind::Dirt,
                    score: 0,
                },
            ]
        );
        assert_eq!(world.things_near(centre, Some(2)).len(), 3);
    }

    #[test]
    fn move_onto_wall_bumps_without_moving() {
        let (mut world, _) = walled(4, 4);
        let mut events = Vec::new();
        let start = Location::new(1, 1);
        let actor = world.add_actor(Some(start), Direction::Left, &mut events).unwrap();
        events.clear();

        let bumped = world.move_to(actor, Location::new(0, 1), &mut events);

        assert!(bumped);
        let snapshot = query::actor(&world, actor).unwrap();
        assert_eq!(snapshot.location, start);
        assert!(snapshot.bump);
        assert!(events.is_empty());
    }

    #[test]
    fn observers_hear_moves_and_deletions_in_registration_order() {
        let mut world = GridWorld::new(3, 3);
        let first = Rc::new(RefCell::new(Recorder::default()));
        let second = Rc::new(RefCell::new(Recorder::default()));
        world.add_observer(Box::new(Rc::clone(&first)));
        world.add_observer(Box::new(Rc::clone(&second)));
        let mut events = Vec::new();
        let dirt = world
            .add_thing(ThingKind::Dirt, Some(Location::new(0, 0)), false, &mut events)
            .unwrap();

        assert!(!world.move_to(dirt, Location::new(1, 0), &mut events));
        assert!(world.delete_thing(dirt, &mut events));
        assert!(!world.delete_thing(dirt, &mut events));

        for recorder in [&first, &second] {
            let recorder = recorder.borrow();
            assert_eq!(recorder.moved.len(), 1);
            assert_eq!(recorder.moved[0].location, Location::new(1, 0));
            assert_eq!(recorder.deleted.len(), 1);
            assert_eq!(recorder.deleted[0].id, dirt);
        }
    }

    #[test]
    fn turns_rotate_heading_and_cost_a_point() {
        let (mut world, _) = walled(4, 4);
        let mut events = Vec::new();
        let actor = world
            .add_actor(Some(Location::new(1, 1)), Direction::Up, &mut events)
            .unwrap();

        world.execute_action(actor, Action::TurnRight, &mut events);
        assert_eq!(query::actor(&world, actor).unwrap().heading, Direction::Right);
        world.execute_action(actor, Action::TurnLeft, &mut events);
        world.execute_action(actor, Action::TurnLeft, &mut events);

        let snapshot = query::actor(&world, actor).unwrap();
        assert_eq!(snapshot.heading, Direction::Left);
        assert_eq!(snapshot.performance, -3);
    }

    #[test]
    fn named_moves_snap_heading_before_stepping() {
        let (mut world, _) = walled(5, 5);
        let mut events = Vec::new();
        let actor = world
            .add_actor(Some(Location::new(2, 2)), Direction::Up, &mut events)
            .unwrap();

        world.execute_action(actor, Action::Right, &mut events);
        let snapshot = query::actor(&world, actor).unwrap();
        assert_eq!(snapshot.heading, Direction::Right);
        assert_eq!(snapshot.location, Location::new(3, 2));

        world.execute_action(actor, Action::Forward, &mut events);
        let snapshot = query::actor(&world, actor).unwrap();
        assert_eq!(snapshot.location, Location::new(3, 2));
        assert!(snapshot.bump);

        world.execute_action(actor, Action::NoOp, &mut events);
        let snapshot = query::actor(&world, actor).unwrap();
        assert!(!snapshot.bump);
        assert_eq!(snapshot.performance, -2);
    }

    #[test]
    fn suck_rewards_ten_without_the_step_penalty() {
        let (mut world, _) = walled(4, 4);
        let mut events = Vec::new();
        let cell = Location::new(1, 2);
        let actor = world.add_actor(Some(cell), Direction::Up, &mut events).unwrap();
        let dirt = world.add_thing(ThingKind::Dirt, Some(cell), false, &mut events).unwrap();
        events.clear();

        world.execute_action(actor, Action::Suck, &mut events);
        assert_eq!(query::actor(&world, actor).unwrap().performance, 10);
        assert!(query::thing(&world, dirt).is_none());
        assert!(events.contains(&Event::DirtSucked {
            actor,
            dirt,
            location: cell,
        }));

        world.execute_action(actor, Action::Suck, &mut events);
        assert_eq!(query::actor(&world, actor).unwrap().performance, 10);
        assert!(events.contains(&Event::ActionIgnored {
            actor,
            action: Action::Suck,
            reason: IgnoreReason::NothingToSuck,
        }));
    }

    #[test]
    fn grab_and_release_transfer_ownership() {
        let (mut world, _) = walled(5, 5);
        let mut events = Vec::new();
        let start = Location::new(2, 2);
        let actor = world.add_actor(Some(start), Direction::Up, &mut events).unwrap();
        let dirt = world.add_thing(ThingKind::Dirt, Some(start), false, &mut events).unwrap();

        world.execute_action(actor, Action::Grab, &mut events);
        assert!(query::thing(&world, dirt).is_none());
        assert_eq!(query::actor(&world, actor).unwrap().holding.len(), 1);

        world.execute_action(actor, Action::Up, &mut events);
        world.execute_action(actor, Action::Release, &mut events);

        let released = query::thing(&world, dirt).unwrap();
        assert_eq!(released.location, Location::new(2, 3));
        let snapshot = query::actor(&world, actor).unwrap();
        assert!(snapshot.holding.is_empty());
        assert_eq!(snapshot.performance, -3);

        world.execute_action(actor, Action::Release, &mut events);
        assert_eq!(
            events.last(),
            Some(&Event::ActionIgnored {
                actor,
                action: Action::Release,
                reason: IgnoreReason::NothingHeld,
            })
        );
    }

    #[test]
    fn unknown_actor_actions_are_ignored() {
        let (mut world, _) = walled(4, 4);
        let mut events = Vec::new();
        let wall = query::things(&world)[0].id;

        world.execute_action(wall, Action::Up, &mut events);
        world.execute_action(ThingId::new(999), Action::NoOp, &mut events);

        assert!(events.iter().all(|event| matches!(
            event,
            Event::ActionIgnored {
                reason: IgnoreReason::UnknownActor,
                ..
            }
        )));
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn deleting_an_actor_discards_what_it_carries() {
        let (mut world, _) = walled(4, 4);
        let mut events = Vec::new();
        let cell = Location::new(1, 1);
        let actor = world.add_actor(Some(cell), Direction::Up, &mut events).unwrap();
        let _dirt = world.add_thing(ThingKind::Dirt, Some(cell), false, &mut events).unwrap();
        world.execute_action(actor, Action::Grab, &mut events);

        assert!(world.delete_thing(actor, &mut events));

        assert_eq!(query::count_of(&world, ThingKind::Dirt), 0);
        assert!(query::actors(&world).is_empty());
    }
}
