#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Cleanroom engine.
//!
//! This crate defines the value types that connect the grid world, the agent
//! programs that drive its actors and the search formulation of the cleaning
//! task. The world consumes [`Action`] values chosen by programs, mutates its
//! registry and reports every change as an [`Event`]. Percepts handed to
//! programs are expressed with [`NearbyThing`] records or a [`VacuumPercept`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the command-line adapter boots.
pub const WELCOME_BANNER: &str = "Welcome to Cleanroom.";

/// Position of a single grid cell expressed as `x` and `y` coordinates.
///
/// Coordinates are signed so that displacement never needs a bounds check;
/// whether a location is usable is decided by the world's [`Bounds`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    x: i32,
    y: i32,
}

impl Location {
    /// Creates a new location from its coordinates.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate, growing to the right.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical coordinate, growing upwards.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the location displaced by the provided deltas.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// Squared Euclidean distance between two locations.
    #[must_use]
    pub fn distance_squared(self, other: Location) -> i64 {
        let dx = i64::from(self.x) - i64::from(other.x);
        let dy = i64::from(self.y) - i64::from(other.y);
        dx * dx + dy * dy
    }

    /// Euclidean distance between two locations.
    #[must_use]
    pub fn distance(self, other: Location) -> f64 {
        (self.distance_squared(other) as f64).sqrt()
    }

    /// Computes the Manhattan distance between two locations.
    #[must_use]
    pub fn manhattan_distance(self, other: Location) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Cardinal heading of an actor.
///
/// The four headings form a cyclic group under quarter turns: rotating four
/// times in the same sense always yields the starting heading.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Heading toward increasing `y`.
    Up,
    /// Heading toward increasing `x`.
    Right,
    /// Heading toward decreasing `y`.
    Down,
    /// Heading toward decreasing `x`.
    Left,
}

impl Direction {
    /// Every heading in clockwise order starting from [`Direction::Up`].
    pub const CLOCKWISE: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Rotates by the provided number of quarter turns.
    ///
    /// Positive values turn clockwise, negative values counter-clockwise.
    #[must_use]
    pub fn rotate(self, turns: i32) -> Self {
        let current = self.clockwise_index();
        let next = (current + turns.rem_euclid(4)) % 4;
        Self::CLOCKWISE[next as usize]
    }

    /// Heading after a single clockwise quarter turn.
    #[must_use]
    pub fn turn_right(self) -> Self {
        self.rotate(1)
    }

    /// Heading after a single counter-clockwise quarter turn.
    #[must_use]
    pub fn turn_left(self) -> Self {
        self.rotate(-1)
    }

    /// Heading pointing the opposite way.
    #[must_use]
    pub fn opposite(self) -> Self {
        self.rotate(2)
    }

    /// Unit displacement vector associated with the heading.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, 1),
            Self::Right => (1, 0),
            Self::Down => (0, -1),
            Self::Left => (-1, 0),
        }
    }

    /// Returns `location` displaced one cell along the heading.
    #[must_use]
    pub const fn move_forward(self, location: Location) -> Location {
        let (dx, dy) = self.delta();
        location.offset(dx, dy)
    }

    /// Lower-case name used in narration.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Right => "right",
            Self::Down => "down",
            Self::Left => "left",
        }
    }

    const fn clockwise_index(self) -> i32 {
        match self {
            Self::Up => 0,
            Self::Right => 1,
            Self::Down => 2,
            Self::Left => 3,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Actions an actor may ask the world to perform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    /// Rotate the heading a quarter turn clockwise.
    TurnRight,
    /// Rotate the heading a quarter turn counter-clockwise.
    TurnLeft,
    /// Step one cell along the current heading.
    Forward,
    /// Face left and step one cell.
    Left,
    /// Face right and step one cell.
    Right,
    /// Face up and step one cell.
    Up,
    /// Face down and step one cell.
    Down,
    /// Pick up the first graspable thing at the actor's location.
    Grab,
    /// Put down the most recently grabbed thing.
    Release,
    /// Remove one dirt at the actor's location.
    Suck,
    /// Do nothing.
    NoOp,
}

impl Action {
    /// The complete action vocabulary.
    pub const ALL: [Action; 11] = [
        Action::TurnRight,
        Action::TurnLeft,
        Action::Forward,
        Action::Left,
        Action::Right,
        Action::Up,
        Action::Down,
        Action::Grab,
        Action::Release,
        Action::Suck,
        Action::NoOp,
    ];

    /// Heading that the action snaps to before moving, if it names one.
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::Left => Some(Direction::Left),
            Self::Right => Some(Direction::Right),
            Self::Up => Some(Direction::Up),
            Self::Down => Some(Direction::Down),
            _ => None,
        }
    }

    /// Reports whether performing the action costs one performance point.
    ///
    /// `NoOp` is free and `Suck` is rewarded separately.
    #[must_use]
    pub const fn is_penalized(self) -> bool {
        !matches!(self, Self::NoOp | Self::Suck)
    }

    /// Name of the action as it appears in narration.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::TurnRight => "TurnRight",
            Self::TurnLeft => "TurnLeft",
            Self::Forward => "Forward",
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
            Self::Grab => "Grab",
            Self::Release => "Release",
            Self::Suck => "Suck",
            Self::NoOp => "NoOp",
        }
    }
}

impl From<Direction> for Action {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => Self::Up,
            Direction::Right => Self::Right,
            Direction::Down => Self::Down,
            Direction::Left => Self::Left,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Variants of things that may be placed in the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ThingKind {
    /// Impassable obstacle.
    Wall,
    /// Dirt that actors may suck up or carry.
    Dirt,
    /// Situated actor that perceives and acts.
    Actor,
}

impl ThingKind {
    /// Reports whether the kind blocks other things from entering its cell.
    #[must_use]
    pub const fn is_obstacle(self) -> bool {
        matches!(self, Self::Wall)
    }

    /// Reports whether actors are able to pick the kind up.
    #[must_use]
    pub const fn is_graspable(self) -> bool {
        matches!(self, Self::Dirt)
    }

    /// Capitalised name used in narration.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Wall => "Wall",
            Self::Dirt => "Dirt",
            Self::Actor => "Actor",
        }
    }
}

impl fmt::Display for ThingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unique identifier assigned to a thing by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ThingId(u32);

impl ThingId {
    /// Creates a new thing identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ThingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Immutable representation of a placed thing handed to observers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThingSnapshot {
    /// Identifier allocated to the thing by the world.
    pub id: ThingId,
    /// Variant of the thing.
    pub kind: ThingKind,
    /// Cell the thing occupies.
    pub location: Location,
}

/// Inclusive axis-aligned rectangle of usable cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bounds {
    x_start: i32,
    x_end: i32,
    y_start: i32,
    y_end: i32,
}

impl Bounds {
    /// Creates a rectangle from its inclusive corner coordinates.
    #[must_use]
    pub const fn new(x_start: i32, x_end: i32, y_start: i32, y_end: i32) -> Self {
        Self {
            x_start,
            x_end,
            y_start,
            y_end,
        }
    }

    /// Rectangle covering every cell of a `width` by `height` grid.
    #[must_use]
    pub fn of_grid(width: u32, height: u32) -> Self {
        let x_end = i32::try_from(width).unwrap_or(i32::MAX).saturating_sub(1);
        let y_end = i32::try_from(height).unwrap_or(i32::MAX).saturating_sub(1);
        Self::new(0, x_end, 0, y_end)
    }

    /// Rectangle shrunk inward by `cells` on every side.
    #[must_use]
    pub const fn inset(self, cells: i32) -> Self {
        Self {
            x_start: self.x_start.saturating_add(cells),
            x_end: self.x_end.saturating_sub(cells),
            y_start: self.y_start.saturating_add(cells),
            y_end: self.y_end.saturating_sub(cells),
        }
    }

    /// Smallest usable `x` coordinate.
    #[must_use]
    pub const fn x_start(&self) -> i32 {
        self.x_start
    }

    /// Largest usable `x` coordinate.
    #[must_use]
    pub const fn x_end(&self) -> i32 {
        self.x_end
    }

    /// Smallest usable `y` coordinate.
    #[must_use]
    pub const fn y_start(&self) -> i32 {
        self.y_start
    }

    /// Largest usable `y` coordinate.
    #[must_use]
    pub const fn y_end(&self) -> i32 {
        self.y_end
    }

    /// Reports whether the rectangle contains no cells.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.x_start > self.x_end || self.y_start > self.y_end
    }

    /// Reports whether `location` lies within the rectangle, edges included.
    #[must_use]
    pub const fn contains(&self, location: Location) -> bool {
        location.x >= self.x_start
            && location.x <= self.x_end
            && location.y >= self.y_start
            && location.y <= self.y_end
    }

    /// Iterates the rectangle's cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Location> {
        let (x_start, x_end) = (self.x_start, self.x_end);
        (self.y_start..=self.y_end)
            .flat_map(move |y| (x_start..=x_end).map(move |x| Location::new(x, y)))
    }
}

/// Single entry of a proximity percept.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NearbyThing {
    /// Identifier of the perceived thing.
    pub thing: ThingId,
    /// Variant of the perceived thing.
    pub kind: ThingKind,
    /// Proximity score: `radius² - distance²`, higher for nearer things.
    pub score: i64,
}

/// Cleanliness of the cell an actor occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DirtStatus {
    /// No dirt in the cell.
    Clean,
    /// At least one dirt in the cell.
    Dirty,
}

/// Outcome of the actor's previous move attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BumpStatus {
    /// The previous action did not run into an obstacle.
    Clear,
    /// The previous move attempt was blocked.
    Bump,
}

/// Percept of the cleaning world: local dirt and bump, never the location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VacuumPercept {
    /// Whether the actor's own cell holds dirt.
    pub status: DirtStatus,
    /// Whether the actor's last move attempt was blocked.
    pub bump: BumpStatus,
}

impl fmt::Display for VacuumPercept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self.status {
            DirtStatus::Clean => "Clean",
            DirtStatus::Dirty => "Dirty",
        };
        let bump = match self.bump {
            BumpStatus::Clear => "None",
            BumpStatus::Bump => "Bump",
        };
        write!(f, "({status}, {bump})")
    }
}

/// Reasons a placement request may be dropped by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested location lies outside the usable rectangle.
    OutOfBounds,
    /// A thing of the same kind already occupies the location.
    DuplicateKind,
    /// The world has no usable cell free of walls.
    NoFreeLocation,
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds => f.write_str("location is out of bounds"),
            Self::DuplicateKind => f.write_str("a thing of the same kind is already there"),
            Self::NoFreeLocation => f.write_str("no wall-free location is available"),
        }
    }
}

/// Reasons an action may be performed without any effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IgnoreReason {
    /// The acting thing is not a live actor in the world.
    UnknownActor,
    /// No graspable thing lies at the actor's location.
    NothingToGrab,
    /// The actor holds nothing to release.
    NothingHeld,
    /// The actor's location holds no dirt.
    NothingToSuck,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownActor => f.write_str("actor is not in the world"),
            Self::NothingToGrab => f.write_str("nothing to grab"),
            Self::NothingHeld => f.write_str("nothing held"),
            Self::NothingToSuck => f.write_str("nothing to suck"),
        }
    }
}

/// Events broadcast by the world while it mutates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// A thing entered the registry.
    ThingAdded {
        /// Identifier assigned to the thing.
        thing: ThingId,
        /// Variant of the thing.
        kind: ThingKind,
        /// Cell the thing was placed in.
        location: Location,
    },
    /// A thing moved between two cells.
    ThingMoved {
        /// Identifier of the moved thing.
        thing: ThingId,
        /// Variant of the moved thing.
        kind: ThingKind,
        /// Cell the thing occupied before moving.
        from: Location,
        /// Cell the thing occupies after moving.
        to: Location,
    },
    /// A thing left the registry.
    ThingDeleted {
        /// Identifier of the removed thing.
        thing: ThingId,
        /// Variant of the removed thing.
        kind: ThingKind,
        /// Last cell the thing occupied.
        location: Location,
    },
    /// An actor dispatched an action.
    ActionExecuted {
        /// Identifier of the acting actor.
        actor: ThingId,
        /// Action that was dispatched.
        action: Action,
        /// Cell the actor occupied when acting.
        location: Location,
        /// Heading of the actor when acting.
        heading: Direction,
    },
    /// An actor's move was blocked.
    ActorBumped {
        /// Identifier of the blocked actor.
        actor: ThingId,
        /// Cell the actor attempted to enter.
        destination: Location,
    },
    /// An actor picked a thing up.
    ThingGrabbed {
        /// Identifier of the grabbing actor.
        actor: ThingId,
        /// Identifier of the grabbed thing.
        thing: ThingId,
        /// Variant of the grabbed thing.
        kind: ThingKind,
    },
    /// An actor put a thing back into the world.
    ThingReleased {
        /// Identifier of the releasing actor.
        actor: ThingId,
        /// Identifier of the released thing.
        thing: ThingId,
        /// Variant of the released thing.
        kind: ThingKind,
        /// Cell the thing was released into.
        location: Location,
    },
    /// An actor cleaned a cell.
    DirtSucked {
        /// Identifier of the cleaning actor.
        actor: ThingId,
        /// Identifier of the removed dirt.
        dirt: ThingId,
        /// Cell that was cleaned.
        location: Location,
    },
    /// Walls were raised around the grid perimeter.
    WallsRaised {
        /// Usable rectangle after the walls were raised.
        bounds: Bounds,
    },
    /// A placement request was dropped.
    PlacementRejected {
        /// Variant of the thing that was not placed.
        kind: ThingKind,
        /// Requested cell, when the caller provided one.
        location: Option<Location>,
        /// Specific reason the placement was dropped.
        reason: PlacementError,
    },
    /// An action had nothing to act upon.
    ActionIgnored {
        /// Identifier of the acting thing.
        actor: ThingId,
        /// Action that had no effect.
        action: Action,
        /// Specific reason the action was ignored.
        reason: IgnoreReason,
    },
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ThingAdded {
                thing,
                kind,
                location,
            } => write!(f, "{kind}{thing} added at location: {location}"),
            Self::ThingMoved {
                thing,
                kind,
                from,
                to,
            } => write!(f, "{kind}{thing} moved from {from} to {to}"),
            Self::ThingDeleted {
                thing,
                kind,
                location,
            } => write!(f, "{kind}{thing} removed from location: {location}"),
            Self::ActionExecuted {
                actor,
                action: Action::Forward,
                location,
                heading,
            } => write!(
                f,
                "Actor{actor} decided to move {heading}wards at location: {location}"
            ),
            Self::ActionExecuted {
                actor,
                action,
                location,
                ..
            } => write!(f, "Actor{actor} decided to {action} at location: {location}"),
            Self::ActorBumped { actor, destination } => {
                write!(f, "Actor{actor} bumped into an obstacle at {destination}")
            }
            Self::ThingGrabbed { actor, thing, kind } => {
                write!(f, "Actor{actor} grabbing {kind}{thing}")
            }
            Self::ThingReleased {
                actor,
                thing,
                kind,
                location,
            } => write!(f, "Actor{actor} dropping {kind}{thing} at location: {location}"),
            Self::DirtSucked {
                actor,
                dirt,
                location,
            } => write!(f, "Actor{actor} suck Dirt{dirt} at location: {location}"),
            Self::WallsRaised { bounds } => write!(
                f,
                "walls raised; usable cells span x {}..={} and y {}..={}",
                bounds.x_start(),
                bounds.x_end(),
                bounds.y_start(),
                bounds.y_end()
            ),
            Self::PlacementRejected {
                kind,
                location: Some(location),
                reason,
            } => write!(f, "{kind} not placed at {location}: {reason}"),
            Self::PlacementRejected {
                kind,
                location: None,
                reason,
            } => write!(f, "{kind} not placed: {reason}"),
            Self::ActionIgnored {
                actor,
                action,
                reason,
            } => write!(f, "Actor{actor} {action} had no effect: {reason}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Action, Bounds, Direction, Event, Location, ThingId};
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn four_rotations_return_to_start() {
        for heading in Direction::CLOCKWISE {
            let mut clockwise = heading;
            let mut counter = heading;
            for _ in 0..4 {
                clockwise = clockwise.rotate(1);
                counter = counter.rotate(-1);
            }
            assert_eq!(clockwise, heading);
            assert_eq!(counter, heading);
        }
    }

    #[test]
    fn turning_right_walks_clockwise() {
        assert_eq!(Direction::Up.turn_right(), Direction::Right);
        assert_eq!(Direction::Right.turn_right(), Direction::Down);
        assert_eq!(Direction::Down.turn_right(), Direction::Left);
        assert_eq!(Direction::Left.turn_right(), Direction::Up);
        assert_eq!(Direction::Up.turn_left(), Direction::Left);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
    }

    #[test]
    fn move_forward_follows_unit_vectors() {
        let origin = Location::new(2, 2);
        assert_eq!(Direction::Up.move_forward(origin), Location::new(2, 3));
        assert_eq!(Direction::Down.move_forward(origin), Location::new(2, 1));
        assert_eq!(Direction::Right.move_forward(origin), Location::new(3, 2));
        assert_eq!(Direction::Left.move_forward(origin), Location::new(1, 2));
    }

    #[test]
    fn distances_match_expectation() {
        let origin = Location::new(1, 1);
        let destination = Location::new(4, 5);
        assert_eq!(origin.distance_squared(destination), 25);
        assert!((origin.distance(destination) - 5.0).abs() < f64::EPSILON);
        assert_eq!(origin.manhattan_distance(destination), 7);
    }

    #[test]
    fn only_noop_and_suck_escape_the_step_penalty() {
        let free: Vec<Action> = Action::ALL
            .into_iter()
            .filter(|action| !action.is_penalized())
            .collect();
        assert_eq!(free, vec![Action::Suck, Action::NoOp]);
    }

    #[test]
    fn inset_bounds_exclude_the_perimeter() {
        let outer = Bounds::of_grid(5, 4);
        let inner = outer.inset(1);
        assert!(outer.contains(Location::new(4, 3)));
        assert!(!inner.contains(Location::new(4, 3)));
        assert!(!inner.contains(Location::new(0, 1)));
        assert!(inner.contains(Location::new(1, 1)));
        assert!(inner.contains(Location::new(3, 2)));
        assert_eq!(inner.cells().count(), 6);
        assert!(Bounds::of_grid(2, 2).inset(1).is_empty());
    }

    #[test]
    fn forward_narration_names_the_heading() {
        let event = Event::ActionExecuted {
            actor: ThingId::new(3),
            action: Action::Forward,
            location: Location::new(1, 2),
            heading: Direction::Up,
        };
        assert_eq!(
            event.to_string(),
            "Actor#3 decided to move upwards at location: (1, 2)"
        );
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn events_round_trip_through_bincode() {
        assert_round_trip(&Event::ThingMoved {
            thing: ThingId::new(9),
            kind: super::ThingKind::Actor,
            from: Location::new(1, 1),
            to: Location::new(1, 2),
        });
    }
}
