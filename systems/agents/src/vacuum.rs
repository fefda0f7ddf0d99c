//! Programs specialised for the cleaning percept.

use std::collections::{BTreeSet, HashMap};

use cleanroom_core::{Action, BumpStatus, Direction, DirtStatus, Location, VacuumPercept};
use log::trace;

use crate::AgentProgram;

/// Sucks when dirty, turns right after a bump and otherwise drives forward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReflexVacuumProgram;

impl AgentProgram<VacuumPercept> for ReflexVacuumProgram {
    fn decide(&mut self, percept: &VacuumPercept) -> Action {
        match (percept.status, percept.bump) {
            (DirtStatus::Dirty, _) => Action::Suck,
            (DirtStatus::Clean, BumpStatus::Bump) => Action::TurnRight,
            (DirtStatus::Clean, BumpStatus::Clear) => Action::Forward,
        }
    }
}

/// Every percept the cleaning world can produce.
const VACUUM_PERCEPTS: [VacuumPercept; 4] = [
    VacuumPercept {
        status: DirtStatus::Clean,
        bump: BumpStatus::Clear,
    },
    VacuumPercept {
        status: DirtStatus::Clean,
        bump: BumpStatus::Bump,
    },
    VacuumPercept {
        status: DirtStatus::Dirty,
        bump: BumpStatus::Clear,
    },
    VacuumPercept {
        status: DirtStatus::Dirty,
        bump: BumpStatus::Bump,
    },
];

/// Lookup table for a [`TableDrivenProgram`](crate::TableDrivenProgram) that
/// sweeps a row.
///
/// Holds one entry for every percept history of up to `depth` percepts. A
/// dirty cell is sucked; otherwise the vacuum drives right until its first
/// bump and left from then on. Longer histories are absent and idle.
#[must_use]
pub fn sweep_table(depth: usize) -> HashMap<Vec<VacuumPercept>, Action> {
    let mut table = HashMap::new();
    let mut layer: Vec<Vec<VacuumPercept>> = vec![Vec::new()];
    for _ in 0..depth {
        let mut next = Vec::with_capacity(layer.len() * VACUUM_PERCEPTS.len());
        for history in &layer {
            for percept in VACUUM_PERCEPTS {
                let mut extended = history.clone();
                extended.push(percept);
                let _ = table.insert(extended.clone(), sweep_action(&extended));
                next.push(extended);
            }
        }
        layer = next;
    }
    table
}

fn sweep_action(history: &[VacuumPercept]) -> Action {
    let turned = history
        .iter()
        .any(|percept| percept.bump == BumpStatus::Bump);
    match history.last() {
        Some(percept) if percept.status == DirtStatus::Dirty => Action::Suck,
        _ if turned => Action::Left,
        _ => Action::Right,
    }
}

/// Explores the grid depth-first using a dead-reckoned internal map.
///
/// Positions are relative to where the program started. Cells that bumped are
/// remembered as blocked; once every reachable cell has been visited the
/// program returns to idling with [`Action::NoOp`].
#[derive(Clone, Debug)]
pub struct ModelBasedVacuumProgram {
    position: Location,
    visited: BTreeSet<Location>,
    blocked: BTreeSet<Location>,
    trail: Vec<Location>,
    pending: Option<PendingMove>,
}

#[derive(Clone, Copy, Debug)]
struct PendingMove {
    direction: Direction,
    backtracking: bool,
}

/// Order in which unvisited neighbours are tried.
const EXPLORATION_ORDER: [Direction; 4] = Direction::CLOCKWISE;

impl ModelBasedVacuumProgram {
    /// Creates a program that has seen nothing yet.
    #[must_use]
    pub fn new() -> Self {
        let origin = Location::new(0, 0);
        Self {
            position: origin,
            visited: BTreeSet::from([origin]),
            blocked: BTreeSet::new(),
            trail: Vec::new(),
            pending: None,
        }
    }

    /// Believed position relative to the starting cell.
    #[must_use]
    pub fn position(&self) -> Location {
        self.position
    }

    /// Cells believed visited, relative to the starting cell.
    #[must_use]
    pub fn visited(&self) -> &BTreeSet<Location> {
        &self.visited
    }

    /// Reports whether exploration has nothing left to try.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.pending.is_none() && self.trail.is_empty() && self.next_unvisited().is_none()
    }

    fn update_model(&mut self, percept: &VacuumPercept) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        let target = pending.direction.move_forward(self.position);
        if percept.bump == BumpStatus::Bump {
            trace!("model marks {target} as blocked");
            let _ = self.blocked.insert(target);
            return;
        }

        if !pending.backtracking {
            self.trail.push(self.position);
        }
        self.position = target;
        let _ = self.visited.insert(target);
    }

    fn next_unvisited(&self) -> Option<Direction> {
        EXPLORATION_ORDER.into_iter().find(|direction| {
            let neighbour = direction.move_forward(self.position);
            !self.visited.contains(&neighbour) && !self.blocked.contains(&neighbour)
        })
    }

    fn step(&mut self, direction: Direction, backtracking: bool) -> Action {
        self.pending = Some(PendingMove {
            direction,
            backtracking,
        });
        Action::from(direction)
    }
}

impl Default for ModelBasedVacuumProgram {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentProgram<VacuumPercept> for ModelBasedVacuumProgram {
    fn decide(&mut self, percept: &VacuumPercept) -> Action {
        self.update_model(percept);

        if percept.status == DirtStatus::Dirty {
            return Action::Suck;
        }
        if let Some(direction) = self.next_unvisited() {
            return self.step(direction, false);
        }
        while let Some(previous) = self.trail.pop() {
            let back = EXPLORATION_ORDER
                .into_iter()
                .find(|direction| direction.move_forward(self.position) == previous);
            if let Some(direction) = back {
                return self.step(direction, true);
            }
        }
        Action::NoOp
    }
}
