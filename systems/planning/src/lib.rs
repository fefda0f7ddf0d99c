#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Cleaning-plan formulation for the vacuum grid.
//!
//! [`VacuumSearchProblem`] describes the grid as a search problem whose states
//! are a vacuum position plus the set of cells that still need cleaning. Legal
//! coordinates are `1..=x_max` by `1..=y_max`, which matches the interior of a
//! walled world of size `(x_max + 2) × (y_max + 2)`.

pub mod heuristic;

use std::{collections::BTreeSet, fmt};

use cleanroom_core::{Action, Location};
use cleanroom_system_search::{astar_search, Problem, SearchError, SearchLimits, Solution};
use log::debug;
use thiserror::Error;

pub use crate::heuristic::CleaningHeuristic;

/// Search state: where the vacuum is and which cells are still dirty.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SearchState {
    /// Current vacuum position.
    pub position: Location,
    /// Cells that still hold dirt, in `(x, y)` order.
    pub dirty: BTreeSet<Location>,
}

/// Moves and cleaning available to the planner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CleaningAction {
    /// Decrease `x` by one.
    Left,
    /// Increase `x` by one.
    Right,
    /// Increase `y` by one.
    Up,
    /// Decrease `y` by one.
    Down,
    /// Clean the current cell.
    Suck,
}

impl CleaningAction {
    /// Candidate actions in the order successors are generated.
    pub const ALL: [Self; 5] = [Self::Left, Self::Right, Self::Up, Self::Down, Self::Suck];

    /// Lowercase name used in printed plans.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
            Self::Suck => "suck",
        }
    }
}

impl fmt::Display for CleaningAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<CleaningAction> for Action {
    fn from(action: CleaningAction) -> Self {
        match action {
            CleaningAction::Left => Action::Left,
            CleaningAction::Right => Action::Right,
            CleaningAction::Up => Action::Up,
            CleaningAction::Down => Action::Down,
            CleaningAction::Suck => Action::Suck,
        }
    }
}

/// Reasons a cleaning problem cannot be formulated.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ProblemError {
    /// The grid has no cells.
    #[error("grid must be at least 1x1, got {x_max}x{y_max}")]
    EmptyGrid {
        /// Requested largest `x`.
        x_max: i32,
        /// Requested largest `y`.
        y_max: i32,
    },
    /// The start position lies outside the grid.
    #[error("start position {0} lies outside the grid")]
    StartOutsideGrid(Location),
    /// A dirty or goal cell lies outside the grid.
    #[error("dirty cell {0} lies outside the grid")]
    DirtOutsideGrid(Location),
}

/// Cleaning problem over a `x_max` by `y_max` grid.
#[derive(Clone, Debug)]
pub struct VacuumSearchProblem {
    x_max: i32,
    y_max: i32,
    initial: SearchState,
    goal: BTreeSet<Location>,
}

impl VacuumSearchProblem {
    /// Formulates the problem of cleaning every cell in `dirty` from `start`.
    pub fn new(
        x_max: i32,
        y_max: i32,
        start: Location,
        dirty: BTreeSet<Location>,
    ) -> Result<Self, ProblemError> {
        if x_max < 1 || y_max < 1 {
            return Err(ProblemError::EmptyGrid { x_max, y_max });
        }
        let problem = Self {
            x_max,
            y_max,
            initial: SearchState {
                position: start,
                dirty,
            },
            goal: BTreeSet::new(),
        };
        if !problem.contains(start) {
            return Err(ProblemError::StartOutsideGrid(start));
        }
        problem.check_cells(&problem.initial.dirty)?;
        Ok(problem)
    }

    /// Replaces the target dirty set, which defaults to empty.
    pub fn with_goal(mut self, goal: BTreeSet<Location>) -> Result<Self, ProblemError> {
        self.check_cells(&goal)?;
        self.goal = goal;
        Ok(self)
    }

    /// Largest legal `x`.
    #[must_use]
    pub fn x_max(&self) -> i32 {
        self.x_max
    }

    /// Largest legal `y`.
    #[must_use]
    pub fn y_max(&self) -> i32 {
        self.y_max
    }

    /// State the plan starts from.
    #[must_use]
    pub fn initial_state(&self) -> &SearchState {
        &self.initial
    }

    /// Target dirty set.
    #[must_use]
    pub fn goal(&self) -> &BTreeSet<Location> {
        &self.goal
    }

    /// Solves the problem with A* guided by `heuristic`.
    pub fn solve(
        &self,
        heuristic: CleaningHeuristic,
        limits: SearchLimits,
    ) -> Result<Solution<SearchState, CleaningAction>, SearchError> {
        debug!(
            "planning on {}x{} grid from {} with {} dirty cells using {heuristic}",
            self.x_max,
            self.y_max,
            self.initial.position,
            self.initial.dirty.len()
        );
        astar_search(self, &heuristic, limits)
    }

    fn contains(&self, location: Location) -> bool {
        (1..=self.x_max).contains(&location.x()) && (1..=self.y_max).contains(&location.y())
    }

    fn check_cells(&self, cells: &BTreeSet<Location>) -> Result<(), ProblemError> {
        match cells.iter().find(|cell| !self.contains(**cell)) {
            Some(cell) => Err(ProblemError::DirtOutsideGrid(*cell)),
            None => Ok(()),
        }
    }
}

impl Problem for VacuumSearchProblem {
    type State = SearchState;
    type Action = CleaningAction;

    fn initial(&self) -> SearchState {
        self.initial.clone()
    }

    /// The start state is charged one unit, so the first move from a grid
    /// with one dirty cell already costs four.
    fn initial_cost(&self) -> u64 {
        1
    }

    fn actions(&self, state: &SearchState) -> Vec<CleaningAction> {
        let SearchState { position, dirty } = state;
        CleaningAction::ALL
            .into_iter()
            .filter(|action| match action {
                CleaningAction::Left => position.x() != 1,
                CleaningAction::Right => position.x() != self.x_max,
                CleaningAction::Up => position.y() != self.y_max,
                CleaningAction::Down => position.y() != 1,
                CleaningAction::Suck => dirty.contains(position),
            })
            .collect()
    }

    fn result(&self, state: &SearchState, action: &CleaningAction) -> SearchState {
        let mut next = state.clone();
        match action {
            CleaningAction::Left => next.position = state.position.offset(-1, 0),
            CleaningAction::Right => next.position = state.position.offset(1, 0),
            CleaningAction::Up => next.position = state.position.offset(0, 1),
            CleaningAction::Down => next.position = state.position.offset(0, -1),
            CleaningAction::Suck => {
                let _ = next.dirty.remove(&state.position);
            }
        }
        next
    }

    fn goal_test(&self, state: &SearchState) -> bool {
        state.dirty == self.goal
    }

    /// Every step costs one plus two per cell still dirty afterwards.
    fn path_cost(
        &self,
        cost: u64,
        _from: &SearchState,
        _action: &CleaningAction,
        to: &SearchState,
    ) -> u64 {
        let remaining = u64::try_from(to.dirty.len()).unwrap_or(u64::MAX);
        cost.saturating_add(1 + remaining.saturating_mul(2))
    }
}
