//! Remaining-cost estimates for [`VacuumSearchProblem`].

use std::fmt;

use cleanroom_core::Location;
use cleanroom_system_search::{Heuristic, Node};

use crate::{CleaningAction, SearchState, VacuumSearchProblem};

/// Distance reported when no dirty cell remains.
pub const NO_DIRT_DISTANCE: f64 = 5000.0;

/// Named remaining-cost estimate used to order the A* frontier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CleaningHeuristic {
    /// Reproduces the recorded scenario outputs: a penalty term minus the
    /// distance to the nearest dirty cell.
    ///
    /// The penalty counts dirty cells whose axis offsets from the nearest
    /// dirty cell are both below zero, so it is always zero and the estimate
    /// is never positive. It does not bound the true remaining cost and A*
    /// may return a suboptimal plan with it.
    #[default]
    LiteralH1,
    /// Euclidean distance to the nearest dirty cell, zero once clean.
    ///
    /// Never overestimates the number of moves left, so A* returns a
    /// minimum-cost plan.
    NearestDirtDistance,
}

impl CleaningHeuristic {
    /// Estimates the remaining cost of `state`.
    #[must_use]
    pub fn evaluate(self, state: &SearchState) -> f64 {
        match self {
            Self::LiteralH1 => {
                let (nearest, distance) = nearest_dirt(state);
                literal_penalty(nearest, state) - distance
            }
            Self::NearestDirtDistance => match nearest_dirt(state) {
                (Some(_), distance) => distance,
                (None, _) => 0.0,
            },
        }
    }

    /// Stable name used on the command line and in reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::LiteralH1 => "literal",
            Self::NearestDirtDistance => "nearest",
        }
    }
}

impl fmt::Display for CleaningHeuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Heuristic<VacuumSearchProblem> for CleaningHeuristic {
    fn estimate(
        &self,
        _problem: &VacuumSearchProblem,
        node: &Node<SearchState, CleaningAction>,
    ) -> f64 {
        self.evaluate(node.state())
    }
}

/// First dirty cell at strictly smallest distance, with that distance.
fn nearest_dirt(state: &SearchState) -> (Option<Location>, f64) {
    state
        .dirty
        .iter()
        .fold((None, NO_DIRT_DISTANCE), |(best, best_distance), cell| {
            let distance = state.position.distance(*cell);
            if distance < best_distance {
                (Some(*cell), distance)
            } else {
                (best, best_distance)
            }
        })
}

fn literal_penalty(nearest: Option<Location>, state: &SearchState) -> f64 {
    let Some(anchor) = nearest else {
        return 0.0;
    };
    let count = state
        .dirty
        .iter()
        .filter(|cell| {
            let dx = i64::from(cell.x()) - i64::from(anchor.x());
            let dy = i64::from(cell.y()) - i64::from(anchor.y());
            **cell != anchor && dx.abs() < 0 && dy.abs() < 0
        })
        .count();
    count as f64
}
