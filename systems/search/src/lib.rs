#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Best-first graph search over abstract state spaces.
//!
//! Problems describe their successor function through [`Problem`]; the search
//! keeps an arena of [`Node`] values linked to their parents and reconstructs
//! the action sequence once a goal state is popped from the frontier.

mod frontier;

use std::{collections::HashSet, fmt::Debug, hash::Hash};

use log::debug;
use thiserror::Error;

use crate::frontier::Frontier;

/// Formal description of a search problem.
pub trait Problem {
    /// Search state. Equal states are merged by the explored set.
    type State: Clone + Eq + Hash + Debug;
    /// Action applied to move between states.
    type Action: Clone + Debug;

    /// State the search starts from.
    fn initial(&self) -> Self::State;

    /// Path cost charged to the initial state.
    fn initial_cost(&self) -> u64 {
        0
    }

    /// Actions applicable in `state`, in the order successors are generated.
    fn actions(&self, state: &Self::State) -> Vec<Self::Action>;

    /// State reached by applying `action` in `state`.
    fn result(&self, state: &Self::State, action: &Self::Action) -> Self::State;

    /// Reports whether `state` satisfies the goal.
    fn goal_test(&self, state: &Self::State) -> bool;

    /// Cost of a path that reaches `to` from `from` via `action`, given the
    /// cost `cost` of reaching `from`.
    fn path_cost(
        &self,
        cost: u64,
        from: &Self::State,
        action: &Self::Action,
        to: &Self::State,
    ) -> u64;
}

/// Search tree node stored in the search arena.
#[derive(Clone, Debug)]
pub struct Node<S, A> {
    state: S,
    parent: Option<usize>,
    action: Option<A>,
    path_cost: u64,
    depth: usize,
}

impl<S, A> Node<S, A> {
    fn root(state: S, path_cost: u64) -> Self {
        Self {
            state,
            parent: None,
            action: None,
            path_cost,
            depth: 0,
        }
    }

    /// State held by the node.
    #[must_use]
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Action that produced the node, `None` for the root.
    #[must_use]
    pub fn action(&self) -> Option<&A> {
        self.action.as_ref()
    }

    /// Cost of the path from the root to this node.
    #[must_use]
    pub fn path_cost(&self) -> u64 {
        self.path_cost
    }

    /// Number of actions between the root and this node.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// Estimates the remaining cost from a node to a goal.
pub trait Heuristic<P: Problem> {
    /// Estimated remaining cost for `node`.
    fn estimate(&self, problem: &P, node: &Node<P::State, P::Action>) -> f64;
}

impl<P, F> Heuristic<P> for F
where
    P: Problem,
    F: Fn(&P, &Node<P::State, P::Action>) -> f64,
{
    fn estimate(&self, problem: &P, node: &Node<P::State, P::Action>) -> f64 {
        self(problem, node)
    }
}

/// Bounds applied to a single search run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchLimits {
    /// Maximum number of node expansions, unbounded when `None`.
    pub max_expansions: Option<usize>,
}

impl SearchLimits {
    /// Limits that never stop the search early.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            max_expansions: None,
        }
    }

    /// Limits that stop the search after `max_expansions` expansions.
    #[must_use]
    pub const fn with_max_expansions(max_expansions: usize) -> Self {
        Self {
            max_expansions: Some(max_expansions),
        }
    }
}

/// Reasons a search ends without a solution.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    /// Every reachable state was explored without meeting the goal.
    #[error("no solution: search space exhausted after {expanded} expansions")]
    Exhausted {
        /// Number of nodes expanded before the frontier emptied.
        expanded: usize,
    },
    /// The configured expansion budget ran out.
    #[error("no solution within the limit of {limit} expansions")]
    ExpansionLimit {
        /// Budget that was reached.
        limit: usize,
    },
}

/// Successful search outcome.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution<S, A> {
    /// Actions leading from the initial state to the goal.
    pub actions: Vec<A>,
    /// Visited states, initial state first and goal state last.
    pub states: Vec<S>,
    /// Cost of the goal node's path.
    pub path_cost: u64,
    /// Number of nodes expanded before the goal was popped.
    pub expanded: usize,
}

/// Expands nodes in ascending order of `f`.
///
/// Ties are broken first-inserted-first-expanded. A state already on the
/// frontier is replaced only when a strictly lower `f` is found, and the goal
/// test is applied when a node is popped.
pub fn best_first_graph_search<P, F>(
    problem: &P,
    mut f: F,
    limits: SearchLimits,
) -> Result<Solution<P::State, P::Action>, SearchError>
where
    P: Problem,
    F: FnMut(&P, &Node<P::State, P::Action>) -> f64,
{
    let root = Node::root(problem.initial(), problem.initial_cost());
    let root_priority = f(problem, &root);
    let mut arena = vec![root];
    let mut frontier = Frontier::new();
    frontier.push(arena[0].state.clone(), 0, root_priority);
    let mut explored: HashSet<P::State> = HashSet::new();
    let mut expanded = 0usize;

    while let Some(index) = frontier.pop(|node| &arena[node].state) {
        if problem.goal_test(&arena[index].state) {
            debug!("goal reached after {expanded} expansions");
            return Ok(solution(&arena, index, expanded));
        }

        if let Some(limit) = limits.max_expansions {
            if expanded >= limit {
                debug!("expansion limit of {limit} reached");
                return Err(SearchError::ExpansionLimit { limit });
            }
        }

        let _ = explored.insert(arena[index].state.clone());
        expanded += 1;

        for action in problem.actions(&arena[index].state) {
            let parent = &arena[index];
            let state = problem.result(&parent.state, &action);
            if explored.contains(&state) {
                continue;
            }
            let child = Node {
                path_cost: problem.path_cost(parent.path_cost, &parent.state, &action, &state),
                depth: parent.depth + 1,
                parent: Some(index),
                action: Some(action),
                state,
            };
            let priority = f(problem, &child);
            let improves = frontier
                .priority_of(&child.state)
                .map_or(true, |current| priority < current);
            if improves {
                let state = child.state.clone();
                arena.push(child);
                frontier.push(state, arena.len() - 1, priority);
            }
        }
    }

    debug!("search space exhausted after {expanded} expansions");
    Err(SearchError::Exhausted { expanded })
}

/// A* search: best-first search on path cost plus `heuristic`.
pub fn astar_search<P, H>(
    problem: &P,
    heuristic: &H,
    limits: SearchLimits,
) -> Result<Solution<P::State, P::Action>, SearchError>
where
    P: Problem,
    H: Heuristic<P> + ?Sized,
{
    best_first_graph_search(
        problem,
        |problem, node| node.path_cost as f64 + heuristic.estimate(problem, node),
        limits,
    )
}

/// Uniform-cost search: best-first search on path cost alone.
pub fn uniform_cost_search<P: Problem>(
    problem: &P,
    limits: SearchLimits,
) -> Result<Solution<P::State, P::Action>, SearchError> {
    best_first_graph_search(problem, |_, node| node.path_cost as f64, limits)
}

fn solution<S: Clone, A: Clone>(arena: &[Node<S, A>], goal: usize, expanded: usize) -> Solution<S, A> {
    let mut actions = Vec::with_capacity(arena[goal].depth);
    let mut states = Vec::with_capacity(arena[goal].depth + 1);
    let mut cursor = Some(goal);
    while let Some(index) = cursor {
        let node = &arena[index];
        states.push(node.state.clone());
        if let Some(action) = &node.action {
            actions.push(action.clone());
        }
        cursor = node.parent;
    }
    actions.reverse();
    states.reverse();

    Solution {
        actions,
        states,
        path_cost: arena[goal].path_cost,
        expanded,
    }
}
