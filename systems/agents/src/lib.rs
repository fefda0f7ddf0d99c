#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Agent programs that map percepts to actions.
//!
//! Programs own whatever memory they need and never see the world directly;
//! the simulation driver senses on their behalf and dispatches the returned
//! [`Action`].

mod vacuum;

use std::{collections::HashMap, hash::Hash};

use cleanroom_core::Action;
use log::trace;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub use crate::vacuum::{sweep_table, ModelBasedVacuumProgram, ReflexVacuumProgram};

/// Decision function of an actor.
pub trait AgentProgram<P> {
    /// Chooses the next action for `percept`.
    fn decide(&mut self, percept: &P) -> Action;
}

impl<P, A> AgentProgram<P> for Box<A>
where
    A: AgentProgram<P> + ?Sized,
{
    fn decide(&mut self, percept: &P) -> Action {
        (**self).decide(percept)
    }
}

/// Chooses uniformly among a fixed list of actions, ignoring the percept.
#[derive(Clone, Debug)]
pub struct RandomProgram {
    actions: Vec<Action>,
    rng: ChaCha8Rng,
}

impl RandomProgram {
    /// Creates a program drawing from `actions` with a generator seeded by `seed`.
    #[must_use]
    pub fn new(actions: Vec<Action>, seed: u64) -> Self {
        Self {
            actions,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Actions the program chooses from.
    #[must_use]
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }
}

impl<P> AgentProgram<P> for RandomProgram {
    fn decide(&mut self, _percept: &P) -> Action {
        if self.actions.is_empty() {
            return Action::NoOp;
        }
        let index = self.rng.gen_range(0..self.actions.len());
        self.actions[index]
    }
}

/// Looks the complete percept history up in a table.
///
/// Histories missing from the table yield [`Action::NoOp`].
#[derive(Clone, Debug)]
pub struct TableDrivenProgram<P> {
    table: HashMap<Vec<P>, Action>,
    percepts: Vec<P>,
}

impl<P: Clone + Eq + Hash> TableDrivenProgram<P> {
    /// Creates a program backed by `table`.
    #[must_use]
    pub fn new(table: HashMap<Vec<P>, Action>) -> Self {
        Self {
            table,
            percepts: Vec::new(),
        }
    }

    /// Percepts received so far, oldest first.
    #[must_use]
    pub fn history(&self) -> &[P] {
        &self.percepts
    }
}

impl<P: Clone + Eq + Hash> AgentProgram<P> for TableDrivenProgram<P> {
    fn decide(&mut self, percept: &P) -> Action {
        self.percepts.push(percept.clone());
        match self.table.get(&self.percepts) {
            Some(action) => *action,
            None => {
                trace!(
                    "no table entry for a history of {} percepts",
                    self.percepts.len()
                );
                Action::NoOp
            }
        }
    }
}

/// Replays a fixed action sequence, then idles.
#[derive(Clone, Debug, Default)]
pub struct ScriptedProgram {
    script: Vec<Action>,
    cursor: usize,
}

impl ScriptedProgram {
    /// Creates a program that replays `script` in order.
    #[must_use]
    pub fn new(script: Vec<Action>) -> Self {
        Self { script, cursor: 0 }
    }

    /// Reports whether every scripted action has been handed out.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.cursor >= self.script.len()
    }
}

impl<P> AgentProgram<P> for ScriptedProgram {
    fn decide(&mut self, _percept: &P) -> Action {
        match self.script.get(self.cursor) {
            Some(action) => {
                self.cursor += 1;
                *action
            }
            None => Action::NoOp,
        }
    }
}

#[cfg(test)]
mod tests {
    use cleanroom_core::{BumpStatus, DirtStatus, VacuumPercept};

    use super::*;

    const CLEAN: VacuumPercept = VacuumPercept {
        status: DirtStatus::Clean,
        bump: BumpStatus::Clear,
    };
    const DIRTY: VacuumPercept = VacuumPercept {
        status: DirtStatus::Dirty,
        bump: BumpStatus::Clear,
    };

    #[test]
    fn random_program_only_draws_listed_actions() {
        let choices = vec![Action::Right, Action::Left, Action::Suck, Action::NoOp];
        let mut program = RandomProgram::new(choices.clone(), 7);
        let drawn: Vec<Action> = (0..64).map(|_| program.decide(&CLEAN)).collect();

        assert!(drawn.iter().all(|action| choices.contains(action)));
        assert!(choices.iter().all(|choice| drawn.contains(choice)));
    }

    #[test]
    fn random_program_is_reproducible_for_a_seed() {
        let choices = Action::ALL.to_vec();
        let mut first = RandomProgram::new(choices.clone(), 99);
        let mut second = RandomProgram::new(choices, 99);
        for _ in 0..32 {
            assert_eq!(first.decide(&CLEAN), second.decide(&CLEAN));
        }
    }

    #[test]
    fn empty_random_program_idles() {
        let mut program = RandomProgram::new(Vec::new(), 1);
        assert_eq!(AgentProgram::<VacuumPercept>::decide(&mut program, &CLEAN), Action::NoOp);
    }

    #[test]
    fn table_lookup_uses_the_whole_history() {
        let table = HashMap::from([
            (vec![DIRTY], Action::Suck),
            (vec![DIRTY, CLEAN], Action::Right),
        ]);
        let mut program = TableDrivenProgram::new(table);

        assert_eq!(program.decide(&DIRTY), Action::Suck);
        assert_eq!(program.decide(&CLEAN), Action::Right);
        assert_eq!(program.decide(&CLEAN), Action::NoOp);
        assert_eq!(program.history().len(), 3);
    }

    #[test]
    fn scripted_program_idles_after_its_script() {
        let mut program = ScriptedProgram::new(vec![Action::Up, Action::Suck]);
        let decisions: Vec<Action> = (0..4)
            .map(|_| AgentProgram::<VacuumPercept>::decide(&mut program, &CLEAN))
            .collect();

        assert_eq!(
            decisions,
            vec![Action::Up, Action::Suck, Action::NoOp, Action::NoOp]
        );
        assert!(program.is_finished());
    }

    #[test]
    fn boxed_programs_delegate() {
        let mut program: Box<dyn AgentProgram<VacuumPercept>> =
            Box::new(ScriptedProgram::new(vec![Action::Grab]));
        assert_eq!(program.decide(&CLEAN), Action::Grab);
        assert_eq!(program.decide(&CLEAN), Action::NoOp);
    }
}
