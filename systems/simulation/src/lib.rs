#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic driver that lets agent programs act in a grid world.
//!
//! Each step senses every live actor and collects all decisions before any of
//! them is applied, so actors act on the same snapshot of the world.

use std::collections::BTreeMap;

use cleanroom_core::{Direction, Event, Location, ThingId};
use cleanroom_system_agents::AgentProgram;
use cleanroom_world::{perception::Sensor, query, GridWorld, Phase};
use log::debug;

/// Final standing of a single actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActorOutcome {
    /// Identifier of the actor.
    pub actor: ThingId,
    /// Cell the actor occupies.
    pub location: Location,
    /// Accumulated performance score.
    pub performance: i64,
}

/// Owns a world, the sensor used to perceive it and one program per actor.
pub struct Simulation<P: Phase, S: Sensor> {
    world: GridWorld<P>,
    sensor: S,
    programs: BTreeMap<ThingId, Box<dyn AgentProgram<S::Percept>>>,
    steps_taken: u64,
}

impl<P: Phase, S: Sensor> Simulation<P, S> {
    /// Creates a simulation around an already populated world.
    #[must_use]
    pub fn new(world: GridWorld<P>, sensor: S) -> Self {
        Self {
            world,
            sensor,
            programs: BTreeMap::new(),
            steps_taken: 0,
        }
    }

    /// Places a new actor driven by `program`.
    ///
    /// Returns `None` when the world dropped the placement.
    pub fn add_agent(
        &mut self,
        location: Option<Location>,
        heading: Direction,
        program: Box<dyn AgentProgram<S::Percept>>,
        out: &mut Vec<Event>,
    ) -> Option<ThingId> {
        let actor = self.world.add_actor(location, heading, out)?;
        let _ = self.programs.insert(actor, program);
        Some(actor)
    }

    /// Drives an actor that is already in the world with `program`.
    ///
    /// Replaces the previous program of that actor, if any.
    pub fn attach(&mut self, actor: ThingId, program: Box<dyn AgentProgram<S::Percept>>) {
        let _ = self.programs.insert(actor, program);
    }

    /// Read-only access to the world.
    #[must_use]
    pub fn world(&self) -> &GridWorld<P> {
        &self.world
    }

    /// Mutable access to the world, for placing scenery between steps.
    pub fn world_mut(&mut self) -> &mut GridWorld<P> {
        &mut self.world
    }

    /// Number of completed steps.
    #[must_use]
    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    /// Reports whether no driven actor is alive.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.live_actors().is_empty()
    }

    /// Runs one step: every live actor perceives and decides, then every
    /// decision is applied in ascending identifier order.
    pub fn step(&mut self, out: &mut Vec<Event>) {
        let mut decisions = Vec::new();
        for actor in self.live_actors() {
            let Some(percept) = self.sensor.sense(&self.world, actor) else {
                continue;
            };
            if let Some(program) = self.programs.get_mut(&actor) {
                decisions.push((actor, program.decide(&percept)));
            }
        }

        for (actor, action) in decisions {
            self.world.execute_action(actor, action, out);
        }
        self.steps_taken += 1;
    }

    /// Runs up to `steps` steps, stopping early once no driven actor is alive.
    ///
    /// Returns the number of steps that ran.
    pub fn run(&mut self, steps: u64, out: &mut Vec<Event>) -> u64 {
        let start = self.steps_taken;
        for _ in 0..steps {
            if self.is_done() {
                debug!("no live actors left after {} steps", self.steps_taken);
                break;
            }
            self.step(out);
        }
        self.steps_taken - start
    }

    /// Standing of every driven actor still in the world.
    #[must_use]
    pub fn outcomes(&self) -> Vec<ActorOutcome> {
        self.programs
            .keys()
            .filter_map(|actor| query::actor(&self.world, *actor))
            .map(|snapshot| ActorOutcome {
                actor: snapshot.id,
                location: snapshot.location,
                performance: snapshot.performance,
            })
            .collect()
    }

    /// Consumes the simulation and returns its world.
    #[must_use]
    pub fn into_world(self) -> GridWorld<P> {
        self.world
    }

    fn live_actors(&self) -> Vec<ThingId> {
        query::actors(&self.world)
            .into_iter()
            .filter(|actor| self.programs.contains_key(actor))
            .collect()
    }
}
