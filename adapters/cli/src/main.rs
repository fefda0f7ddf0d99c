#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs cleaning simulations and plans.

mod report;
mod scenario;

use std::{cell::RefCell, path::PathBuf, rc::Rc};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use cleanroom_core::{Action, Direction, Event, ThingKind, VacuumPercept};
use cleanroom_system_agents::{
    sweep_table, AgentProgram, ModelBasedVacuumProgram, RandomProgram, ReflexVacuumProgram,
    ScriptedProgram, TableDrivenProgram,
};
use cleanroom_system_planning::VacuumSearchProblem;
use cleanroom_system_search::SearchLimits;
use cleanroom_system_simulation::Simulation;
use cleanroom_world::{perception::DirtSensor, query, GridWorld, Walled};
use log::info;

use crate::{
    report::{render_json, ActivityTally, PlanReport, ReplayReport, SimulationReport},
    scenario::{
        coordinate, AgentKind, HeuristicKind, Layout, PlanSettings, ScenarioFile, SimulateSettings,
    },
};

/// Moves and cleaning available to the random program.
const RANDOM_ACTIONS: [Action; 6] = [
    Action::Left,
    Action::Right,
    Action::Up,
    Action::Down,
    Action::Suck,
    Action::NoOp,
];

/// Longest percept history the table agent has entries for.
const TABLE_DEPTH: usize = 6;

#[derive(Debug, Parser)]
#[command(name = "cleanroom", version)]
#[command(about = "Vacuum-cleaner grid world simulations and A* cleaning plans")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Run an agent program in a walled grid with randomly placed dirt.
    Simulate(SimulateArgs),
    /// Compute a cleaning plan with A* search.
    Plan(PlanArgs),
}

/// Options shared by every subcommand.
#[derive(Debug, Args)]
pub(crate) struct CommonArgs {
    /// Seed for dirt placement, start position and random programs.
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// TOML file supplying defaults for any option not given on the command line.
    #[arg(long)]
    pub(crate) scenario: Option<PathBuf>,
    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub(crate) format: OutputFormat,
}

#[derive(Debug, Args)]
pub(crate) struct SimulateArgs {
    /// Interior width in cells (1 to 4).
    #[arg(long)]
    pub(crate) width: Option<u32>,
    /// Interior height in cells (1 to 4).
    #[arg(long)]
    pub(crate) height: Option<u32>,
    /// Number of simulation steps.
    #[arg(long)]
    pub(crate) steps: Option<u64>,
    /// Agent program driving the vacuum.
    #[arg(long, value_enum)]
    pub(crate) agent: Option<AgentKind>,
    #[command(flatten)]
    pub(crate) common: CommonArgs,
}

#[derive(Debug, Args)]
pub(crate) struct PlanArgs {
    /// Grid width in cells (1 to 5).
    #[arg(long)]
    pub(crate) width: Option<u32>,
    /// Grid height in cells (1 to 5).
    #[arg(long)]
    pub(crate) height: Option<u32>,
    /// Heuristic ordering the search frontier.
    #[arg(long, value_enum)]
    pub(crate) heuristic: Option<HeuristicKind>,
    /// Give up after this many node expansions.
    #[arg(long)]
    pub(crate) max_expansions: Option<usize>,
    /// Execute the plan in a walled world afterwards.
    #[arg(long)]
    pub(crate) replay: bool,
    #[command(flatten)]
    pub(crate) common: CommonArgs,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable narration.
    Text,
    /// Pretty-printed JSON report.
    Json,
}

/// Entry point for the Cleanroom command-line interface.
fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let output = match &cli.command {
        Command::Simulate(args) => {
            let scenario = ScenarioFile::load(args.common.scenario.as_deref())?;
            let settings = SimulateSettings::resolve(args, &scenario)?;
            let report = simulate(settings)?;
            match args.common.format {
                OutputFormat::Text => report.render_text(),
                OutputFormat::Json => render_json(&report)?,
            }
        }
        Command::Plan(args) => {
            let scenario = ScenarioFile::load(args.common.scenario.as_deref())?;
            let settings = PlanSettings::resolve(args, &scenario)?;
            let report = plan(settings)?;
            match args.common.format {
                OutputFormat::Text => report.render_text(),
                OutputFormat::Json => render_json(&report)?,
            }
        }
    };

    println!("{output}");
    Ok(())
}

fn simulate(settings: SimulateSettings) -> Result<SimulationReport> {
    let layout = Layout::sample(settings.width, settings.height, settings.seed);
    let tally = Rc::new(RefCell::new(ActivityTally::default()));
    let mut setup = Vec::new();
    let mut world = walled_world(settings.width, settings.height, settings.seed, &layout, &mut setup);
    world.add_observer(Box::new(Rc::clone(&tally)));

    let program: Box<dyn AgentProgram<VacuumPercept>> = match settings.agent {
        AgentKind::Random => Box::new(RandomProgram::new(RANDOM_ACTIONS.to_vec(), settings.seed)),
        AgentKind::Reflex => Box::new(ReflexVacuumProgram),
        AgentKind::Model => Box::new(ModelBasedVacuumProgram::new()),
        AgentKind::Table => {
            let depth = usize::try_from(settings.steps)
                .map_or(TABLE_DEPTH, |steps| steps.min(TABLE_DEPTH));
            Box::new(TableDrivenProgram::new(sweep_table(depth)))
        }
    };
    let mut simulation = Simulation::new(world, DirtSensor);
    let actor = simulation
        .add_agent(Some(layout.start), Direction::Up, program, &mut setup)
        .with_context(|| format!("vacuum could not be placed at {}", layout.start))?;

    let mut events = Vec::new();
    let steps = simulation.run(settings.steps, &mut events);
    let performance = query::actor(simulation.world(), actor)
        .map(|snapshot| snapshot.performance)
        .context("vacuum left the world during the run")?;
    info!("simulation finished after {steps} steps with performance {performance}");

    let activity = *tally.borrow();
    Ok(SimulationReport {
        width: settings.width,
        height: settings.height,
        seed: settings.seed,
        agent: settings.agent,
        start: layout.start,
        dirty: layout.dirty.iter().copied().collect(),
        steps,
        narration: narration(&events),
        activity,
        remaining_dirt: query::count_of(simulation.world(), ThingKind::Dirt),
        performance,
    })
}

fn plan(settings: PlanSettings) -> Result<PlanReport> {
    let layout = Layout::sample(settings.width, settings.height, settings.seed);
    let problem = VacuumSearchProblem::new(
        coordinate(settings.width),
        coordinate(settings.height),
        layout.start,
        layout.dirty.clone(),
    )?;
    let limits = SearchLimits {
        max_expansions: settings.max_expansions,
    };
    let solution = problem
        .solve(settings.heuristic.into(), limits)
        .context("no cleaning plan found")?;
    info!(
        "plan of {} actions found after {} expansions",
        solution.actions.len(),
        solution.expanded
    );

    let replay = if settings.replay {
        let script = solution.actions.iter().copied().map(Action::from).collect();
        Some(replay_plan(&settings, &layout, script)?)
    } else {
        None
    };

    Ok(PlanReport {
        width: settings.width,
        height: settings.height,
        seed: settings.seed,
        heuristic: settings.heuristic,
        start: layout.start,
        dirty: layout.dirty.iter().copied().collect(),
        actions: solution.actions.iter().map(ToString::to_string).collect(),
        path_cost: solution.path_cost,
        expanded: solution.expanded,
        replay,
    })
}

fn replay_plan(settings: &PlanSettings, layout: &Layout, script: Vec<Action>) -> Result<ReplayReport> {
    let mut setup = Vec::new();
    let world = walled_world(settings.width, settings.height, settings.seed, layout, &mut setup);
    let steps = u64::try_from(script.len()).context("plan is too long to replay")?;
    let mut simulation = Simulation::new(world, DirtSensor);
    let actor = simulation
        .add_agent(
            Some(layout.start),
            Direction::Up,
            Box::new(ScriptedProgram::new(script)),
            &mut setup,
        )
        .with_context(|| format!("vacuum could not be placed at {}", layout.start))?;

    let mut events = Vec::new();
    let _ = simulation.run(steps, &mut events);
    let performance = query::actor(simulation.world(), actor)
        .map(|snapshot| snapshot.performance)
        .context("vacuum left the world during the replay")?;

    Ok(ReplayReport {
        narration: narration(&events),
        remaining_dirt: query::count_of(simulation.world(), ThingKind::Dirt),
        performance,
    })
}

/// Builds a `(width + 2) × (height + 2)` walled world holding the layout's dirt.
fn walled_world(
    width: u32,
    height: u32,
    seed: u64,
    layout: &Layout,
    out: &mut Vec<Event>,
) -> GridWorld<Walled> {
    let mut world =
        GridWorld::with_seed(width.saturating_add(2), height.saturating_add(2), seed).add_walls(out);
    for cell in &layout.dirty {
        let _ = world.add_thing(ThingKind::Dirt, Some(*cell), true, out);
    }
    world
}

fn narration(events: &[Event]) -> Vec<String> {
    events
        .iter()
        .filter(|event| {
            matches!(
                event,
                Event::ActionExecuted { .. }
                    | Event::ActorBumped { .. }
                    | Event::DirtSucked { .. }
                    | Event::ThingGrabbed { .. }
                    | Event::ThingReleased { .. }
                    | Event::ActionIgnored { .. }
            )
        })
        .map(ToString::to_string)
        .collect()
}
