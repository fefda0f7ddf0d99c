//! Scenario files, setting resolution and layout sampling.

use std::{collections::BTreeSet, fs, ops::RangeInclusive, path::Path};

use anyhow::{Context, Result};
use clap::ValueEnum;
use cleanroom_core::Location;
use cleanroom_system_planning::CleaningHeuristic;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{PlanArgs, SimulateArgs};

const SUPPORTED_SCENARIO_VERSION: u32 = 1;

/// Grid sizes accepted by `simulate`.
pub(crate) const SIMULATE_SIZES: RangeInclusive<u32> = 1..=4;
/// Grid sizes accepted by `plan`.
pub(crate) const PLAN_SIZES: RangeInclusive<u32> = 1..=5;

const DEFAULT_SIZE: u32 = 2;
const DEFAULT_STEPS: u64 = 20;
const DEFAULT_SEED: u64 = 0;

/// Agent program driving the simulated vacuum.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum AgentKind {
    /// Uniformly random moves and sucks.
    Random,
    /// Suck when dirty, turn after a bump, otherwise drive forward.
    #[default]
    Reflex,
    /// Depth-first explorer with an internal map.
    Model,
    /// Looks its percept history up in a row-sweeping table.
    Table,
}

/// Heuristic used to order the planner's frontier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum HeuristicKind {
    /// Negative distance to the nearest dirty cell, matching recorded outputs.
    #[default]
    Literal,
    /// Distance to the nearest dirty cell; yields minimum-cost plans.
    Nearest,
}

impl From<HeuristicKind> for CleaningHeuristic {
    fn from(kind: HeuristicKind) -> Self {
        match kind {
            HeuristicKind::Literal => CleaningHeuristic::LiteralH1,
            HeuristicKind::Nearest => CleaningHeuristic::NearestDirtDistance,
        }
    }
}

/// Errors raised while validating scenario settings.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum ScenarioError {
    /// The scenario file declares a version this build cannot read.
    #[error("unsupported scenario version {found}; expected {expected}")]
    UnsupportedVersion {
        /// Version found in the file.
        found: u32,
        /// Version this build reads.
        expected: u32,
    },
    /// A grid dimension lies outside the accepted range.
    #[error("{field} must be between {min} and {max}, got {value}")]
    SizeOutOfRange {
        /// Name of the offending setting.
        field: &'static str,
        /// Rejected value.
        value: u32,
        /// Smallest accepted value.
        min: u32,
        /// Largest accepted value.
        max: u32,
    },
}

/// Optional defaults read from a TOML scenario file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ScenarioFile {
    version: Option<u32>,
    width: Option<u32>,
    height: Option<u32>,
    seed: Option<u64>,
    steps: Option<u64>,
    agent: Option<AgentKind>,
    heuristic: Option<HeuristicKind>,
    max_expansions: Option<usize>,
    replay: Option<bool>,
}

impl ScenarioFile {
    /// Reads the scenario at `path`, or returns empty defaults without one.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario file at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid scenario file at {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        let scenario: Self =
            toml::from_str(contents).context("failed to parse scenario toml contents")?;
        if let Some(found) = scenario.version {
            if found != SUPPORTED_SCENARIO_VERSION {
                return Err(ScenarioError::UnsupportedVersion {
                    found,
                    expected: SUPPORTED_SCENARIO_VERSION,
                }
                .into());
            }
        }
        Ok(scenario)
    }
}

/// Fully resolved settings for `simulate`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct SimulateSettings {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) steps: u64,
    pub(crate) seed: u64,
    pub(crate) agent: AgentKind,
}

impl SimulateSettings {
    /// Merges flags over the scenario file over built-in defaults.
    pub(crate) fn resolve(
        args: &SimulateArgs,
        scenario: &ScenarioFile,
    ) -> Result<Self, ScenarioError> {
        let width = args.width.or(scenario.width).unwrap_or(DEFAULT_SIZE);
        let height = args.height.or(scenario.height).unwrap_or(DEFAULT_SIZE);
        check_size("width", width, &SIMULATE_SIZES)?;
        check_size("height", height, &SIMULATE_SIZES)?;
        Ok(Self {
            width,
            height,
            steps: args.steps.or(scenario.steps).unwrap_or(DEFAULT_STEPS),
            seed: args.common.seed.or(scenario.seed).unwrap_or(DEFAULT_SEED),
            agent: args.agent.or(scenario.agent).unwrap_or_default(),
        })
    }
}

/// Fully resolved settings for `plan`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PlanSettings {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) seed: u64,
    pub(crate) heuristic: HeuristicKind,
    pub(crate) max_expansions: Option<usize>,
    pub(crate) replay: bool,
}

impl PlanSettings {
    /// Merges flags over the scenario file over built-in defaults.
    pub(crate) fn resolve(args: &PlanArgs, scenario: &ScenarioFile) -> Result<Self, ScenarioError> {
        let width = args.width.or(scenario.width).unwrap_or(DEFAULT_SIZE);
        let height = args.height.or(scenario.height).unwrap_or(DEFAULT_SIZE);
        check_size("width", width, &PLAN_SIZES)?;
        check_size("height", height, &PLAN_SIZES)?;
        Ok(Self {
            width,
            height,
            seed: args.common.seed.or(scenario.seed).unwrap_or(DEFAULT_SEED),
            heuristic: args.heuristic.or(scenario.heuristic).unwrap_or_default(),
            max_expansions: args.max_expansions.or(scenario.max_expansions),
            replay: args.replay || scenario.replay.unwrap_or(false),
        })
    }
}

fn check_size(
    field: &'static str,
    value: u32,
    range: &RangeInclusive<u32>,
) -> Result<(), ScenarioError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ScenarioError::SizeOutOfRange {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

/// Randomly sampled start position and dirty cells, in `1..=width` by `1..=height`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Layout {
    pub(crate) start: Location,
    pub(crate) dirty: BTreeSet<Location>,
}

impl Layout {
    /// Marks each cell dirty with probability one half, then picks a start.
    pub(crate) fn sample(width: u32, height: u32, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let x_max = coordinate(width);
        let y_max = coordinate(height);

        let mut dirty = BTreeSet::new();
        for x in 1..=x_max {
            for y in 1..=y_max {
                if rng.gen_bool(0.5) {
                    let _ = dirty.insert(Location::new(x, y));
                }
            }
        }
        let start = Location::new(rng.gen_range(1..=x_max), rng.gen_range(1..=y_max));
        Self { start, dirty }
    }
}

/// Largest interior coordinate for a dimension already range-checked.
pub(crate) fn coordinate(size: u32) -> i32 {
    i32::try_from(size).unwrap_or(i32::MAX).max(1)
}
