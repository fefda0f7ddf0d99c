//! Run summaries and their text or JSON rendering.

use anyhow::{Context, Result};
use cleanroom_core::{Location, ThingKind, ThingSnapshot, WELCOME_BANNER};
use cleanroom_world::Observer;
use serde::Serialize;

use crate::scenario::{AgentKind, HeuristicKind};

/// Observer that tallies how much the actors moved and cleaned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub(crate) struct ActivityTally {
    pub(crate) moves: u64,
    pub(crate) dirt_removed: u64,
}

impl Observer for ActivityTally {
    fn thing_moved(&mut self, thing: &ThingSnapshot) {
        if thing.kind == ThingKind::Actor {
            self.moves += 1;
        }
    }

    fn thing_deleted(&mut self, thing: &ThingSnapshot) {
        if thing.kind == ThingKind::Dirt {
            self.dirt_removed += 1;
        }
    }
}

/// Outcome of a `simulate` run.
#[derive(Clone, Debug, Serialize)]
pub(crate) struct SimulationReport {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) seed: u64,
    pub(crate) agent: AgentKind,
    pub(crate) start: Location,
    pub(crate) dirty: Vec<Location>,
    pub(crate) steps: u64,
    pub(crate) narration: Vec<String>,
    pub(crate) activity: ActivityTally,
    pub(crate) remaining_dirt: usize,
    pub(crate) performance: i64,
}

/// Replay of a plan inside a walled world.
#[derive(Clone, Debug, Serialize)]
pub(crate) struct ReplayReport {
    pub(crate) narration: Vec<String>,
    pub(crate) remaining_dirt: usize,
    pub(crate) performance: i64,
}

/// Outcome of a `plan` run.
#[derive(Clone, Debug, Serialize)]
pub(crate) struct PlanReport {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) seed: u64,
    pub(crate) heuristic: HeuristicKind,
    pub(crate) start: Location,
    pub(crate) dirty: Vec<Location>,
    pub(crate) actions: Vec<String>,
    pub(crate) path_cost: u64,
    pub(crate) expanded: usize,
    pub(crate) replay: Option<ReplayReport>,
}

impl SimulationReport {
    pub(crate) fn render_text(&self) -> String {
        let mut lines = vec![
            WELCOME_BANNER.to_owned(),
            format!(
                "{}x{} grid, dirty cells: {}, start: {}",
                self.width,
                self.height,
                list(&self.dirty),
                self.start
            ),
        ];
        lines.extend(self.narration.iter().cloned());
        lines.push(format!(
            "Ran {} steps: {} moves, {} dirt removed, {} dirt left",
            self.steps, self.activity.moves, self.activity.dirt_removed, self.remaining_dirt
        ));
        lines.push(format!("Performance: {}", self.performance));
        lines.join("\n")
    }
}

impl PlanReport {
    pub(crate) fn render_text(&self) -> String {
        let actions = self.actions.join(", ");
        let mut lines = vec![
            WELCOME_BANNER.to_owned(),
            format!(
                "{}x{} grid, dirty cells: {}, start: {}",
                self.width,
                self.height,
                list(&self.dirty),
                self.start
            ),
            format!("Optimal path: [{actions}]"),
            format!("Optimal path cost: {}", self.path_cost),
            format!("Nodes expanded: {}", self.expanded),
        ];
        if let Some(replay) = &self.replay {
            lines.extend(replay.narration.iter().cloned());
            lines.push(format!(
                "Replay left {} dirt, performance: {}",
                replay.remaining_dirt, replay.performance
            ));
        }
        lines.join("\n")
    }
}

pub(crate) fn render_json<T: Serialize>(report: &T) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialise report as json")
}

fn list(cells: &[Location]) -> String {
    let cells: Vec<String> = cells.iter().map(ToString::to_string).collect();
    format!("[{}]", cells.join(", "))
}

#[cfg(test)]
mod tests {
    use cleanroom_core::ThingId;

    use super::*;

    #[test]
    fn tally_counts_actor_moves_and_dirt_removals() {
        let mut tally = ActivityTally::default();
        let actor = ThingSnapshot {
            id: ThingId::new(1),
            kind: ThingKind::Actor,
            location: Location::new(1, 1),
        };
        let dirt = ThingSnapshot {
            id: ThingId::new(2),
            kind: ThingKind::Dirt,
            ..actor
        };

        tally.thing_moved(&actor);
        tally.thing_moved(&dirt);
        tally.thing_deleted(&dirt);
        tally.thing_deleted(&actor);

        assert_eq!(
            tally,
            ActivityTally {
                moves: 1,
                dirt_removed: 1,
            }
        );
    }

    #[test]
    fn plan_text_lists_actions_and_cost() {
        let report = PlanReport {
            width: 2,
            height: 2,
            seed: 0,
            heuristic: HeuristicKind::Literal,
            start: Location::new(2, 2),
            dirty: vec![Location::new(1, 1)],
            actions: vec!["left".into(), "down".into(), "suck".into()],
            path_cost: 8,
            expanded: 4,
            replay: None,
        };

        let text = report.render_text();
        assert!(text.contains("dirty cells: [(1, 1)], start: (2, 2)"));
        assert!(text.contains("Optimal path: [left, down, suck]"));
        assert!(text.contains("Optimal path cost: 8"));
    }

    #[test]
    fn json_uses_lowercase_kinds() {
        let report = ReplayReport {
            narration: Vec::new(),
            remaining_dirt: 0,
            performance: 7,
        };
        let json = render_json(&report).expect("serialises");
        assert!(json.contains("\"performance\": 7"));
        assert_eq!(
            serde_json::to_string(&AgentKind::Model).expect("serialises"),
            "\"model\""
        );
    }
}
