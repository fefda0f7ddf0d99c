use std::collections::BTreeSet;

use cleanroom_core::Location;
use cleanroom_system_planning::{CleaningAction, CleaningHeuristic, VacuumSearchProblem};
use cleanroom_system_search::{uniform_cost_search, Problem, SearchError, SearchLimits};

fn cells(list: &[(i32, i32)]) -> BTreeSet<Location> {
    list.iter().map(|&(x, y)| Location::new(x, y)).collect()
}

#[test]
fn two_by_two_scenario_plan_matches_recorded_output() {
    let problem = VacuumSearchProblem::new(2, 2, Location::new(2, 2), cells(&[(1, 1)]))
        .expect("valid problem");

    let solution = problem
        .solve(CleaningHeuristic::LiteralH1, SearchLimits::unbounded())
        .expect("plan exists");

    assert_eq!(
        solution.actions,
        vec![
            CleaningAction::Left,
            CleaningAction::Down,
            CleaningAction::Suck
        ]
    );
    assert_eq!(solution.path_cost, 8);
    let last = solution.states.last().expect("goal state recorded");
    assert_eq!(last.position, Location::new(1, 1));
    assert!(last.dirty.is_empty());
}

#[test]
fn admissible_strategy_matches_uniform_cost() {
    let scenarios: [(i32, i32, (i32, i32), &[(i32, i32)]); 5] = [
        (3, 3, (1, 1), &[(3, 3), (1, 3), (2, 2)]),
        (4, 2, (4, 1), &[(1, 1), (1, 2), (3, 2)]),
        (5, 5, (3, 3), &[(1, 5), (5, 1)]),
        (2, 3, (1, 2), &[(1, 1), (2, 1), (1, 3), (2, 3)]),
        (4, 4, (2, 3), &[]),
    ];

    for (x_max, y_max, (sx, sy), dirty) in scenarios {
        let problem = VacuumSearchProblem::new(x_max, y_max, Location::new(sx, sy), cells(dirty))
            .expect("valid problem");

        let optimal = uniform_cost_search(&problem, SearchLimits::unbounded()).expect("plan exists");
        let guided = problem
            .solve(
                CleaningHeuristic::NearestDirtDistance,
                SearchLimits::unbounded(),
            )
            .expect("plan exists");

        assert_eq!(
            guided.path_cost, optimal.path_cost,
            "suboptimal plan for {dirty:?} from ({sx}, {sy})"
        );
        let sucks = guided
            .actions
            .iter()
            .filter(|action| **action == CleaningAction::Suck)
            .count();
        assert_eq!(sucks, dirty.len());
    }
}

#[test]
fn replaying_a_plan_reaches_the_goal() {
    let problem = VacuumSearchProblem::new(
        4,
        3,
        Location::new(2, 2),
        cells(&[(1, 1), (4, 3), (2, 2)]),
    )
    .expect("valid problem");

    for heuristic in [
        CleaningHeuristic::LiteralH1,
        CleaningHeuristic::NearestDirtDistance,
    ] {
        let solution = problem
            .solve(heuristic, SearchLimits::unbounded())
            .expect("plan exists");
        let mut state = problem.initial();
        for action in &solution.actions {
            assert!(problem.actions(&state).contains(action));
            state = problem.result(&state, action);
        }
        assert!(problem.goal_test(&state), "{heuristic} plan left dirt behind");
    }
}

#[test]
fn expansion_budget_is_reported() {
    let problem = VacuumSearchProblem::new(
        5,
        5,
        Location::new(1, 1),
        cells(&[(5, 5), (1, 5), (5, 1), (3, 3)]),
    )
    .expect("valid problem");

    let error = problem
        .solve(
            CleaningHeuristic::NearestDirtDistance,
            SearchLimits::with_max_expansions(3),
        )
        .expect_err("budget too small");

    assert_eq!(error, SearchError::ExpansionLimit { limit: 3 });
}
