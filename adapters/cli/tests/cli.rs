use std::process::{Command, Output};

fn cleanroom(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cleanroom"))
        .args(args)
        .output()
        .expect("binary runs")
}

#[test]
fn plan_emits_a_json_report() {
    let output = cleanroom(&[
        "plan",
        "--width",
        "3",
        "--height",
        "2",
        "--seed",
        "7",
        "--heuristic",
        "nearest",
        "--format",
        "json",
    ]);
    assert!(output.status.success(), "{output:?}");

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid json");
    let actions = report["actions"].as_array().expect("actions array");
    let dirty = report["dirty"].as_array().expect("dirty array");
    let sucks = actions.iter().filter(|action| *action == "suck").count();

    assert_eq!(sucks, dirty.len());
    assert!(report["path_cost"].as_u64().expect("numeric cost") >= 1);
    assert_eq!(report["heuristic"], "nearest");
}

#[test]
fn simulate_prints_narration_and_performance() {
    let output = cleanroom(&["simulate", "--agent", "reflex", "--steps", "6"]);
    assert!(output.status.success(), "{output:?}");

    let text = String::from_utf8(output.stdout).expect("utf-8 output");
    assert!(text.starts_with("Welcome to Cleanroom."));
    assert!(text.contains("Ran 6 steps"));
    assert!(text.contains("Performance:"));
}

#[test]
fn out_of_range_sizes_are_rejected() {
    let output = cleanroom(&["simulate", "--width", "9"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr).expect("utf-8 output");
    assert!(stderr.contains("width must be between 1 and 4, got 9"));
}
