//! Basic CLI E2E tests.
//!
//! Each test drives the built binary against a fresh data directory.

mod common;

use common::{parse_json, Sandbox};

const STUDY_DAY: &str = r#"[
    {"time": "5:00 AM – 6:30 AM", "activity": "Math"},
    {"time": "6:30 AM – 8:00 AM", "activity": "Mind Time"}
]"#;

#[test]
fn test_timetable_add_and_show() {
    let sb = Sandbox::new();
    let out = sb.run_success(&["timetable", "add", "Weekday", "--schedule", STUDY_DAY]);
    let event = parse_json(&out);
    assert_eq!(event["type"], "TimetableAdded");
    assert_eq!(event["name"], "Weekday");

    let shown = parse_json(&sb.run_success(&["timetable", "show"]));
    assert_eq!(shown["name"], "Weekday");
    assert_eq!(shown["schedule"][1]["activity"], "Mind Time");
}

#[test]
fn test_empty_timetable_needs_force() {
    let sb = Sandbox::new();
    let stderr = sb.run_failure(&["timetable", "add", "Plan A"]);
    assert!(stderr.contains("--force"), "{stderr}");
    sb.run_success(&["timetable", "add", "Plan A", "--force"]);

    let list = parse_json(&sb.run_success(&["timetable", "list"]));
    assert_eq!(list[0]["name"], "Plan A");
    assert_eq!(list[0]["active"], true);
}

#[test]
fn test_now_resolves_active_timetable() {
    let sb = Sandbox::new();
    sb.run_success(&["timetable", "add", "Weekday", "--schedule", STUDY_DAY]);

    let line = sb.run_success(&["now", "--at", "6:00 AM"]);
    assert!(line.contains("Math  67%  30m left"), "{line}");

    let snap = parse_json(&sb.run_success(&["now", "--at", "04:00", "--json"]));
    assert_eq!(snap["type"], "Snapshot");
    assert_eq!(snap["resolution"]["status"], "idle");
    assert_eq!(snap["upcoming"]["activity"], "Math");
}

#[test]
fn test_now_without_timetable_is_free_time() {
    let sb = Sandbox::new();
    let line = sb.run_success(&["now", "--at", "10:00"]);
    assert!(line.trim_end().ends_with("Free Time"), "{line}");
}

#[test]
fn test_delete_active_moves_pointer() {
    let sb = Sandbox::new();
    sb.run_success(&["timetable", "add", "A", "--force"]);
    sb.run_success(&["timetable", "add", "B", "--force"]);
    let event = parse_json(&sb.run_success(&["timetable", "delete", "1"]));
    assert_eq!(event["type"], "TimetableDeleted");

    let list = parse_json(&sb.run_success(&["timetable", "list"]));
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["name"], "A");
    assert_eq!(list[0]["active"], true);

    sb.run_failure(&["timetable", "delete", "5"]);
}

#[test]
fn test_activate_empty_clears() {
    let sb = Sandbox::new();
    sb.run_success(&["timetable", "add", "A", "--force"]);
    let event = parse_json(&sb.run_success(&["timetable", "activate", ""]));
    assert_eq!(event["type"], "ActiveChanged");
    assert!(event["id"].is_null());
    sb.run_failure(&["slot", "list"]);
}

#[test]
fn test_slot_editing() {
    let sb = Sandbox::new();
    sb.run_success(&["timetable", "add", "Day", "--force"]);
    sb.run_success(&["slot", "add", "7:00 AM – 8:00 AM", "Physics", "--priority", "high"]);
    sb.run_success(&["slot", "add", "5:00 AM – 7:00 AM", "Math", "--note", "algebra"]);
    sb.run_success(&["slot", "move", "1", "0"]);
    sb.run_success(&["slot", "edit", "1", "--activity", "Chemistry"]);

    let slots = parse_json(&sb.run_success(&["slot", "list"]));
    assert_eq!(slots[0]["activity"], "Math");
    assert_eq!(slots[0]["note"], "algebra");
    assert_eq!(slots[1]["activity"], "Chemistry");
    assert_eq!(slots[1]["priority"], "high");

    sb.run_success(&["slot", "remove", "0"]);
    let slots = parse_json(&sb.run_success(&["slot", "list"]));
    assert_eq!(slots.as_array().unwrap().len(), 1);
}

#[test]
fn test_validate_reports_issues() {
    let sb = Sandbox::new();
    let schedule = r#"[{"time": "Morning", "activity": "Stretch"}]"#;
    let (_, stderr, code) = sb.run(&["timetable", "add", "Odd", "--schedule", schedule]);
    assert_eq!(code, 0);
    assert!(stderr.contains("warning: slot 0"), "{stderr}");

    let issues = parse_json(&sb.run_success(&["timetable", "validate"]));
    assert_eq!(issues[0]["issue"], "unparsable_time");
}

#[test]
fn test_config_and_theme() {
    let sb = Sandbox::new();
    assert_eq!(sb.run_success(&["theme", "get"]).trim(), "dark");
    sb.run_success(&["theme", "set", "light"]);
    assert_eq!(sb.run_success(&["config", "get", "ui.theme"]).trim(), "light");

    sb.run_success(&["config", "set", "watch.resolve_secs", "30"]);
    assert_eq!(sb.run_success(&["config", "get", "watch.resolve_secs"]).trim(), "30");
    sb.run_failure(&["config", "set", "watch.nope", "1"]);
    sb.run_failure(&["theme", "set", "sepia"]);

    sb.run_success(&["config", "reset"]);
    assert_eq!(sb.run_success(&["theme", "get"]).trim(), "dark");
}

#[test]
fn test_update_unknown_index_reports_bounds() {
    let sb = Sandbox::new();
    sb.run_success(&["timetable", "add", "Weekday", "--schedule", STUDY_DAY]);
    let stderr = sb.run_failure(&["timetable", "update", "9", "Renamed"]);
    assert!(stderr.contains("out of bounds"), "{stderr}");
    assert!(!stderr.contains("--force"), "{stderr}");

    let event = parse_json(&sb.run_success(&["timetable", "update", "0", "Renamed"]));
    assert_eq!(event["type"], "TimetableUpdated");
    let shown = parse_json(&sb.run_success(&["timetable", "show"]));
    assert_eq!(shown["schedule"].as_array().unwrap().len(), 2);
}
