use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use taskboard::model::task::{Priority, TaskStatus};
use taskboard::parse::{parse_tasks, serialize_tasks};
use taskboard::util::clock::FixedClock;

const NOW: &str = "2024-05-01 12:00:00";

fn read_fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Could not read fixture {}: {}", name, e))
}

fn fixture_lines(name: &str) -> Vec<String> {
    read_fixture(name).lines().map(str::to_string).collect()
}

fn render(lines: &[String]) -> String {
    lines.iter().map(|l| format!("{}\n", l)).collect()
}

// ============================================================================
// Current format
// ============================================================================

#[test]
fn round_trip_current_format() {
    let source = read_fixture("current.txt");
    let clock = FixedClock::at(NOW).unwrap();

    let tasks = parse_tasks(&fixture_lines("current.txt"), &clock).unwrap();
    let output = render(&serialize_tasks(&tasks));

    assert_eq!(output, source, "Round-trip failed for fixture: current.txt");
}

#[test]
fn current_format_fields_decode() {
    let clock = FixedClock::at(NOW).unwrap();
    let tasks = parse_tasks(&fixture_lines("current.txt"), &clock).unwrap();

    assert_eq!(tasks.len(), 3);

    let parser = &tasks[0];
    assert_eq!(parser.description, "Write parser");
    assert_eq!(parser.priority, Priority::High);
    assert_eq!(parser.progress, 40);
    assert_eq!(parser.subtasks, vec!["lexer", "tokens", "ast"]);
    assert_eq!(parser.notes.as_deref(), Some("remember unicode"));
    assert_eq!(
        parser.attachments,
        vec!["/home/me/notes.md", "/tmp/grammar.txt"]
    );
    assert_eq!(parser.last_modified_timestamp(), Some("2024-02-25 18:02:11"));

    assert_eq!(tasks[1].status(), TaskStatus::Completed);

    let docs = &tasks[2];
    assert!(docs.subtasks.is_empty());
    assert!(docs.attachments.is_empty());
    assert_eq!(docs.notes, None);
    assert_eq!(docs.last_modified_timestamp(), None);
}

// ============================================================================
// Legacy upgrade
// ============================================================================

#[test]
fn legacy_records_upgrade_with_defaults() {
    let clock = FixedClock::at(NOW).unwrap();
    let tasks = parse_tasks(&fixture_lines("legacy.txt"), &clock).unwrap();

    // Blank line skipped
    assert_eq!(tasks.len(), 3);

    let plants = &tasks[0];
    assert_eq!(plants.description, "Water plants");
    assert_eq!(plants.date, "2023-06-01");
    assert_eq!(plants.priority, Priority::Medium);
    assert_eq!(plants.progress, 0);
    assert!(plants.subtasks.is_empty());
    assert_eq!(plants.notes, None);
    assert!(plants.attachments.is_empty());
    assert_eq!(plants.status(), TaskStatus::Incomplete);
    assert_eq!(plants.created_timestamp(), NOW);
    assert_eq!(plants.last_modified_timestamp(), None);

    // Unknown priority falls back to Low
    assert_eq!(tasks[1].priority, Priority::Low);

    // "None" sentinel reads as absent
    assert_eq!(tasks[2].notes, None);
    assert_eq!(tasks[2].last_modified_timestamp(), None);
    assert_eq!(tasks[2].created_timestamp(), "2023-05-30 12:00:00");
}

#[test]
fn legacy_upgrade_saves_in_current_format() {
    let clock = FixedClock::at(NOW).unwrap();
    let tasks = parse_tasks(&fixture_lines("legacy.txt"), &clock).unwrap();
    let lines = serialize_tasks(&tasks);

    assert_eq!(
        lines,
        vec![
            "Water plants|2023-06-01|Medium|0||||Incomplete|2024-05-01 12:00:00|",
            "Sweep floor|2023-06-02|Low|0||||Incomplete|2024-05-01 12:00:00|",
            "Dust shelves|2023-06-03|Low|25||||Incomplete|2023-05-30 12:00:00|",
        ]
    );

    // Second pass is stable
    let again = parse_tasks(&lines, &clock).unwrap();
    assert_eq!(serialize_tasks(&again), lines);
}

#[test]
fn bad_progress_reports_line_number() {
    let clock = FixedClock::at(NOW).unwrap();
    let lines = vec![
        "Ok|2024-01-01|Low".to_string(),
        "Broken|2024-01-01|Low|lots||||Incomplete|2024-01-01 00:00:00|".to_string(),
    ];

    let err = parse_tasks(&lines, &clock).unwrap_err();
    assert_eq!(err.line, 2);
    assert!(err.text.starts_with("Broken"));
}
