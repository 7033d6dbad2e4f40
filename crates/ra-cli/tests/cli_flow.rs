//! End-to-end tests for the `ra` binary.
//!
//! Each test writes a snapshot into a temporary directory and runs the
//! compiled binary against it, isolated from the user's config directory.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const CAMPUS: &str = r#"{
    "rooms": [
        {"id": "A-101", "building": "Block A", "capacity": 40},
        {"id": "A-102", "building": "Block A", "capacity": 35},
        {"id": "Lab-201", "building": "Block B", "capacity": 25, "kind": "laboratory"}
    ],
    "professors": [
        {"id": "silva", "specialties": ["Math", "Statistics"], "availability": ["Mon 08:00", "Tue 14:00", "Thu 10:00"]},
        {"id": "santos", "specialties": ["Programming"], "availability": ["Mon 14:00", "Wed 08:00", "Fri 16:00"]}
    ],
    "courses": [
        {"id": "mat001", "code": "MAT001", "subject_area": "Math", "weekly_hours": 4},
        {"id": "est301", "code": "EST301", "subject_area": "Statistics", "weekly_hours": 4},
        {"id": "inf102", "code": "INF102", "subject_area": "Programming", "weekly_hours": 4, "room_kind": "laboratory"}
    ],
    "sections": [
        {"id": "MAT001-A", "course": "mat001", "professor": "silva", "students": 35, "period": "morning"},
        {"id": "EST301-A", "course": "est301", "professor": "silva", "students": 38, "period": "afternoon"},
        {"id": "INF102-B", "course": "inf102", "professor": "santos", "students": 24, "period": "afternoon"}
    ]
}"#;

fn ra_binary() -> String {
    env!("CARGO_BIN_EXE_ra").to_string()
}

fn write_snapshot(temp: &Path, content: &str) -> PathBuf {
    let path = temp.join("snapshot.json");
    std::fs::write(&path, content).unwrap();
    path
}

fn ra(temp: &Path) -> Command {
    let mut cmd = Command::new(ra_binary());
    cmd.env("HOME", temp)
        .env("XDG_CONFIG_HOME", temp.join(".config"))
        .env_remove("RUST_LOG");
    cmd
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_run_json_allocates_every_section() {
    let temp = TempDir::new().unwrap();
    let snapshot = write_snapshot(temp.path(), CAMPUS);

    let output = ra(temp.path())
        .arg("run")
        .arg(&snapshot)
        .arg("--json")
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "ra run should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["status"], "completed");
    assert_eq!(report["summary"]["total"], 3);
    assert_eq!(report["summary"]["allocated"], 3);

    let results = report["results"].as_array().unwrap();
    let sections: Vec<_> = results.iter().map(|r| r["section"].as_str().unwrap()).collect();
    assert_eq!(sections, ["EST301-A", "INF102-B", "MAT001-A"]);
    // Silva teaches both sections; they must land in different slots.
    assert_ne!(results[0]["slot"], results[2]["slot"]);
}

#[test]
fn test_run_is_deterministic_across_invocations() {
    let temp = TempDir::new().unwrap();
    let snapshot = write_snapshot(temp.path(), CAMPUS);

    let runs: Vec<_> = (0..3)
        .map(|_| {
            let output = ra(temp.path())
                .arg("run")
                .arg(&snapshot)
                .arg("--json")
                .output()
                .unwrap();
            stdout(&output)
        })
        .collect();
    assert_eq!(runs[0], runs[1]);
    assert_eq!(runs[1], runs[2]);
}

#[test]
fn test_verbose_logs_stay_off_stdout() {
    let temp = TempDir::new().unwrap();
    let snapshot = write_snapshot(temp.path(), CAMPUS);

    let output = ra(temp.path())
        .arg("--verbose")
        .arg("run")
        .arg(&snapshot)
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(serde_json::from_str::<serde_json::Value>(&stdout(&output)).is_ok());
    assert!(String::from_utf8_lossy(&output.stderr).contains("section decided"));
}

#[test]
fn test_config_file_changes_the_grid() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("ra.toml");
    std::fs::write(
        &config,
        "[allocation]\nslot_granularity_minutes = 60\ndays = [\"Sat\"]\n",
    )
    .unwrap();

    let output = ra(temp.path())
        .arg("grid")
        .arg("--config")
        .arg(&config)
        .output()
        .unwrap();
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.starts_with("14 slots (60 minutes each"));
    assert!(text.contains("Sat 08:00 09:00"));
}

#[test]
fn test_environment_overrides_config() {
    let temp = TempDir::new().unwrap();

    let output = ra(temp.path())
        .env("RA_ALLOCATION__PERIOD_WEIGHTING", "dominant")
        .arg("grid")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(stdout(&output).contains("dominant period weighting"));
}

#[test]
fn test_validate_rejects_malformed_snapshot() {
    let temp = TempDir::new().unwrap();
    let broken = CAMPUS.replace("\"professor\": \"santos\"", "\"professor\": \"ghost\"");
    let snapshot = write_snapshot(temp.path(), &broken);

    let output = ra(temp.path())
        .arg("validate")
        .arg(&snapshot)
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(stdout(&output).contains("section INF102-B references unknown professor ghost"));
}

#[test]
fn test_run_fails_on_invalid_snapshot() {
    let temp = TempDir::new().unwrap();
    let broken = CAMPUS.replace("\"capacity\": 40", "\"capacity\": 0");
    let snapshot = write_snapshot(temp.path(), &broken);

    let output = ra(temp.path()).arg("run").arg(&snapshot).output().unwrap();
    assert!(!output.status.success());
    assert!(stdout(&output).is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("allocation failed"));
}

#[test]
fn test_missing_snapshot_file_is_reported() {
    let temp = TempDir::new().unwrap();

    let output = ra(temp.path())
        .arg("run")
        .arg(temp.path().join("nope.json"))
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("nope.json"));
}

#[test]
fn test_demo_snapshot_runs() {
    let temp = TempDir::new().unwrap();
    let demo = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/campus.json");

    let output = ra(temp.path()).arg("validate").arg(&demo).output().unwrap();
    assert!(
        output.status.success(),
        "demo snapshot should validate: {}",
        stdout(&output)
    );
    // 42 students and no laboratory that large.
    assert!(stdout(&output).contains("- FIS201-A: no room satisfies capacity/kind requirement"));

    let output = ra(temp.path())
        .arg("run")
        .arg(&demo)
        .arg("--json")
        .output()
        .unwrap();
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["summary"]["total"], 5);
    assert_eq!(report["summary"]["unallocated"], 1);
}

#[test]
fn test_demo_config_loads() {
    let temp = TempDir::new().unwrap();
    let demo = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/ra.toml");

    let output = ra(temp.path())
        .arg("--config")
        .arg(&demo)
        .arg("grid")
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "demo config should load: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let text = stdout(&output);
    assert!(text.starts_with("35 slots (120 minutes each, 08:00-22:00, soft period weighting)"));
    assert!(text.contains("Fri 08:00 10:00 12:00 14:00 16:00 18:00 20:00"));
}
